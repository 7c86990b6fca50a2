// src/calcul/quadratique.rs
//
// a·x² + b·x + c = 0 : (-b + √D)/(2a) puis (-b - √D)/(2a), D = b² - 4ac simplifié.

use super::erreur::{ErreurCalcul, Resultat};
use super::{Calculatrice, Operande};
use crate::noyau::{racines_quadratiques, Expr};

impl Calculatrice {
    pub fn resoudre_quadratique(
        &self,
        a: impl Into<Operande>,
        b: impl Into<Operande>,
        c: impl Into<Operande>,
    ) -> Resultat<(Expr, Expr)> {
        let a = self.valeur(a)?;
        let b = self.valeur(b)?;
        let c = self.valeur(c)?;
        if a.est_zero() {
            return Err(ErreurCalcul::new("Coefficient a must be non-zero."));
        }
        log::debug!("quadratique: a={a} b={b} c={c}");
        let [r1, r2] = racines_quadratiques(&a, &b, &c);
        Ok((r1, r2))
    }
}
