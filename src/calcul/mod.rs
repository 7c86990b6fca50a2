//! Couche calcul : opérations nommées au-dessus du noyau
//!
//! Organisation interne :
//! - normalisation.rs : glyphes -> ASCII, ^ -> **
//! - parametres.rs    : listes clé=valeur (géométrie, substitutions)
//! - arithmetique.rs  : + - × ÷, puissance, racine, |x|, log
//! - quadratique.rs   : a·x² + b·x + c = 0
//! - geometrie.rs     : table des six figures
//! - analyse.rs       : limite, évaluation avec substitution, équations
//!
//! La calculatrice ne garde aucun état : seul le mode de rendu est fixé à la construction.

pub mod analyse;
pub mod arithmetique;
pub mod erreur;
pub mod geometrie;
pub mod normalisation;
pub mod parametres;
pub mod quadratique;

#[cfg(test)]
mod tests_proprietes;

use crate::noyau::{self, nombre, Expr, ModeRendu};

pub use erreur::ErreurCalcul;
pub use parametres::analyser_parametres;

use erreur::Resultat;

/// Opérande accepté par les opérations : texte, entier, flottant ou valeur déjà construite.
#[derive(Clone, Debug, PartialEq)]
pub enum Operande {
    Texte(String),
    Entier(i64),
    /// Lu exactement via sa forme décimale la plus courte (0.1 -> 1/10).
    Flottant(f64),
    Valeur(Expr),
}

impl From<&str> for Operande {
    fn from(s: &str) -> Self {
        Operande::Texte(s.to_string())
    }
}

impl From<String> for Operande {
    fn from(s: String) -> Self {
        Operande::Texte(s)
    }
}

impl From<&String> for Operande {
    fn from(s: &String) -> Self {
        Operande::Texte(s.clone())
    }
}

impl From<i64> for Operande {
    fn from(n: i64) -> Self {
        Operande::Entier(n)
    }
}

impl From<i32> for Operande {
    fn from(n: i32) -> Self {
        Operande::Entier(n as i64)
    }
}

impl From<f64> for Operande {
    fn from(x: f64) -> Self {
        Operande::Flottant(x)
    }
}

impl From<Expr> for Operande {
    fn from(e: Expr) -> Self {
        Operande::Valeur(e)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Calculatrice {
    mode: ModeRendu,
}

impl Calculatrice {
    pub fn new(mode: ModeRendu) -> Self {
        Calculatrice { mode }
    }

    pub fn mode(&self) -> ModeRendu {
        self.mode
    }

    /// Rendu d’une valeur dans le mode de la calculatrice.
    pub fn rendre(&self, e: &Expr) -> String {
        e.affichage(self.mode)
    }

    /// Texte normalisé puis lu par le noyau.
    pub(crate) fn lire(&self, texte: &str) -> Resultat<Expr> {
        let propre = normalisation::normaliser(texte);
        log::debug!("lecture: {propre:?}");
        Ok(noyau::analyser(&propre)?)
    }

    /// Conversion d’un opérande en valeur du noyau.
    pub(crate) fn valeur(&self, op: impl Into<Operande>) -> Resultat<Expr> {
        match op.into() {
            Operande::Texte(s) => self.lire(&s),
            Operande::Entier(n) => Ok(Expr::entier(n)),
            Operande::Flottant(x) => nombre::depuis_f64(x)
                .map(Expr::depuis_rat)
                .ok_or_else(|| ErreurCalcul::new(format!("Cannot convert {x} to an exact number."))),
            Operande::Valeur(e) => Ok(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn operandes() {
        let c = Calculatrice::default();
        assert_eq!(c.valeur(3).unwrap(), Expr::entier(3));
        assert_eq!(c.valeur(0.1).unwrap(), Expr::rationnel(1, 10));
        assert_eq!(c.valeur("2^3").unwrap(), Expr::entier(8));
        assert!(c.valeur(f64::NAN).is_err());
        assert_eq!(c.valeur(Expr::var("x")).unwrap(), Expr::var("x"));
    }

    #[test]
    fn rendu_selon_le_mode() {
        let e = Expr::entier(2).racine();
        assert_eq!(Calculatrice::new(ModeRendu::Ascii).rendre(&e), "sqrt(2)");
        assert_eq!(Calculatrice::new(ModeRendu::Unicode).rendre(&e), "√(2)");
    }
}
