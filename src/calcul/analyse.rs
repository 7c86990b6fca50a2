// src/calcul/analyse.rs
//
// Limites, évaluation avec substitution, résolution d’équations.
// Les contrôles d’entrée sont faits ici ; le calcul est délégué au noyau.

use std::collections::HashMap;

use super::erreur::{ErreurCalcul, Resultat};
use super::normalisation::normaliser;
use super::parametres::Parametres;
use super::{Calculatrice, Operande};
use crate::noyau::{self, simplifier, Direction, Ensemble, ErreurNoyau, Expr};

/// both / plus / minus, sans tenir compte de la casse.
fn direction(texte: &str) -> Resultat<Direction> {
    match texte.trim().to_lowercase().as_str() {
        "both" => Ok(Direction::Bilaterale),
        "plus" => Ok(Direction::Droite),
        "minus" => Ok(Direction::Gauche),
        _ => Err(ErreurCalcul::new(
            "Direction must be one of: both, plus, minus.",
        )),
    }
}

fn variable_requise(variable: &str) -> Resultat<&str> {
    let v = variable.trim();
    if v.is_empty() {
        return Err(ErreurCalcul::new("Variable must be provided."));
    }
    Ok(v)
}

impl Calculatrice {
    pub fn limite(
        &self,
        expression: &str,
        variable: &str,
        point: impl Into<Operande>,
        sens: &str,
    ) -> Resultat<Expr> {
        let dir = direction(sens)?;
        let var = variable_requise(variable)?;
        let e = self.lire(expression)?;
        let a = self.valeur(point)?;
        log::debug!("limite: {e} quand {var} -> {a} ({dir:?})");
        noyau::limite(&e, var, &a, dir).map_err(|err| {
            log::info!("limite refusée: {err}");
            err.into()
        })
    }

    /// Substitution simultanée puis simplification.
    pub fn evaluer_expression(
        &self,
        expression: &str,
        substitutions: Option<&Parametres>,
    ) -> Resultat<Expr> {
        let e = self.lire(expression)?;
        let Some(subs) = substitutions.filter(|s| !s.is_empty()) else {
            return Ok(simplifier(&e));
        };
        let mut table = HashMap::with_capacity(subs.len());
        for (cle, valeur) in subs.iter() {
            if cle.is_empty() {
                return Err(ErreurCalcul::new(format!("Invalid substitution: ={valeur}")));
            }
            table.insert(cle.to_string(), self.valeur(valeur)?);
        }
        log::debug!("substitution: {e} avec {table:?}");
        Ok(simplifier(&e.substituer(&table)))
    }

    /// `g = d` devient g - d = 0 (premier `=` seulement) ; sans `=`, expr = 0.
    pub fn resoudre_equation(&self, equation: &str, variable: &str) -> Resultat<Ensemble> {
        let var = variable_requise(variable)?;
        let propre = normaliser(equation);
        let f = match propre.split_once('=') {
            Some((g, d)) => noyau::analyser(g)? - noyau::analyser(d)?,
            None => noyau::analyser(&propre)?,
        };
        log::debug!("équation: {f} = 0 pour {var}");
        noyau::resoudre(&f, var).map_err(|err| {
            if err == ErreurNoyau::SolutionIndisponible {
                log::info!("pas de forme close pour {f}");
            }
            err.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calcul::analyser_parametres;
    use crate::noyau::ModeRendu;
    use pretty_assertions::assert_eq;

    fn calc() -> Calculatrice {
        Calculatrice::new(ModeRendu::Ascii)
    }

    #[test]
    fn limites() {
        let c = calc();
        assert_eq!(c.limite("(1 + 1/x)^x", "x", "oo", "both").unwrap().to_string(), "E");
        assert_eq!(c.limite("sin(x)/x", "x", 0, "BOTH").unwrap().to_string(), "1");
        assert_eq!(c.limite("1/x", "x", 0, "plus").unwrap().to_string(), "oo");
        assert_eq!(c.limite("1/x", "x", 0, "minus").unwrap().to_string(), "-oo");
    }

    #[test]
    fn limite_bilaterale_differente() {
        let e = calc().limite("1/x", "x", "0", "both").unwrap_err();
        assert_eq!(
            e.message(),
            "The limit does not exist since left hand limit = -oo and right hand limit = oo"
        );
    }

    #[test]
    fn limite_controle_direction_avant_variable() {
        let c = calc();
        let e = c.limite("x", "", "0", "up").unwrap_err();
        assert_eq!(e.message(), "Direction must be one of: both, plus, minus.");
        let e = c.limite("x", "", "0", "both").unwrap_err();
        assert_eq!(e.message(), "Variable must be provided.");
    }

    #[test]
    fn evaluation_sans_substitution() {
        assert_eq!(calc().evaluer_expression("2^10 − 24", None).unwrap().to_string(), "1000");
    }

    #[test]
    fn substitution_simultanee() {
        // x et y échangés : pas d’application en chaîne
        let p = analyser_parametres("x=y,y=2", "substitution").unwrap();
        let r = calc().evaluer_expression("x + 10*y", Some(&p)).unwrap();
        assert_eq!(r.to_string(), "y + 20");
    }

    #[test]
    fn substitution_division_par_zero() {
        let p = analyser_parametres("y=0", "substitution").unwrap();
        let r = calc().evaluer_expression("x/y", Some(&p)).unwrap();
        assert_eq!(r.to_string(), "zoo");
    }

    #[test]
    fn substitution_pythagore() {
        let p = analyser_parametres("theta=pi/4, phi=ln(5)", "substitution").unwrap();
        let r = calc()
            .evaluer_expression("sin(theta)^2 + cos(theta)^2 + exp(-phi)*phi", Some(&p))
            .unwrap();
        assert_eq!(r.to_string(), "log(5)/5 + 1");
    }

    #[test]
    fn equations() {
        let c = calc();
        assert_eq!(c.resoudre_equation("x^2 = 4", "x").unwrap().to_string(), "{-2, 2}");
        assert_eq!(c.resoudre_equation("2*x + 1", "x").unwrap().to_string(), "{-1/2}");
        assert_eq!(c.resoudre_equation("x = x", "x").unwrap().to_string(), "Complexes");
        assert_eq!(c.resoudre_equation("x = x + 1", "x").unwrap().to_string(), "EmptySet");
    }

    #[test]
    fn equation_sans_variable() {
        let e = calc().resoudre_equation("x = 1", " ").unwrap_err();
        assert_eq!(e.message(), "Variable must be provided.");
    }

    #[test]
    fn equation_transcendante() {
        let e = calc().resoudre_equation("cos(x) = x", "x").unwrap_err();
        assert_eq!(
            e.message(),
            "Analytic solution is unavailable. Try refining the equation or switch to numeric methods."
        );
    }

    #[test]
    fn ensemble_en_unicode() {
        let c = Calculatrice::new(ModeRendu::Unicode);
        let s = c.resoudre_equation("x^2 - 2", "x").unwrap();
        assert_eq!(s.affichage(c.mode()), "{-√(2), √(2)}");
    }
}
