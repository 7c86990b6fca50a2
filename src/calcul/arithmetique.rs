// src/calcul/arithmetique.rs
//
// Les huit opérations de base. Chaque opérande passe par la conversion commune,
// le résultat est simplifié.

use super::erreur::{ErreurCalcul, Resultat};
use super::{Calculatrice, Operande};
use crate::noyau::{simplifier, Expr, Fonction};

impl Calculatrice {
    pub fn additionner(&self, a: impl Into<Operande>, b: impl Into<Operande>) -> Resultat<Expr> {
        let (a, b) = (self.valeur(a)?, self.valeur(b)?);
        log::debug!("addition: {a} + {b}");
        Ok(simplifier(&(a + b)))
    }

    pub fn soustraire(&self, a: impl Into<Operande>, b: impl Into<Operande>) -> Resultat<Expr> {
        let (a, b) = (self.valeur(a)?, self.valeur(b)?);
        log::debug!("soustraction: {a} - {b}");
        Ok(simplifier(&(a - b)))
    }

    pub fn multiplier(&self, a: impl Into<Operande>, b: impl Into<Operande>) -> Resultat<Expr> {
        let (a, b) = (self.valeur(a)?, self.valeur(b)?);
        log::debug!("multiplication: {a} * {b}");
        Ok(simplifier(&(a * b)))
    }

    /// Le dénominateur est lu et contrôlé avant le numérateur.
    pub fn diviser(&self, a: impl Into<Operande>, b: impl Into<Operande>) -> Resultat<Expr> {
        let b = self.valeur(b)?;
        if b.est_zero() {
            return Err(ErreurCalcul::new("Division by zero is not allowed."));
        }
        let a = self.valeur(a)?;
        log::debug!("division: {a} / {b}");
        Ok(simplifier(&(a / b)))
    }

    pub fn puissance(&self, base: impl Into<Operande>, exposant: impl Into<Operande>) -> Resultat<Expr> {
        let (b, e) = (self.valeur(base)?, self.valeur(exposant)?);
        log::debug!("puissance: {b} ** {e}");
        Ok(simplifier(&Expr::puissance(b, e)))
    }

    /// radicande**(1/degré) ; le degré doit être une constante non nulle.
    pub fn racine(&self, radicande: impl Into<Operande>, degre: impl Into<Operande>) -> Resultat<Expr> {
        let r = self.valeur(radicande)?;
        let d = self.valeur(degre)?;
        if !d.est_constante() {
            return Err(ErreurCalcul::new("Root degree must be numeric."));
        }
        if d.est_zero() {
            return Err(ErreurCalcul::new("Zero root degree is undefined."));
        }
        log::debug!("racine: {r} ** (1/{d})");
        Ok(simplifier(&Expr::puissance(r, Expr::un() / d)))
    }

    pub fn valeur_absolue(&self, a: impl Into<Operande>) -> Resultat<Expr> {
        let a = self.valeur(a)?;
        log::debug!("valeur absolue: {a}");
        Ok(simplifier(&Expr::appel(Fonction::Abs, a)))
    }

    /// Logarithme naturel sans base, sinon log(x)/log(base).
    pub fn logarithme(&self, a: impl Into<Operande>, base: Option<Operande>) -> Resultat<Expr> {
        let a = self.valeur(a)?;
        let resultat = match base {
            None => Expr::appel(Fonction::Log, a),
            Some(b) => {
                let b = self.valeur(b)?;
                if b.est_zero() || b.est_un() {
                    return Err(ErreurCalcul::new("Log base cannot be 0 or 1."));
                }
                Expr::log_base(a, b)
            }
        };
        log::debug!("logarithme: {resultat}");
        Ok(simplifier(&resultat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::ModeRendu;
    use pretty_assertions::assert_eq;

    fn calc() -> Calculatrice {
        Calculatrice::new(ModeRendu::Ascii)
    }

    #[test]
    fn quatre_operations() {
        let c = calc();
        assert_eq!(c.additionner("1/2", "1/3").unwrap().to_string(), "5/6");
        assert_eq!(c.soustraire("x + 1", "x").unwrap().to_string(), "1");
        assert_eq!(c.multiplier("sqrt(2)", "sqrt(8)").unwrap().to_string(), "4");
        assert_eq!(c.diviser(1, 3).unwrap().to_string(), "1/3");
        assert_eq!(c.additionner(0.1, 0.2).unwrap().to_string(), "3/10");
    }

    #[test]
    fn division_par_zero() {
        let c = calc();
        let e = c.diviser("x", "0").unwrap_err();
        assert_eq!(e.message(), "Division by zero is not allowed.");
        // le dénominateur est contrôlé avant la lecture du numérateur
        let e = c.diviser("((", "x - x").unwrap_err();
        assert_eq!(e.message(), "Division by zero is not allowed.");
    }

    #[test]
    fn puissances_et_racines() {
        let c = calc();
        assert_eq!(c.puissance(2, 10).unwrap().to_string(), "1024");
        assert_eq!(c.puissance("x", "2").unwrap().to_string(), "x**2");
        assert_eq!(c.racine(27, 3).unwrap().to_string(), "3");
        assert_eq!(c.racine(8, 2).unwrap().to_string(), "2*sqrt(2)");
        assert_eq!(c.racine(4, 0).unwrap_err().message(), "Zero root degree is undefined.");
        assert_eq!(c.racine(4, "n").unwrap_err().message(), "Root degree must be numeric.");
    }

    #[test]
    fn absolu() {
        let c = calc();
        assert_eq!(c.valeur_absolue(-5).unwrap().to_string(), "5");
        assert_eq!(c.valeur_absolue("3 + 4*I").unwrap().to_string(), "5");
    }

    #[test]
    fn logarithmes() {
        let c = calc();
        assert_eq!(c.logarithme(8, Some(2.into())).unwrap().to_string(), "3");
        assert_eq!(c.logarithme("E", None).unwrap().to_string(), "1");
        assert_eq!(c.logarithme(1, None).unwrap().to_string(), "0");
        assert_eq!(c.logarithme(0, Some(2.into())).unwrap().to_string(), "zoo");
        for base in [0, 1] {
            let e = c.logarithme(8, Some(base.into())).unwrap_err();
            assert_eq!(e.message(), "Log base cannot be 0 or 1.");
        }
    }

    #[test]
    fn erreur_de_lecture_transmise() {
        let e = calc().additionner("(1", "2").unwrap_err();
        assert_eq!(e.message(), "Unbalanced parentheses.");
    }
}
