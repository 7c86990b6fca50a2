// src/noyau/lecture.rs
//
// Lecture numérique approchée (Complex64) d’une expression exacte.
// Sert uniquement aux DÉCISIONS (signe d’une constante, réalité, tri des racines),
// jamais au résultat affiché : le résultat reste exact.

use num_complex::Complex64;
use num_traits::{ToPrimitive, Zero};

use std::cmp::Ordering;
use std::collections::HashMap;
use std::f64::consts;

use super::expr::{Expr, Fonction};
use super::nombre::{self, Nombre};

/// Tolérance relative des décisions numériques.
const TOLERANCE: f64 = 1e-12;

fn vers_complexe(z: &Nombre) -> Complex64 {
    Complex64::new(
        nombre::rationnel_vers_f64(&z.re),
        nombre::rationnel_vers_f64(&z.im),
    )
}

fn fini(z: Complex64) -> Option<Complex64> {
    if z.re.is_finite() && z.im.is_finite() {
        Some(z)
    } else {
        None
    }
}

/// Valeur numérique d’une constante (None si variable libre ou valeur étendue).
pub fn evaluer(e: &Expr) -> Option<Complex64> {
    evaluer_avec(e, &HashMap::new())
}

/// Valeur numérique avec des valeurs pour les variables.
pub fn evaluer_avec(e: &Expr, valeurs: &HashMap<String, Complex64>) -> Option<Complex64> {
    let v = match e {
        Expr::Nombre(z) => vers_complexe(z),
        Expr::Pi => Complex64::new(consts::PI, 0.0),
        Expr::E => Complex64::new(consts::E, 0.0),
        Expr::Var(nom) => *valeurs.get(nom)?,
        Expr::Infini | Expr::MoinsInfini | Expr::InfiniComplexe | Expr::Indefini => return None,
        Expr::Add(ts) => {
            let mut acc = Complex64::zero();
            for t in ts {
                acc += evaluer_avec(t, valeurs)?;
            }
            acc
        }
        Expr::Mul(fs) => {
            let mut acc = Complex64::new(1.0, 0.0);
            for f in fs {
                acc *= evaluer_avec(f, valeurs)?;
            }
            acc
        }
        Expr::Pow(b, ex) => {
            let b = evaluer_avec(b, valeurs)?;
            match ex.comme_nombre().and_then(nombre::comme_entier) {
                Some(n) => b.powi(n.to_i32()?),
                None => {
                    let ex = evaluer_avec(ex, valeurs)?;
                    if b.is_zero() {
                        if ex.re > 0.0 {
                            Complex64::zero()
                        } else {
                            return None;
                        }
                    } else {
                        b.powc(ex)
                    }
                }
            }
        }
        Expr::Appel(f, x) => {
            let x = evaluer_avec(x, valeurs)?;
            match f {
                Fonction::Sin => x.sin(),
                Fonction::Cos => x.cos(),
                Fonction::Tan => x.tan(),
                Fonction::Exp => x.exp(),
                Fonction::Log => {
                    if x.is_zero() {
                        return None;
                    }
                    x.ln()
                }
                Fonction::Abs => Complex64::new(x.norm(), 0.0),
            }
        }
    };
    fini(v)
}

fn echelle(z: Complex64) -> f64 {
    z.norm().max(1.0)
}

/// Vrai si la constante est (numériquement) réelle.
pub fn est_reel(e: &Expr) -> bool {
    match evaluer(e) {
        Some(z) => z.im.abs() <= TOLERANCE * echelle(z),
        None => false,
    }
}

/// Signe d’une constante réelle. Equal seulement si l’expression est exactement 0.
/// None si trop proche de 0 pour décider, ou non réelle.
pub fn signe(e: &Expr) -> Option<Ordering> {
    if e.est_zero() {
        return Some(Ordering::Equal);
    }
    let z = evaluer(e)?;
    if z.im.abs() > TOLERANCE * echelle(z) {
        return None;
    }
    if z.re.abs() <= TOLERANCE {
        return None;
    }
    z.re.partial_cmp(&0.0)
}

/// Vrai si la constante est nulle (exactement, ou numériquement à la tolérance près).
pub fn est_nul(e: &Expr) -> bool {
    if e.est_zero() {
        return true;
    }
    match evaluer(e) {
        Some(z) => z.norm() <= TOLERANCE * 1e3,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> Expr {
        Expr::entier(v)
    }

    #[test]
    fn signe_des_constantes() {
        assert_eq!(signe(&(n(2).racine() - n(1))), Some(Ordering::Greater));
        assert_eq!(signe(&(Expr::Pi - n(4))), Some(Ordering::Less));
        assert_eq!(signe(&n(0)), Some(Ordering::Equal));
        assert_eq!(signe(&Expr::i()), None);
    }

    #[test]
    fn variables_bloquent_la_lecture() {
        assert!(evaluer(&Expr::var("x")).is_none());
        let mut table = HashMap::new();
        table.insert("x".to_string(), Complex64::new(2.0, 0.0));
        let v = evaluer_avec(&(Expr::var("x") * n(3)), &table).unwrap();
        assert!((v.re - 6.0).abs() < 1e-12);
    }

    #[test]
    fn lecture_fonctions() {
        let e = Expr::appel(Fonction::Log, n(5));
        let v = evaluer(&e).unwrap();
        assert!((v.re - 5f64.ln()).abs() < 1e-12);
        assert!(est_reel(&e));
        assert!(!est_reel(&(n(1) + Expr::i())));
    }
}
