//! Propriétés de la couche calcul (proptest) + chaîne de régression de bout en bout.
//!
//! - racines du trinôme réinjectées : a·r² + b·r + c se simplifie en 0
//! - division par zéro : toujours refusée, quel que soit le numérateur
//! - normalisation idempotente sur du texte arbitraire

use proptest::prelude::*;

use super::normalisation::normaliser;
use super::{analyser_parametres, Calculatrice};
use crate::noyau::{simplifier, Expr, ModeRendu};

fn calc() -> Calculatrice {
    Calculatrice::new(ModeRendu::Ascii)
}

fn trinome(a: i64, b: i64, c: i64, x: &Expr) -> Expr {
    Expr::entier(a) * Expr::puissance(x.clone(), Expr::entier(2))
        + Expr::entier(b) * x.clone()
        + Expr::entier(c)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_racines_quadratiques_annulent(
        a in (-12i64..=12).prop_filter("a non nul", |a| *a != 0),
        b in -12i64..=12,
        c in -12i64..=12,
    ) {
        let (r1, r2) = calc().resoudre_quadratique(a, b, c).unwrap();
        for r in [r1, r2] {
            let reste = simplifier(&trinome(a, b, c, &r));
            prop_assert!(reste.est_zero(), "a={} b={} c={} r={} reste={}", a, b, c, r, reste);
        }
    }

    #[test]
    fn prop_racines_coefficients_rationnels(
        p in 1i64..=9,
        q in 1i64..=9,
        b in -6i64..=6,
    ) {
        // a = p/q : mêmes garanties hors des entiers
        let a = format!("{p}/{q}");
        let (r1, r2) = calc().resoudre_quadratique(a.as_str(), b, 1).unwrap();
        for r in [r1, r2] {
            let e = Expr::rationnel(p, q) * Expr::puissance(r.clone(), Expr::entier(2))
                + Expr::entier(b) * r.clone()
                + Expr::un();
            prop_assert!(simplifier(&e).est_zero(), "a={} b={} r={}", a, b, r);
        }
    }

    #[test]
    fn prop_division_par_zero_refusee(n in any::<i64>(), k in 0usize..4) {
        let numerateurs = [
            n.to_string(),
            format!("x + {n}"),
            format!("sin({n})"),
            "((".to_string(),
        ];
        let e = calc().diviser(numerateurs[k].as_str(), 0).unwrap_err();
        prop_assert_eq!(e.message(), "Division by zero is not allowed.");
    }

    #[test]
    fn prop_normalisation_idempotente(s in "[ x0-9^*+/()×÷−√π∞·a-z]{0,24}") {
        let une = normaliser(&s);
        prop_assert_eq!(normaliser(&une), une);
    }
}

/* ------------------------ Régression de bout en bout ------------------------ */

#[test]
fn reg_triangle_heron() {
    let p = analyser_parametres("side_a=13, side_b=14, side_c=15", "parameter").unwrap();
    let r = calc().geometrie("triangle_area", &p).unwrap();
    assert_eq!(r.valeur, Expr::entier(84));
    assert_eq!(r.to_string(), "triangle_area: 84");
}

#[test]
fn reg_triangle_impossible() {
    let p = analyser_parametres("side_a=1,side_b=1,side_c=10", "parameter").unwrap();
    assert!(calc().geometrie("triangle_area", &p).is_err());
}

#[test]
fn reg_limite_e() {
    assert_eq!(calc().limite("(1 + 1/x)**x", "x", "oo", "both").unwrap(), Expr::E);
}

#[test]
fn reg_limite_taylor() {
    let l = calc().limite("(sin(x) - x)/x**3", "x", 0, "both").unwrap();
    assert_eq!(l.to_string(), "-1/6");
}

#[test]
fn reg_quintique() {
    let s = calc().resoudre_equation("x**5 - x", "x").unwrap();
    assert_eq!(s.to_string(), "{-1, 0, 1, -I, I}");
}

#[test]
fn reg_racines_imaginaires() {
    let s = calc().resoudre_equation("x**2 + 1 = 0", "x").unwrap();
    assert_eq!(s.to_string(), "{-I, I}");
}

#[test]
fn reg_cos_egal_x() {
    let e = calc().resoudre_equation("cos(x) = x", "x").unwrap_err();
    assert!(e.message().contains("Analytic solution is unavailable"));
}

#[test]
fn reg_chaine_complexe() {
    let c = calc();
    let r = c.diviser("(3 + 4*I)*(2 − I)", "1 + I").unwrap();
    assert_eq!(r.to_string(), "15/2 - 5*I/2");
}

#[test]
fn reg_log_racine() {
    let r = calc().logarithme("sqrt(2)", Some(2.into())).unwrap();
    assert_eq!(r.to_string(), "1/2");
}
