//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//!
//! Notes (aligné avec l’état actuel du noyau) :
//! - les angles spéciaux sont reconnus sous forme coeff·π, y compris après réduction
//!   modulo la période (sin(π/6 + 2π) = 1/2)
//! - l’annulation A - A => 0 est faite par les constructeurs (termes semblables)
//! - chaîne de régression : complexes, log en base, racines, limite, substitution

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::expr::Expr;
use super::format::ModeRendu;
use super::{analyser, limite, resoudre, simplifier, Direction};

fn eval_ok(expr: &str) -> Expr {
    let e = analyser(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
    simplifier(&e)
}

fn assert_exact_eq(expr: &str, attendu: &str) {
    assert_eq!(eval_ok(expr).to_string(), attendu.trim(), "expr={expr:?}");
}

fn assert_unicode_eq(expr: &str, attendu: &str) {
    assert_eq!(
        eval_ok(expr).affichage(ModeRendu::Unicode),
        attendu.trim(),
        "expr={expr:?}"
    );
}

/// Budget global anti-gel (scientifique + safe).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Invariants trig (angles spéciaux) ------------------------ */

#[test]
fn sci_poles_tan() {
    assert_exact_eq("tan(pi/2)", "zoo");
    assert_exact_eq("tan(3*pi/2)", "zoo");
    assert_exact_eq("tan(-pi/2)", "zoo");
}

#[test]
fn sci_identites_symetrie() {
    // sin(-x) = -sin(x)
    assert_unicode_eq("sin(-pi/4)", "-√(2)/2");
    assert_unicode_eq("sin(pi/4)", "√(2)/2");

    // cos(-x) = cos(x)
    assert_exact_eq("cos(-pi/3)", "1/2");
    assert_exact_eq("cos(pi/3)", "1/2");

    // tan(-x) = -tan(x) (hors pôle)
    assert_exact_eq("tan(-pi/6)", "-sqrt(3)/3");
    assert_exact_eq("tan(pi/6)", "sqrt(3)/3");
}

#[test]
fn sci_periodicite_angles() {
    assert_exact_eq("sin(9*pi/4)", "sqrt(2)/2");
    assert_exact_eq("sin(pi/4 + 2*pi)", "sqrt(2)/2");
    assert_exact_eq("cos(7*pi/3)", "1/2");
    // tan(x + π) = tan(x)
    assert_exact_eq("tan(7*pi/6)", "sqrt(3)/3");
}

#[test]
fn sci_propagation_indefini() {
    // nan contamine les opérations ; zoo absorbe les termes finis
    assert_exact_eq("1 + nan", "nan");
    assert_exact_eq("2 * nan", "nan");
    assert_exact_eq("1 + tan(pi/2)", "zoo");
    assert_exact_eq("oo - oo", "nan");
    assert_exact_eq("0 * oo", "nan");
}

/* ------------------------ Cohérence algébrique (zéro) ------------------------ */

#[test]
fn sci_zero_algebrique() {
    assert_exact_eq("(1/2 + 1/3) - 5/6", "0");
    assert_exact_eq("(2/3 * 3/4) - 1/2", "0");
    assert_exact_eq("sqrt(2)*sqrt(2) - 2", "0");
    assert_exact_eq("1/sqrt(3) - sqrt(3)/3", "0");
    assert_exact_eq("(x + 1)**2 - x**2 - 2*x", "1");
}

/* ------------------------ Chaîne de régression ------------------------ */

#[test]
fn sci_chaine_complexe() {
    assert_exact_eq("(3 + 4*I)*(2 - I)/(1 + I)", "15/2 - 5*I/2");
}

#[test]
fn sci_log_en_base() {
    assert_exact_eq("log(sqrt(2), 2)", "1/2");
    assert_exact_eq("log(8, 2)", "3");
    assert_exact_eq("log(1/8, 2)", "-3");
}

#[test]
fn sci_racines_imaginaires() {
    let s = resoudre(&analyser("x**2 + 1").unwrap(), "x").unwrap();
    assert_eq!(s.to_string(), "{-I, I}");
}

#[test]
fn sci_limite_taylor() {
    let e = analyser("(sin(x) - x)/x**3").unwrap();
    let l = limite(&e, "x", &Expr::zero(), Direction::Bilaterale).unwrap();
    assert_eq!(l.to_string(), "-1/6");
}

#[test]
fn sci_substitution_pythagore() {
    let e = analyser("sin(theta)**2 + cos(theta)**2 + exp(-phi)*phi").unwrap();
    let mut table = HashMap::new();
    table.insert("theta".to_string(), analyser("pi/4").unwrap());
    table.insert("phi".to_string(), analyser("ln(5)").unwrap());
    let r = simplifier(&e.substituer(&table));
    assert_eq!(r.to_string(), "log(5)/5 + 1");
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_sqrt_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // sqrt((...)^2) alterné : reste un carré parfait à chaque étape
    let mut expr = "4".to_string();
    for k in 0..60 {
        expr = if k % 2 == 0 {
            format!("sqrt({expr})")
        } else {
            format!("({expr})^2")
        };
        budget(t0, max);
    }

    // la normalisation ^ -> ** est faite par la couche calcul ; le noyau lit aussi ^
    assert_exact_eq(&expr, "4");
    budget(t0, max);
}

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut expr = String::new();
    for k in 0..80 {
        if k > 0 {
            expr.push_str(" + ");
        }
        expr.push_str("1/2");
        budget(t0, max);
    }

    // 80*(1/2)=40
    assert_exact_eq(&expr, "40");
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // gros numérateur contrôlé (100 chiffres) : 10^100 / 7
    let big = "9".repeat(100);
    let expr = format!("{big}/7 + 1/7");
    let attendu = format!("1{}/7", "0".repeat(100));
    assert_exact_eq(&expr, &attendu);
    budget(t0, max);
}

#[test]
fn sci_stress_puissance_bornee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // exposant gigantesque : forme gardée, pas de gel
    let e = eval_ok("2**(10**30)");
    assert!(matches!(e, Expr::Pow(_, _)));
    budget(t0, max);
}
