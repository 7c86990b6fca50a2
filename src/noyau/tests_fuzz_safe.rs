//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariant clé : simplify conserve la valeur numérique (lecture Complex64)

use std::collections::HashMap;
use std::time::{Duration, Instant};

use num_complex::Complex64;

use super::expr::Expr;
use super::format::ModeRendu;
use super::lecture;
use super::{analyser, simplifier};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_rat(rng: &mut Rng) -> String {
    let a = rng.pick(8);
    let b = 1 + rng.pick(8);
    if rng.coin() {
        format!("{a}/{b}")
    } else {
        format!("{a}")
    }
}

fn gen_coeff_pi(rng: &mut Rng) -> String {
    let k = rng.pick(14) as i32 - 6;
    let d = [1, 2, 3, 4, 6, 12][rng.pick(6) as usize];
    if d == 1 {
        format!("{k}*pi")
    } else {
        format!("{k}*pi/{d}")
    }
}

fn gen_atom(rng: &mut Rng, avec_x: bool) -> String {
    match rng.pick(6) {
        0 | 1 => gen_rat(rng),
        2 => "pi".to_string(),
        3 => format!("({})", gen_coeff_pi(rng)),
        4 if avec_x => "x".to_string(),
        _ => "sqrt(2)".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize, avec_x: bool) -> String {
    if depth == 0 {
        return gen_atom(rng, avec_x);
    }
    let sous = |rng: &mut Rng| gen_expr(rng, depth - 1, avec_x);
    match rng.pick(10) {
        0 => gen_atom(rng, avec_x),
        1 => format!("({}+{})", sous(rng), sous(rng)),
        2 => format!("({}-{})", sous(rng), sous(rng)),
        3 => format!("({}*{})", sous(rng), sous(rng)),
        4 => format!("({}/{})", sous(rng), sous(rng)),
        5 => format!("({})**{}", sous(rng), rng.pick(4)),
        6 => format!("sin({})", gen_coeff_pi(rng)),
        7 => format!("cos({})", gen_coeff_pi(rng)),
        8 => format!("tan({})", gen_coeff_pi(rng)),
        _ => {
            let y = gen_atom(rng, avec_x);
            format!("(sin({y})**2 + cos({y})**2)")
        }
    }
}

/* ------------------------ Invariant numérique ------------------------ */

fn valeur(e: &Expr, x: f64) -> Option<Complex64> {
    let mut table = HashMap::new();
    table.insert("x".to_string(), Complex64::new(x, 0.0));
    let z = lecture::evaluer_avec(e, &table)?;
    // au voisinage d’un pôle la comparaison n’a plus de sens
    if z.norm() > 1e6 {
        None
    } else {
        Some(z)
    }
}

fn check_valeur_conservee(texte: &str, avant: &Expr, apres: &Expr) {
    for x in [0.7, 1.3] {
        if let (Some(a), Some(b)) = (valeur(avant, x), valeur(apres, x)) {
            let ecart = (a - b).norm();
            assert!(
                ecart <= 1e-6 * a.norm().max(1.0),
                "valeur changée: expr={texte:?} avant={avant} apres={apres} ({a} vs {b})"
            );
        }
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // Même seed => mêmes expressions => mêmes sorties
    let mut r1 = Rng::new(0xC0FFEE_u64);
    let mut r2 = Rng::new(0xC0FFEE_u64);

    for _ in 0..60 {
        budget(t0, max);
        let e1 = gen_expr(&mut r1, 4, true);
        let e2 = gen_expr(&mut r2, 4, true);
        assert_eq!(e1, e2);

        let a = analyser(&e1).unwrap_or_else(|e| panic!("expr={e1:?} err={e}"));
        let b = analyser(&e2).unwrap_or_else(|e| panic!("expr={e2:?} err={e}"));
        assert_eq!(simplifier(&a), simplifier(&b));
    }
}

#[test]
fn fuzz_safe_simplify_conserve_la_valeur() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut compares = 0usize;

    for _ in 0..120 {
        budget(t0, max);
        let texte = gen_expr(&mut rng, 4, true);
        let e = analyser(&texte).unwrap_or_else(|err| panic!("expr={texte:?} err={err}"));
        let s = simplifier(&e);
        check_valeur_conservee(&texte, &e, &s);
        if valeur(&e, 0.7).is_some() {
            compares += 1;
        }
    }

    // sinon le fuzz ne “balaye” rien
    assert!(compares > 20, "trop peu de comparaisons: {compares}");
}

#[test]
fn fuzz_safe_rendu_ascii_relisible() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0x5EED_u64);
    for _ in 0..80 {
        budget(t0, max);
        let texte = gen_expr(&mut rng, 3, false);
        let e = simplifier(&analyser(&texte).unwrap_or_else(|err| panic!("{texte:?}: {err}")));
        // le rendu ASCII se relit, avec la même valeur
        let relu = analyser(&e.affichage(ModeRendu::Ascii))
            .unwrap_or_else(|err| panic!("relecture de {e}: {err}"));
        check_valeur_conservee(&texte, &e, &relu);
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    let e = analyser(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(e.to_string(), "400");
}
