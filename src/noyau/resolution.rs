// src/noyau/resolution.rs
//
// Résolution d’équations f(x) = 0 dans C.
//
// Pipeline :
//   f -> (numérateur, dénominateur) -> facteurs du numérateur
//   -> un polynôme développé par facteur -> racine 0 (valuation) -> binôme/bicarrée
//   -> partie sans carré -> racines rationnelles + déflation -> formes closes
//   (degré 1, 2, bicarrée, binôme a·x**n + b, Cardano)
//   -> racines du dénominateur écartées -> dédoublonnage -> tri
//
// Tout le reste est un “ensemble conditionnel” : SolutionIndisponible.

use crate::noyau::erreur::ErreurNoyau;
use crate::noyau::expr::{Expr, Fonction};
use crate::noyau::format::ModeRendu;
use crate::noyau::lecture;
use crate::noyau::nombre;
use crate::noyau::polynome::{partie_sans_carre, racines_rationnelles, Polynome};
use crate::noyau::simplifie::{developper, numer_denom, simplifier};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;

use std::cmp::Ordering;
use std::fmt;

/// Au-delà, pas de pgcd avec la dérivée (croissance des coefficients).
const MAX_DEGRE_SANS_CARRE: usize = 32;

/// Ensemble de solutions.
#[derive(Clone, Debug, PartialEq)]
pub enum Ensemble {
    Fini(Vec<Expr>),
    Vide,
    Complexes,
}

impl Ensemble {
    pub fn affichage(&self, mode: ModeRendu) -> String {
        match self {
            Ensemble::Fini(v) if v.is_empty() => "EmptySet".to_string(),
            Ensemble::Fini(v) => {
                let items: Vec<String> = v.iter().map(|r| r.affichage(mode)).collect();
                format!("{{{}}}", items.join(", "))
            }
            Ensemble::Vide => "EmptySet".to_string(),
            Ensemble::Complexes => "Complexes".to_string(),
        }
    }
}

impl fmt::Display for Ensemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.affichage(ModeRendu::Ascii))
    }
}

/// Résout f = 0 pour la variable `var`.
pub fn resoudre(f: &Expr, var: &str) -> Result<Ensemble, ErreurNoyau> {
    if f.contient_non_fini() {
        return Err(ErreurNoyau::SolutionIndisponible);
    }
    let (num, den) = numer_denom(f);
    log::debug!("résolution: numérateur {num}, dénominateur {den}");

    let developpe = developper(&num);
    if !developpe.contient_var(var) {
        let num = simplifier(&developpe);
        if num.est_zero() || (num.est_constante() && lecture::est_nul(&num)) {
            return Ok(Ensemble::Complexes);
        }
        if num.est_constante() {
            return Ok(Ensemble::Vide);
        }
        return Err(ErreurNoyau::SolutionIndisponible);
    }

    let mut candidates = Vec::new();
    for facteur in facteurs(&num, var) {
        let p = Polynome::depuis_expr(&developper(&facteur), var)
            .ok_or(ErreurNoyau::SolutionIndisponible)?;
        log::trace!("résolution: facteur {facteur} de degré {}", p.degre());
        candidates.extend(racines_polynome(&p).ok_or(ErreurNoyau::SolutionIndisponible)?);
    }

    let mut racines: Vec<Expr> = Vec::with_capacity(candidates.len());
    for r in candidates {
        if annule(&den, var, &r) {
            log::debug!("résolution: {r} annule le dénominateur, écartée");
            continue;
        }
        if !racines.iter().any(|s| meme_valeur(s, &r)) {
            racines.push(r);
        }
    }
    racines.sort_by(cmp_racines);

    if racines.is_empty() {
        Ok(Ensemble::Vide)
    } else {
        Ok(Ensemble::Fini(racines))
    }
}

/* ------------------------ racines d’un polynôme ------------------------ */

/// Facteurs du numérateur qui portent la variable ; f**n (n entier > 0) est réduit à f.
fn facteurs(num: &Expr, var: &str) -> Vec<Expr> {
    let tous = match num {
        Expr::Mul(fs) => fs.clone(),
        autre => vec![autre.clone()],
    };
    tous.into_iter()
        .filter(|f| f.contient_var(var))
        .map(|f| match &f {
            Expr::Pow(b, e)
                if e.comme_nombre()
                    .and_then(nombre::comme_entier)
                    .is_some_and(|n| n.is_positive()) =>
            {
                (**b).clone()
            }
            _ => f,
        })
        .collect()
}

fn racines_polynome(p: &Polynome) -> Option<Vec<Expr>> {
    let mut racines = Vec::new();

    let k = p.valuation();
    if k > 0 {
        racines.push(Expr::zero());
    }
    let mut reste = p.sans_puissances_basses(k);

    // binôme et bicarrée avant la déflation, qui casserait leur forme
    if let Some(rs) = forme_structurelle(reste.coeffs()) {
        racines.extend(rs);
        return Some(racines);
    }

    if let Some(mut q) = reste.coeffs_rationnels() {
        if q.len() <= MAX_DEGRE_SANS_CARRE + 1 {
            q = partie_sans_carre(&q);
        }
        let trouvees = racines_rationnelles(&mut q);
        if !trouvees.is_empty() {
            log::debug!("résolution: {} racine(s) rationnelle(s)", trouvees.len());
            racines.extend(trouvees.into_iter().map(Expr::depuis_rat));
            reste = Polynome::depuis_rationnels(&q);
        }
    }

    racines.extend(formes_closes(reste.coeffs())?);
    Some(racines)
}

fn formes_closes(c: &[Expr]) -> Option<Vec<Expr>> {
    let n = c.len().saturating_sub(1);
    if n == 0 {
        return Some(Vec::new());
    }
    let nul = |k: usize| c[k].est_zero();

    if n == 1 {
        log::trace!("résolution: forme linéaire");
        return Some(vec![simplifier(&(-c[0].clone() / c[1].clone()))]);
    }
    if n == 2 {
        log::trace!("résolution: forme quadratique");
        return Some(racines_quadratiques(&c[2], &c[1], &c[0]).to_vec());
    }
    if let Some(rs) = forme_structurelle(c) {
        return Some(rs);
    }
    if n == 3 {
        log::trace!("résolution: Cardano");
        return Some(cardano(&c[3], &c[2], &c[1], &c[0]));
    }
    None
}

/// Binôme a·x**n + b (n ≥ 3) ou bicarrée a·x⁴ + b·x² + c.
fn forme_structurelle(c: &[Expr]) -> Option<Vec<Expr>> {
    let n = c.len().saturating_sub(1);
    if n < 3 {
        return None;
    }
    let nul = |k: usize| c[k].est_zero();
    if (1..n).all(nul) {
        log::trace!("résolution: binôme de degré {n}");
        return Some(binome(&c[n], &c[0], n));
    }
    if n == 4 && nul(1) && nul(3) {
        log::trace!("résolution: forme bicarrée");
        let mut out = Vec::with_capacity(4);
        for y in racines_quadratiques(&c[4], &c[2], &c[0]) {
            let r = simplifier(&y.racine());
            out.push(simplifier(&-r.clone()));
            out.push(r);
        }
        return Some(out);
    }
    None
}

/// Racines de a·x² + b·x + c : (-b + √D)/(2a), (-b - √D)/(2a).
pub fn racines_quadratiques(a: &Expr, b: &Expr, c: &Expr) -> [Expr; 2] {
    let d = simplifier(&(b.clone() * b.clone() - Expr::entier(4) * a.clone() * c.clone()));
    let rd = d.racine();
    let deux_a = Expr::entier(2) * a.clone();
    [
        simplifier(&((-b.clone() + rd.clone()) / deux_a.clone())),
        simplifier(&((-b.clone() - rd) / deux_a)),
    ]
}

/// a·x**n + b = 0 : racines n-ièmes de w = -b/a.
fn binome(a: &Expr, b: &Expr, n: usize) -> Vec<Expr> {
    let w = simplifier(&(-b.clone() / a.clone()));
    let (module, decalage) = match lecture::signe(&w) {
        Some(Ordering::Greater) => (w, 0),
        Some(Ordering::Less) => (simplifier(&-w), 1),
        _ => (w, 0),
    };
    let nn = BigInt::from(n);
    let rho = Expr::puissance(
        module,
        Expr::depuis_rat(BigRational::new(BigInt::from(1), nn.clone())),
    );
    (0..n)
        .map(|k| {
            // angle (2k + décalage)·π/n
            let r = BigRational::new(BigInt::from(2 * k + decalage), nn.clone());
            let angle = Expr::depuis_rat(r) * Expr::Pi;
            let z = Expr::appel(Fonction::Cos, angle.clone())
                + Expr::i() * Expr::appel(Fonction::Sin, angle);
            simplifier(&(rho.clone() * z))
        })
        .collect()
}

/// a·x³ + b·x² + c·x + d = 0 (formule de Cardano).
fn cardano(a: &Expr, b: &Expr, c: &Expr, d: &Expr) -> Vec<Expr> {
    let n = Expr::entier;
    let (a, b, c, d) = (a.clone(), b.clone(), c.clone(), d.clone());

    // x = y - b/(3a) ; y³ + p·y + q = 0
    let decal = simplifier(&(-b.clone() / (n(3) * a.clone())));
    let p = simplifier(
        &((n(3) * a.clone() * c.clone() - b.clone() * b.clone())
            / (n(3) * a.clone() * a.clone())),
    );
    let q = simplifier(
        &((n(2) * Expr::puissance(b.clone(), n(3)) - n(9) * a.clone() * b.clone() * c
            + n(27) * a.clone() * a.clone() * d)
            / (n(27) * Expr::puissance(a, n(3)))),
    );

    if p.est_zero() {
        if q.est_zero() {
            return vec![decal.clone(), decal.clone(), decal];
        }
        return binome(&n(1), &q, 3)
            .into_iter()
            .map(|y| simplifier(&(y + decal.clone())))
            .collect();
    }

    let moitie_q = simplifier(&(q.clone() / n(2)));
    let delta = simplifier(
        &(moitie_q.clone() * moitie_q.clone() + Expr::puissance(p.clone(), n(3)) / n(27)),
    );
    let s = delta.racine();
    let mut u3 = simplifier(&(-moitie_q.clone() + s.clone()));
    if u3.est_zero() {
        u3 = simplifier(&(-moitie_q - s));
    }
    let u = Expr::puissance(u3, Expr::rationnel(1, 3));
    let omega = Expr::rationnel(-1, 2) + Expr::i() * Expr::entier(3).racine() / n(2);

    (0..3)
        .map(|k| {
            let uk = simplifier(&(u.clone() * Expr::puissance(omega.clone(), n(k))));
            let y = uk.clone() - p.clone() / (n(3) * uk);
            simplifier(&(y + decal.clone()))
        })
        .collect()
}

/* ------------------------ filtrage / tri ------------------------ */

/// La racine annule-t-elle le dénominateur (ou le rend-elle infini) ?
fn annule(den: &Expr, var: &str, r: &Expr) -> bool {
    if !den.contient_var(var) {
        return false;
    }
    let v = simplifier(&den.substituer_var(var, r));
    v.est_zero() || v.contient_non_fini() || (v.est_constante() && lecture::est_nul(&v))
}

fn meme_valeur(a: &Expr, b: &Expr) -> bool {
    if a == b {
        return true;
    }
    a.est_constante() && b.est_constante() && lecture::est_nul(&(a.clone() - b.clone()))
}

/// Réels croissants, puis complexes (re, im), puis symboliques (texte).
fn cmp_racines(a: &Expr, b: &Expr) -> Ordering {
    fn cle(e: &Expr) -> (u8, f64, f64, String) {
        match lecture::evaluer(e) {
            Some(z) if lecture::est_reel(e) => (0, z.re, 0.0, String::new()),
            Some(z) => (1, z.re, z.im, String::new()),
            None => (2, 0.0, 0.0, e.to_string()),
        }
    }
    let (ka, kb) = (cle(a), cle(b));
    ka.0.cmp(&kb.0)
        .then(ka.1.partial_cmp(&kb.1).unwrap_or(Ordering::Equal))
        .then(ka.2.partial_cmp(&kb.2).unwrap_or(Ordering::Equal))
        .then_with(|| ka.3.cmp(&kb.3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::eval::analyser;
    use pretty_assertions::assert_eq;

    fn resout(s: &str) -> Result<String, ErreurNoyau> {
        resoudre(&analyser(s).unwrap(), "x").map(|e| e.to_string())
    }

    #[test]
    fn quintique_factorisable() {
        assert_eq!(resout("x**5 - x").unwrap(), "{-1, 0, 1, -I, I}");
    }

    #[test]
    fn quadratique_complexe() {
        assert_eq!(resout("x**2 + 1").unwrap(), "{-I, I}");
        assert_eq!(resout("x**2 - 2").unwrap(), "{-sqrt(2), sqrt(2)}");
    }

    #[test]
    fn lineaire_symbolique() {
        assert_eq!(resout("a*x - b").unwrap(), "{b/a}");
    }

    #[test]
    fn racine_du_denominateur_ecartee() {
        assert_eq!(resout("(x**2 - 1)/(x - 1)").unwrap(), "{-1}");
        assert_eq!(resout("1/x").unwrap(), "EmptySet");
    }

    #[test]
    fn ensembles_degeneres() {
        assert_eq!(resout("x - x").unwrap(), "Complexes");
        assert_eq!(resout("x - x + 1").unwrap(), "EmptySet");
    }

    #[test]
    fn binome_cubique() {
        // x³ = 8 : 2, -1 ± I·√3
        let s = resoudre(&analyser("x**3 - 8").unwrap(), "x").unwrap();
        let Ensemble::Fini(v) = s else {
            panic!("ensemble fini attendu");
        };
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], Expr::entier(2));
    }

    #[test]
    fn binome_de_degre_premier() {
        // la racine 2 ne doit pas casser la forme binôme par déflation
        let s = resoudre(&analyser("x**5 - 32").unwrap(), "x").unwrap();
        let Ensemble::Fini(v) = s else {
            panic!("ensemble fini attendu");
        };
        assert_eq!(v.len(), 5);
        assert_eq!(v[0], Expr::entier(2));
        assert!(v[1..].iter().all(|r| !lecture::est_reel(r)));
    }

    #[test]
    fn binome_de_degre_douze() {
        let s = resoudre(&analyser("x**12 - 4096").unwrap(), "x").unwrap();
        let Ensemble::Fini(v) = s else {
            panic!("ensemble fini attendu");
        };
        assert_eq!(v.len(), 12);
        assert_eq!(v[0], Expr::entier(-2));
        assert_eq!(v[1], Expr::entier(2));
        assert!(v.contains(&(Expr::entier(2) * Expr::i())));
    }

    #[test]
    fn racines_de_l_unite_degre_cent() {
        let s = resoudre(&analyser("x**100 - 1").unwrap(), "x").unwrap();
        let Ensemble::Fini(v) = s else {
            panic!("ensemble fini attendu");
        };
        assert_eq!(v.len(), 100);
        assert_eq!(v[0], Expr::entier(-1));
        assert_eq!(v[1], Expr::entier(1));
    }

    #[test]
    fn facteurs_repetes() {
        assert_eq!(resout("(x**2 + 1)**3").unwrap(), "{-I, I}");
        assert_eq!(resout("(x - 1)**50").unwrap(), "{1}");
        assert_eq!(resout("x**6 + 3*x**4 + 3*x**2 + 1").unwrap(), "{-I, I}");
        assert_eq!(resout("(x - 1)**3*(x + 2)**2").unwrap(), "{-2, 1}");
    }

    #[test]
    fn annulation_apres_developpement() {
        assert_eq!(resout("(x + 1)**2 - x**2 - 2*x - 1").unwrap(), "Complexes");
    }

    #[test]
    fn bicarree() {
        assert_eq!(resout("x**4 - 5*x**2 + 6").unwrap().matches(',').count(), 3);
    }

    #[test]
    fn transcendante_indisponible() {
        assert_eq!(
            resoudre(&analyser("cos(x) - x").unwrap(), "x"),
            Err(ErreurNoyau::SolutionIndisponible)
        );
    }
}
