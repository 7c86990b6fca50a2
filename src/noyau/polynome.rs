// src/noyau/polynome.rs
//
// Polynômes en une variable, coefficients symboliques (sans la variable).
//
// - extraction depuis une expression DÉVELOPPÉE (somme de monômes c·x**k)
// - racines rationnelles exactes (théorème des racines rationnelles + déflation)
//
// Garde-fous : degré ≤ MAX_DEGRE, recherche de diviseurs bornée par MAX_DIVISEUR.

use crate::noyau::expr::Expr;
use crate::noyau::lecture;
use crate::noyau::nombre;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Degré maximal accepté.
pub const MAX_DEGRE: usize = 128;

/// Au-delà, on ne cherche pas les diviseurs (coût en racine carrée).
const MAX_DIVISEUR: u64 = 1_000_000_000_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Polynome {
    /// coeffs[k] : coefficient de x**k ; le dernier est non nul (vide : polynôme nul)
    coeffs: Vec<Expr>,
}

fn est_nul(c: &Expr) -> bool {
    c.est_zero() || (c.est_constante() && lecture::est_nul(c))
}

impl Polynome {
    pub fn new(mut coeffs: Vec<Expr>) -> Polynome {
        while coeffs.last().is_some_and(est_nul) {
            coeffs.pop();
        }
        Polynome { coeffs }
    }

    /// Lit un polynôme en `var` ; None si un terme n’est pas un monôme.
    pub fn depuis_expr(e: &Expr, var: &str) -> Option<Polynome> {
        let termes = match e {
            Expr::Add(ts) => ts.clone(),
            autre => vec![autre.clone()],
        };
        let mut par_degre: Vec<Vec<Expr>> = Vec::new();
        for t in &termes {
            let (k, c) = monome(t, var)?;
            if k > MAX_DEGRE {
                return None;
            }
            if par_degre.len() <= k {
                par_degre.resize(k + 1, Vec::new());
            }
            par_degre[k].push(c);
        }
        Some(Polynome::new(
            par_degre.into_iter().map(Expr::somme).collect(),
        ))
    }

    pub fn coeffs(&self) -> &[Expr] {
        &self.coeffs
    }

    /// Degré (0 pour une constante ou le polynôme nul).
    pub fn degre(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Multiplicité de la racine 0.
    pub fn valuation(&self) -> usize {
        self.coeffs.iter().take_while(|c| est_nul(c)).count()
    }

    /// Divise par x**k.
    pub fn sans_puissances_basses(&self, k: usize) -> Polynome {
        Polynome::new(self.coeffs.iter().skip(k).cloned().collect())
    }

    /// Coefficients rationnels réels, si tous le sont.
    pub fn coeffs_rationnels(&self) -> Option<Vec<BigRational>> {
        self.coeffs
            .iter()
            .map(|c| c.comme_rationnel().cloned())
            .collect()
    }

    pub fn depuis_rationnels(coeffs: &[BigRational]) -> Polynome {
        Polynome::new(coeffs.iter().cloned().map(Expr::depuis_rat).collect())
    }
}

/// c·x**k => (k, c)
fn monome(t: &Expr, var: &str) -> Option<(usize, Expr)> {
    let facteurs = match t {
        Expr::Mul(fs) => fs.clone(),
        autre => vec![autre.clone()],
    };
    let mut k = 0usize;
    let mut coeff = Vec::with_capacity(facteurs.len());
    for f in facteurs {
        if !f.contient_var(var) {
            coeff.push(f);
            continue;
        }
        match &f {
            Expr::Var(v) if v == var => k += 1,
            Expr::Pow(b, ex) if matches!(b.as_ref(), Expr::Var(v) if v == var) => {
                let n = ex.comme_nombre().and_then(nombre::comme_entier)?;
                k += n.to_usize()?;
            }
            _ => return None,
        }
    }
    Some((k, Expr::produit(coeff)))
}

/* ------------------------ racines rationnelles ------------------------ */

/// P(r) par Horner (coefficients du plus bas degré au plus haut).
pub fn horner(coeffs: &[BigRational], r: &BigRational) -> BigRational {
    coeffs
        .iter()
        .rev()
        .fold(BigRational::zero(), |acc, c| acc * r + c)
}

/// Quotient de P par (x - r) (division synthétique).
pub fn deflation(coeffs: &[BigRational], r: &BigRational) -> Vec<BigRational> {
    let n = coeffs.len().saturating_sub(1);
    let mut q = vec![BigRational::zero(); n];
    let mut acc = BigRational::zero();
    for k in (1..=n).rev() {
        acc = &acc * r + &coeffs[k];
        q[k - 1] = acc.clone();
    }
    q
}

/* ------------------------ partie sans carré ------------------------ */

fn sans_zeros_hauts(mut c: Vec<BigRational>) -> Vec<BigRational> {
    while c.last().is_some_and(Zero::is_zero) {
        c.pop();
    }
    c
}

/// Dérivée formelle.
pub fn derivee(coeffs: &[BigRational]) -> Vec<BigRational> {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, c)| c * BigRational::from_integer(BigInt::from(k)))
        .collect()
}

/// Division euclidienne (quotient, reste) ; `b` non nul.
fn division(a: &[BigRational], b: &[BigRational]) -> (Vec<BigRational>, Vec<BigRational>) {
    let b = sans_zeros_hauts(b.to_vec());
    let mut r = sans_zeros_hauts(a.to_vec());
    let Some(tete) = b.last().cloned() else {
        return (Vec::new(), r);
    };
    let db = b.len() - 1;
    if r.len() < b.len() {
        return (Vec::new(), r);
    }
    let mut q = vec![BigRational::zero(); r.len() - db];
    while r.len() >= b.len() {
        let dr = r.len() - 1;
        let f = &r[dr] / &tete;
        let s = dr - db;
        for (k, bk) in b.iter().enumerate() {
            r[s + k] = &r[s + k] - &f * bk;
        }
        q[s] = f;
        r.pop();
        r = sans_zeros_hauts(r);
    }
    (q, r)
}

/// Pgcd unitaire (algorithme d’Euclide sur Q).
fn pgcd(a: &[BigRational], b: &[BigRational]) -> Vec<BigRational> {
    let mut a = sans_zeros_hauts(a.to_vec());
    let mut b = sans_zeros_hauts(b.to_vec());
    while !b.is_empty() {
        let (_, r) = division(&a, &b);
        a = b;
        b = r;
    }
    if let Some(t) = a.last().cloned() {
        for c in a.iter_mut() {
            *c = &*c / &t;
        }
    }
    a
}

/// P / pgcd(P, P') : mêmes racines, toutes simples.
pub fn partie_sans_carre(coeffs: &[BigRational]) -> Vec<BigRational> {
    let d = sans_zeros_hauts(derivee(coeffs));
    if d.is_empty() {
        return coeffs.to_vec();
    }
    let g = pgcd(coeffs, &d);
    if g.len() <= 1 {
        return coeffs.to_vec();
    }
    division(coeffs, &g).0
}

/// Coefficients entiers proportionnels (multipliés par le ppcm des dénominateurs).
fn entiers_proportionnels(coeffs: &[BigRational]) -> Vec<BigInt> {
    let ppcm = coeffs
        .iter()
        .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
    coeffs
        .iter()
        .map(|c| (c * BigRational::from_integer(ppcm.clone())).to_integer())
        .collect()
}

/// Diviseurs positifs de |n| (None si |n| est trop grand ou nul).
fn diviseurs(n: &BigInt) -> Option<Vec<BigInt>> {
    let n = n.abs().to_u64()?;
    if n == 0 || n > MAX_DIVISEUR {
        return None;
    }
    let mut petits = Vec::new();
    let mut grands = Vec::new();
    let mut i = 1u64;
    while i * i <= n {
        if n % i == 0 {
            petits.push(BigInt::from(i));
            if i * i != n {
                grands.push(BigInt::from(n / i));
            }
        }
        i += 1;
    }
    petits.extend(grands.into_iter().rev());
    Some(petits)
}

/// Extrait toutes les racines rationnelles (avec multiplicité) ; `coeffs` devient le quotient.
///
/// Suppose coeffs[0] ≠ 0 (racine nulle déjà retirée).
pub fn racines_rationnelles(coeffs: &mut Vec<BigRational>) -> Vec<BigRational> {
    let mut out = Vec::new();
    'recherche: while coeffs.len() > 1 {
        let entiers = entiers_proportionnels(coeffs);
        let (Some(ps), Some(qs)) = (
            entiers.first().and_then(diviseurs),
            entiers.last().and_then(diviseurs),
        ) else {
            break;
        };
        for q in &qs {
            for p in &ps {
                if !p.gcd(q).is_one() {
                    continue;
                }
                for r in [
                    BigRational::new(-p.clone(), q.clone()),
                    BigRational::new(p.clone(), q.clone()),
                ] {
                    if horner(coeffs, &r).is_zero() {
                        log::trace!("racine rationnelle: {r}");
                        *coeffs = deflation(coeffs, &r);
                        out.push(r);
                        continue 'recherche;
                    }
                }
            }
        }
        break;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::eval::analyser;
    use crate::noyau::nombre::rat;
    use pretty_assertions::assert_eq;

    #[test]
    fn lecture_coefficients() {
        let e = analyser("a*x**2 + b*x + c").unwrap();
        let p = Polynome::depuis_expr(&e, "x").unwrap();
        assert_eq!(p.degre(), 2);
        assert_eq!(p.coeffs()[0], Expr::var("c"));
        assert_eq!(p.coeffs()[2], Expr::var("a"));
    }

    #[test]
    fn non_polynomial() {
        let e = analyser("cos(x) - x").unwrap();
        assert_eq!(Polynome::depuis_expr(&e, "x"), None);
        let e = analyser("1/x + 1").unwrap();
        assert_eq!(Polynome::depuis_expr(&e, "x"), None);
    }

    #[test]
    fn valuation_et_division() {
        let e = analyser("x**5 - x").unwrap();
        let p = Polynome::depuis_expr(&e, "x").unwrap();
        assert_eq!(p.valuation(), 1);
        assert_eq!(p.sans_puissances_basses(1).degre(), 4);
    }

    #[test]
    fn racines_rationnelles_avec_multiplicite() {
        // (2x - 1)(x + 3)^2 = 2x³ + 11x² + 12x - 9
        let mut c = vec![rat(-9, 1), rat(12, 1), rat(11, 1), rat(2, 1)];
        let mut r = racines_rationnelles(&mut c);
        r.sort();
        assert_eq!(r, vec![rat(-3, 1), rat(-3, 1), rat(1, 2)]);
        assert_eq!(c, vec![rat(2, 1)]);
    }

    #[test]
    fn sans_racine_rationnelle() {
        let mut c = vec![rat(1, 1), rat(0, 1), rat(1, 1)];
        assert!(racines_rationnelles(&mut c).is_empty());
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn sans_carre_cube_de_x2_plus_1() {
        // (x² + 1)³ = x⁶ + 3x⁴ + 3x² + 1
        let c = vec![rat(1, 1), rat(0, 1), rat(3, 1), rat(0, 1), rat(3, 1), rat(0, 1), rat(1, 1)];
        assert_eq!(partie_sans_carre(&c), vec![rat(1, 1), rat(0, 1), rat(1, 1)]);
    }

    #[test]
    fn sans_carre_inchange_si_racines_simples() {
        // x² - 3x + 2
        let c = vec![rat(2, 1), rat(-3, 1), rat(1, 1)];
        assert_eq!(partie_sans_carre(&c), c);
        assert_eq!(derivee(&c), vec![rat(-3, 1), rat(2, 1)]);
    }

    #[test]
    fn deflation_synthetique() {
        // x² - 1 = (x - 1)(x + 1)
        let q = deflation(&[rat(-1, 1), rat(0, 1), rat(1, 1)], &rat(1, 1));
        assert_eq!(q, vec![rat(1, 1), rat(1, 1)]);
    }
}
