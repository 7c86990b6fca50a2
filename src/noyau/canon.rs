// src/noyau/canon.rs
//
// Canonicalisation forte (déterministe) : les constructeurs de l’AST.
// - aplatissement Add et Mul
// - suppression neutres (x+0, x*1, x**1, x**0)
// - regroupement des nombres et des termes semblables (2x + 3x = 5x)
// - regroupement des puissances de même base (x·x² = x³, √2·√2 = 2)
// - fusion des radicaux de même indice (√2·√3 = √6), exp(a)·exp(b) = exp(a+b)
// - puissances rationnelles exactes : √12 = 2√3, 1/√2 = √2/2, √(-4) = 2i
// - tri déterministe des termes/facteurs (ordre total)
// - valeurs étendues : ∞ - ∞ = nan, 0·∞ = nan, 1/0 = zoo
//
// Note : on reste volontairement “local” (pas de développement ici, voir simplifie.rs).

use crate::noyau::expr::{Expr, Fonction};
use crate::noyau::fonctions;
use crate::noyau::lecture;
use crate::noyau::nombre::{self, Nombre};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::cmp::Ordering;

/// Passes de regroupement des produits (stabilité atteinte en 2 en pratique).
const MAX_PASSES: usize = 6;

/* ------------------------ clef de tri déterministe ------------------------ */

fn rang(e: &Expr) -> u8 {
    use Expr::*;
    match e {
        Nombre(_) => 0,
        Var(_) => 1,
        Pi => 2,
        E => 3,
        Pow(_, _) => 4,
        Appel(_, _) => 5,
        Mul(_) => 6,
        Add(_) => 7,
        Infini => 8,
        MoinsInfini => 9,
        InfiniComplexe => 10,
        Indefini => 255,
    }
}

fn cmp_listes(a: &[Expr], b: &[Expr]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let o = cmp_expr(x, y);
        if o != Ordering::Equal {
            return o;
        }
    }
    a.len().cmp(&b.len())
}

/// Ordre total structurel.
pub fn cmp_expr(a: &Expr, b: &Expr) -> Ordering {
    use Expr::*;
    rang(a).cmp(&rang(b)).then_with(|| match (a, b) {
        (Nombre(x), Nombre(y)) => x.re.cmp(&y.re).then_with(|| x.im.cmp(&y.im)),
        (Var(x), Var(y)) => x.cmp(y),
        (Pow(b1, e1), Pow(b2, e2)) => cmp_expr(b1, b2).then_with(|| cmp_expr(e1, e2)),
        (Appel(f, x), Appel(g, y)) => f.cmp(g).then_with(|| cmp_expr(x, y)),
        (Add(u), Add(v)) | (Mul(u), Mul(v)) => cmp_listes(u, v),
        _ => Ordering::Equal,
    })
}

/// Facteurs : par base puis exposant (x avant x**2 avant y).
fn cmp_facteur(a: &Expr, b: &Expr) -> Ordering {
    let na = matches!(a, Expr::Nombre(_));
    let nb = matches!(b, Expr::Nombre(_));
    match (na, nb) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }
    let (ba, ea) = a.base_et_exposant();
    let (bb, eb) = b.base_et_exposant();
    cmp_expr(&ba, &bb).then_with(|| cmp_expr(&ea, &eb))
}

/// Termes : par partie non numérique puis coefficient.
fn cmp_terme(a: &Expr, b: &Expr) -> Ordering {
    let (ca, ra) = a.coeff_et_reste();
    let (cb, rb) = b.coeff_et_reste();
    cmp_expr(&ra, &rb)
        .then_with(|| ca.re.cmp(&cb.re))
        .then_with(|| ca.im.cmp(&cb.im))
}

/* ------------------------ utilitaires ------------------------ */

/// Signe d’un exposant (nombre réel ou ±∞), None si inconnu.
fn signe_exposant(e: &Expr) -> Option<Ordering> {
    match e {
        Expr::Infini => Some(Ordering::Greater),
        Expr::MoinsInfini => Some(Ordering::Less),
        Expr::Nombre(z) => nombre::signe_reel(z),
        _ => None,
    }
}

fn est_positif_connu(e: &Expr) -> bool {
    match e {
        Expr::Pi | Expr::E => true,
        Expr::Nombre(z) => nombre::signe_reel(z) == Some(Ordering::Greater),
        _ => false,
    }
}

/// coeff · reste, sans repasser par produit() (reste déjà canonique, sans coefficient).
fn avec_coeff(c: Nombre, reste: Expr) -> Expr {
    if c.is_one() {
        return reste;
    }
    if reste.est_un() {
        return Expr::Nombre(c);
    }
    match reste {
        Expr::Mul(mut fs) => {
            fs.insert(0, Expr::Nombre(c));
            Expr::Mul(fs)
        }
        autre => Expr::Mul(vec![Expr::Nombre(c), autre]),
    }
}

/* ------------------------ Add : aplatissement + regroupement + tri ------------------------ */

fn aplatir_somme(e: Expr, out: &mut Vec<Expr>) {
    match e {
        Expr::Add(v) => {
            for t in v {
                aplatir_somme(t, out);
            }
        }
        autre => out.push(autre),
    }
}

pub fn somme(termes: Vec<Expr>) -> Expr {
    let mut plats = Vec::with_capacity(termes.len());
    for t in termes {
        aplatir_somme(t, &mut plats);
    }

    let mut constante = Nombre::zero();
    let (mut plus_inf, mut moins_inf, mut cplx_inf) = (false, false, false);
    let mut groupes: Vec<(Expr, Nombre)> = Vec::new();

    for t in plats {
        match t {
            Expr::Indefini => return Expr::Indefini,
            Expr::Nombre(z) => constante = constante + z,
            Expr::Infini => plus_inf = true,
            Expr::MoinsInfini => moins_inf = true,
            Expr::InfiniComplexe => cplx_inf = true,
            autre => {
                let (c, r) = autre.coeff_et_reste();
                match groupes.iter_mut().find(|(g, _)| *g == r) {
                    Some((_, cg)) => *cg = &*cg + &c,
                    None => groupes.push((r, c)),
                }
            }
        }
    }

    // ∞ - ∞, zoo ± ∞ : indéterminé
    if (plus_inf && moins_inf) || (cplx_inf && (plus_inf || moins_inf)) {
        return Expr::Indefini;
    }
    let infini = if cplx_inf {
        Some(Expr::InfiniComplexe)
    } else if plus_inf {
        Some(Expr::Infini)
    } else if moins_inf {
        Some(Expr::MoinsInfini)
    } else {
        None
    };

    let mut v: Vec<Expr> = groupes
        .into_iter()
        .filter(|(_, c)| !c.is_zero())
        .map(|(r, c)| avec_coeff(c, r))
        .collect();

    match infini {
        Some(inf) => {
            // ∞ absorbe les termes finis constants
            v.retain(|t| !t.est_constante());
            v.push(inf);
        }
        None => {
            if !constante.is_zero() {
                v.push(Expr::Nombre(constante));
            }
        }
    }

    v.sort_by(cmp_terme);

    match v.len() {
        0 => Expr::zero(),
        1 => v.pop().unwrap_or_else(Expr::zero),
        _ => Expr::Add(v),
    }
}

/* ------------------------ Mul : regroupement par base + reconstruction ------------------------ */

fn aplatir_produit(e: Expr, out: &mut Vec<Expr>) {
    match e {
        Expr::Mul(v) => {
            for f in v {
                aplatir_produit(f, out);
            }
        }
        autre => out.push(autre),
    }
}

fn aplatir_tous(v: Vec<Expr>) -> Vec<Expr> {
    let mut out = Vec::with_capacity(v.len());
    for f in v {
        aplatir_produit(f, &mut out);
    }
    out.sort_by(cmp_facteur);
    out
}

/// Radical numérique n^(r) avec n entier > 0 et r rationnel non entier : (n, r).
fn comme_radical(e: &Expr) -> Option<(BigInt, BigRational)> {
    if let Expr::Pow(b, ex) = e {
        let n = b.comme_rationnel()?;
        let r = ex.comme_rationnel()?;
        if n.is_integer() && n.is_positive() && !r.is_integer() {
            return Some((n.to_integer(), r.clone()));
        }
    }
    None
}

/// Une passe : exp(a)·exp(b), bases égales, radicaux de même exposant.
/// Les nombres et valeurs étendues traversent sans changement.
fn regrouper(facteurs: Vec<Expr>) -> Vec<Expr> {
    let mut sortie: Vec<Expr> = Vec::with_capacity(facteurs.len());
    let mut exps: Vec<Expr> = Vec::new();
    let mut bases: Vec<(Expr, Vec<Expr>)> = Vec::new();

    for f in facteurs {
        match f {
            Expr::Nombre(_)
            | Expr::Infini
            | Expr::MoinsInfini
            | Expr::InfiniComplexe
            | Expr::Indefini => sortie.push(f),
            Expr::Appel(Fonction::Exp, a) => exps.push(*a),
            autre => {
                let (b, e) = autre.base_et_exposant();
                match bases.iter_mut().find(|(g, _)| *g == b) {
                    Some((_, es)) => es.push(e),
                    None => bases.push((b, vec![e])),
                }
            }
        }
    }

    if !exps.is_empty() {
        sortie.push(fonctions::appel(Fonction::Exp, somme(exps)));
    }

    let mut radicaux: Vec<(BigRational, BigInt)> = Vec::new();
    for (b, es) in bases {
        let p = puissance(b, somme(es));
        match comme_radical(&p) {
            Some((n, r)) => match radicaux.iter_mut().find(|(g, _)| *g == r) {
                Some((_, prod)) => *prod *= n,
                None => radicaux.push((r, n)),
            },
            None => sortie.push(p),
        }
    }
    for (r, n) in radicaux {
        sortie.push(puissance(Expr::depuis_bigint(n), Expr::depuis_rat(r)));
    }

    sortie
}

pub fn produit(facteurs: Vec<Expr>) -> Expr {
    let mut courant = aplatir_tous(facteurs);

    for _ in 0..MAX_PASSES {
        let suivant = aplatir_tous(regrouper(courant.clone()));
        if suivant == courant {
            break;
        }
        courant = suivant;
    }

    assembler(courant)
}

/// Reconstruction : coefficient, valeurs étendues, distribution nombre·(a+b).
fn assembler(facteurs: Vec<Expr>) -> Expr {
    let mut coeff = Nombre::one();
    let mut zero = false;
    let mut infini: Option<Expr> = None;
    let mut autres: Vec<Expr> = Vec::with_capacity(facteurs.len());

    for f in facteurs {
        match f {
            Expr::Indefini => return Expr::Indefini,
            Expr::Nombre(z) => {
                if z.is_zero() {
                    zero = true;
                } else {
                    coeff = coeff * z;
                }
            }
            Expr::Infini => {
                if infini.is_none() {
                    infini = Some(Expr::Infini);
                }
            }
            Expr::MoinsInfini => {
                coeff = -coeff;
                if infini.is_none() {
                    infini = Some(Expr::Infini);
                }
            }
            Expr::InfiniComplexe => infini = Some(Expr::InfiniComplexe),
            autre => autres.push(autre),
        }
    }

    if zero {
        // 0·∞ : indéterminé
        return if infini.is_some() {
            Expr::Indefini
        } else {
            Expr::zero()
        };
    }

    // zoo absorbe tout facteur non nul, symbolique ou non
    if matches!(infini, Some(Expr::InfiniComplexe)) {
        let nul = autres.iter().any(|f| f.est_constante() && lecture::est_nul(f));
        return if nul {
            Expr::Indefini
        } else {
            Expr::InfiniComplexe
        };
    }

    if let Some(inf) = infini {
        let signe = match (&inf, nombre::signe_reel(&coeff)) {
            (Expr::Infini, Some(Ordering::Greater)) => Expr::Infini,
            (Expr::Infini, Some(Ordering::Less)) => Expr::MoinsInfini,
            _ => Expr::InfiniComplexe,
        };
        if autres.is_empty() {
            return signe;
        }
        autres.push(signe);
        autres.sort_by(cmp_facteur);
        return Expr::Mul(autres);
    }

    if autres.is_empty() {
        return Expr::Nombre(coeff);
    }

    autres.sort_by(cmp_facteur);

    if autres.len() == 1 {
        let seul = autres.pop().unwrap_or_else(Expr::un);
        if coeff.is_one() {
            return seul;
        }
        // nombre·(a + b) => distribution (forme canonique des sommes)
        if let Expr::Add(termes) = seul {
            return somme(
                termes
                    .into_iter()
                    .map(|t| produit(vec![Expr::Nombre(coeff.clone()), t]))
                    .collect(),
            );
        }
        return Expr::Mul(vec![Expr::Nombre(coeff), seul]);
    }

    if !coeff.is_one() {
        autres.insert(0, Expr::Nombre(coeff));
    }
    Expr::Mul(autres)
}

/* ------------------------ Pow ------------------------ */

fn brut(base: Expr, exposant: Expr) -> Expr {
    Expr::Pow(Box::new(base), Box::new(exposant))
}

pub fn puissance(base: Expr, exposant: Expr) -> Expr {
    use Expr::*;

    if exposant.est_zero() {
        return Expr::un();
    }
    if exposant.est_un() {
        return base;
    }
    if matches!(base, Indefini) || matches!(exposant, Indefini) {
        return Indefini;
    }
    if base.est_un() {
        // 1**∞ : indéterminé
        return if exposant.est_infini() {
            Indefini
        } else {
            Expr::un()
        };
    }

    if base.est_zero() {
        return match signe_exposant(&exposant) {
            Some(Ordering::Greater) => Expr::zero(),
            Some(Ordering::Less) => InfiniComplexe,
            _ => brut(base, exposant),
        };
    }

    if let (Nombre(z), Nombre(w)) = (&base, &exposant) {
        return puissance_numerique(z, w).unwrap_or_else(|| brut(base, exposant));
    }

    match &base {
        E => return fonctions::appel(Fonction::Exp, exposant),
        Infini => match signe_exposant(&exposant) {
            Some(Ordering::Greater) => return Infini,
            Some(Ordering::Less) => return Expr::zero(),
            _ => {}
        },
        MoinsInfini => {
            if let Some(n) = exposant.comme_nombre().and_then(nombre::comme_entier) {
                if n.is_negative() {
                    return Expr::zero();
                }
                return if (&n % BigInt::from(2)).is_zero() {
                    Infini
                } else {
                    MoinsInfini
                };
            }
        }
        InfiniComplexe => match signe_exposant(&exposant) {
            Some(Ordering::Greater) => return InfiniComplexe,
            Some(Ordering::Less) => return Expr::zero(),
            _ => {}
        },
        _ => {}
    }

    // b**(±∞) pour b réel > 0
    if let (Some(b), Some(s)) = (base.comme_rationnel(), exposant_infini(&exposant)) {
        if b.is_positive() {
            let grand = *b > BigRational::one();
            return match (grand, s) {
                (true, Ordering::Greater) | (false, Ordering::Less) => Infini,
                _ => Expr::zero(),
            };
        }
    }

    let entier = exposant
        .comme_nombre()
        .and_then(nombre::comme_entier)
        .is_some();

    match base {
        Pow(b, f) => {
            let reel = exposant.comme_rationnel().is_some() && f.comme_rationnel().is_some();
            if entier || (reel && est_positif_connu(&b)) {
                return puissance(*b, produit(vec![*f, exposant]));
            }
            brut(Pow(b, f), exposant)
        }
        Mul(fs) => {
            if entier {
                return produit(
                    fs.into_iter()
                        .map(|f| puissance(f, exposant.clone()))
                        .collect(),
                );
            }
            // exposant non entier : on sort le coefficient numérique > 0
            if let Some(Nombre(c)) = fs.first() {
                if nombre::signe_reel(c) == Some(Ordering::Greater) && fs.len() >= 2 {
                    let c = Nombre(c.clone());
                    let reste: Vec<Expr> = fs[1..].to_vec();
                    let reste = if reste.len() == 1 {
                        reste.into_iter().next().unwrap_or_else(Expr::un)
                    } else {
                        Mul(reste)
                    };
                    return produit(vec![
                        puissance(c, exposant.clone()),
                        puissance(reste, exposant),
                    ]);
                }
            }
            brut(Mul(fs), exposant)
        }
        Appel(Fonction::Exp, a) if entier => {
            fonctions::appel(Fonction::Exp, produit(vec![*a, exposant]))
        }
        autre => brut(autre, exposant),
    }
}

fn exposant_infini(e: &Expr) -> Option<Ordering> {
    match e {
        Expr::Infini => Some(Ordering::Greater),
        Expr::MoinsInfini => Some(Ordering::Less),
        _ => None,
    }
}

/// z**w pour deux nombres exacts. None => on garde la forme symbolique.
fn puissance_numerique(z: &Nombre, w: &Nombre) -> Option<Expr> {
    if let Some(n) = nombre::comme_entier(w) {
        return nombre::puissance_entiere(z, &n).map(Expr::Nombre);
    }

    let r = nombre::comme_rationnel(w)?;
    let q = r.denom().to_u32()?;
    let p = r.numer();

    match nombre::signe_reel(z) {
        Some(Ordering::Greater) => {
            let rad = nombre::puissance_rationnelle(&z.re, p, q)?;
            Some(construire_radical(rad))
        }
        Some(Ordering::Less) => {
            let abs = -z.clone();
            if abs.is_one() {
                // (-1)**(1/2) = i, sinon forme symbolique
                if q == 2 {
                    return nombre::puissance_entiere(&nombre::unite_i(), p).map(Expr::Nombre);
                }
                return Some(brut(Expr::Nombre(z.clone()), Expr::Nombre(w.clone())));
            }
            let positive = puissance_numerique(&abs, w)?;
            let signe = puissance_numerique(&nombre::entier(-1), w)?;
            Some(produit(vec![signe, positive]))
        }
        Some(Ordering::Equal) => None,
        None => {
            // base complexe : seulement √ exacte
            let demi = nombre::rat(1, 2);
            if *r == demi {
                nombre::racine_carree_gauss(z).map(Expr::Nombre)
            } else if *r == -demi {
                nombre::racine_carree_gauss(z)
                    .and_then(|s| nombre::inverse(&s))
                    .map(Expr::Nombre)
            } else {
                None
            }
        }
    }
}

fn construire_radical(rad: nombre::Radical) -> Expr {
    if rad.indice == 1 {
        let valeur = rad.coeff * BigRational::from_integer(rad.radicande);
        return Expr::depuis_rat(valeur);
    }
    let pow = brut(
        Expr::depuis_bigint(rad.radicande),
        Expr::depuis_rat(BigRational::new(BigInt::one(), BigInt::from(rad.indice))),
    );
    avec_coeff(nombre::reel(rad.coeff), pow)
}
