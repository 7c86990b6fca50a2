// src/noyau/fonctions.rs
//
// Règles d’évaluation exacte des fonctions élémentaires (constructeur appel()).
// - sin/cos/tan : angles spéciaux (trig.rs), parité, décalages par kπ/2
// - exp : exp(0) = 1, exp(1) = E, exp(log(y)) = y, exp(c·log(y)) = y**c,
//         exp(i·kπ/2) par Euler, exp(±∞)
// - log : log(1) = 0, log(E) = 1, log(a**r) = r·log(a), log(-a) = log(a) + iπ
// - Abs : module des nombres, signe des constantes (lecture numérique)
//
// SAFE: aucune règle ne fait grossir l’argument ; hors règle on garde Appel(f, x).

use crate::noyau::expr::{Expr, Fonction};
use crate::noyau::lecture;
use crate::noyau::nombre;
use crate::noyau::trig::{quart_de_tour, reduire_angle};

use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use std::cmp::Ordering;

pub fn appel(f: Fonction, x: Expr) -> Expr {
    if matches!(x, Expr::Indefini) {
        return Expr::Indefini;
    }
    match f {
        Fonction::Sin | Fonction::Cos | Fonction::Tan => trigo(f, x),
        Fonction::Exp => exponentielle(x),
        Fonction::Log => logarithme(x),
        Fonction::Abs => valeur_absolue(x),
    }
}

fn brut(f: Fonction, x: Expr) -> Expr {
    Expr::Appel(f, Box::new(x))
}

/* ------------------------ sin / cos / tan ------------------------ */

fn impaire(f: Fonction) -> bool {
    matches!(f, Fonction::Sin | Fonction::Tan)
}

fn trigo(f: Fonction, x: Expr) -> Expr {
    if x.est_infini() {
        return Expr::Indefini;
    }
    if x.est_zero() {
        return if f == Fonction::Cos {
            Expr::un()
        } else {
            Expr::zero()
        };
    }

    // r·π
    if let Some(r) = x.as_coeff_pi() {
        return reduire_angle(f, &r);
    }

    // parité : f(-y)
    let (c, _) = x.coeff_et_reste();
    if nombre::signe_reel(&c) == Some(Ordering::Less) {
        let y = -x;
        let v = appel(f, y);
        return if impaire(f) { -v } else { v };
    }

    // décalage : f(y + r·π)
    let (r, reste) = x.separe_multiple_pi();
    if !r.is_zero() && !reste.est_zero() {
        if let Some(k) = quart_de_tour(&r) {
            let y = reste;
            return match (f, k) {
                (_, 0) => appel(f, y),
                (Fonction::Sin, 1) => appel(Fonction::Cos, y),
                (Fonction::Sin, 2) => -appel(Fonction::Sin, y),
                (Fonction::Sin, _) => -appel(Fonction::Cos, y),
                (Fonction::Cos, 1) => -appel(Fonction::Sin, y),
                (Fonction::Cos, 2) => -appel(Fonction::Cos, y),
                (Fonction::Cos, _) => appel(Fonction::Sin, y),
                // tan est π-périodique ; tan(y ± π/2) = -1/tan(y)
                (_, 2) => appel(Fonction::Tan, y),
                _ => -appel(Fonction::Tan, y).inverse(),
            };
        }
        // réduction de la partie r·π dans la période
        let periode = if f == Fonction::Tan { 1 } else { 2 };
        let reduit = crate::noyau::trig::mod_rationnel(&r, periode);
        if reduit != r {
            let arg = reste + Expr::depuis_rat(reduit) * Expr::Pi;
            return appel(f, arg);
        }
    }

    brut(f, x)
}

/* ------------------------ exp ------------------------ */

/// i·r·π avec r rationnel => r.
fn comme_i_pi(e: &Expr) -> Option<BigRational> {
    if let Expr::Mul(fs) = e {
        if let [Expr::Nombre(z), Expr::Pi] = fs.as_slice() {
            if z.re.is_zero() {
                return Some(z.im.clone());
            }
        }
    }
    None
}

/// exp(i·rπ) pour 2r entier : 1, i, -1, -i.
fn euler_quart(r: &BigRational) -> Option<Expr> {
    let k = quart_de_tour(r)?;
    Some(match k {
        0 => Expr::un(),
        1 => Expr::i(),
        2 => Expr::entier(-1),
        _ => -Expr::i(),
    })
}

fn exponentielle(x: Expr) -> Expr {
    match &x {
        Expr::Infini => return Expr::Infini,
        Expr::MoinsInfini => return Expr::zero(),
        Expr::InfiniComplexe => return Expr::Indefini,
        Expr::Appel(Fonction::Log, y) => return (**y).clone(),
        _ => {}
    }
    if x.est_zero() {
        return Expr::un();
    }
    if x.est_un() {
        return Expr::E;
    }
    if let Some((c, y)) = x.comme_multiple_log() {
        return Expr::puissance(y, Expr::depuis_rat(c));
    }
    if let Some(r) = comme_i_pi(&x) {
        if let Some(v) = euler_quart(&r) {
            return v;
        }
    }

    // exp(a + c·log(y) + i·kπ/2) = y**c · i**k · exp(a)
    if let Expr::Add(termes) = &x {
        let mut facteurs: Vec<Expr> = Vec::new();
        let mut reste: Vec<Expr> = Vec::with_capacity(termes.len());
        for t in termes {
            if let Some((c, y)) = t.comme_multiple_log() {
                facteurs.push(Expr::puissance(y, Expr::depuis_rat(c)));
                continue;
            }
            if let Some(v) = comme_i_pi(t).as_ref().and_then(euler_quart) {
                facteurs.push(v);
                continue;
            }
            reste.push(t.clone());
        }
        if !facteurs.is_empty() {
            let reste = Expr::somme(reste);
            facteurs.push(appel(Fonction::Exp, reste));
            return Expr::produit(facteurs);
        }
    }

    brut(Fonction::Exp, x)
}

/* ------------------------ log ------------------------ */

fn logarithme(x: Expr) -> Expr {
    match &x {
        Expr::E => return Expr::un(),
        Expr::Infini | Expr::MoinsInfini | Expr::InfiniComplexe => {
            return if matches!(x, Expr::InfiniComplexe) {
                Expr::InfiniComplexe
            } else {
                Expr::Infini
            }
        }
        Expr::Appel(Fonction::Exp, y) => {
            if y.comme_rationnel().is_some() {
                return (**y).clone();
            }
        }
        _ => {}
    }
    if x.est_un() {
        return Expr::zero();
    }
    if x.est_zero() {
        return Expr::InfiniComplexe;
    }

    if let Expr::Nombre(z) = &x {
        if let Some(r) = nombre::comme_rationnel(z) {
            // log(-a) = log(a) + iπ
            if r.is_negative() {
                let a = Expr::depuis_rat(-r.clone());
                return appel(Fonction::Log, a) + Expr::i() * Expr::Pi;
            }
            // log(1/d) = -log(d)
            if r.numer().is_one() {
                let d = Expr::depuis_bigint(r.denom().clone());
                return -appel(Fonction::Log, d);
            }
        } else if z.re.is_zero() {
            // log(b·i) = log|b| ± iπ/2
            let b = z.im.clone();
            let demi_pi = Expr::rationnel(1, 2) * Expr::Pi;
            let signe = if b.is_negative() { -Expr::i() } else { Expr::i() };
            return appel(Fonction::Log, Expr::depuis_rat(b.abs())) + signe * demi_pi;
        }
    }

    // log(a**r) = r·log(a) pour a > 0, r rationnel
    if let Expr::Pow(b, e) = &x {
        if let (Some(base), Some(r)) = (b.comme_rationnel(), e.comme_rationnel()) {
            if base.is_positive() {
                return Expr::depuis_rat(r.clone()) * appel(Fonction::Log, (**b).clone());
            }
        }
    }

    brut(Fonction::Log, x)
}

/// x = c^m avec c primitif : (c, m), pour x rationnel > 0 ou c**q.
fn puissance_de_base(e: &Expr) -> Option<(BigRational, BigRational)> {
    match e {
        Expr::Nombre(_) => {
            let r = e.comme_rationnel()?;
            let (c, m) = nombre::base_primitive(r)?;
            Some((c, BigRational::from_integer(m.into())))
        }
        Expr::Pow(b, ex) => {
            let r = b.comme_rationnel()?;
            let q = ex.comme_rationnel()?;
            let (c, m) = nombre::base_primitive(r)?;
            Some((c, BigRational::from_integer(m.into()) * q))
        }
        _ => None,
    }
}

/// log(x, base) : quotient exact quand x et base sont des puissances d’une même base.
pub fn log_base(x: Expr, base: Expr) -> Expr {
    if matches!(base, Expr::E) {
        return appel(Fonction::Log, x);
    }
    if x.est_un() {
        return Expr::zero();
    }
    if let (Some((cx, mx)), Some((cb, mb))) = (puissance_de_base(&x), puissance_de_base(&base)) {
        if cx == cb && !mb.is_zero() {
            return Expr::depuis_rat(mx / mb);
        }
        // log(1/8, 2) : bases inverses
        if cx == cb.recip() && !mb.is_zero() {
            return Expr::depuis_rat(-(mx / mb));
        }
    }
    appel(Fonction::Log, x) / appel(Fonction::Log, base)
}

/* ------------------------ Abs ------------------------ */

fn valeur_absolue(x: Expr) -> Expr {
    match &x {
        Expr::Nombre(z) => {
            if let Some(r) = nombre::comme_rationnel(z) {
                return Expr::depuis_rat(r.abs());
            }
            let module2 = Expr::Nombre(z * z.conj());
            return module2.racine();
        }
        Expr::Pi | Expr::E => return x,
        Expr::Infini | Expr::MoinsInfini | Expr::InfiniComplexe => return Expr::Infini,
        Expr::Appel(Fonction::Abs, _) => return x,
        Expr::Mul(fs) => {
            if let Some(Expr::Nombre(c)) = fs.first() {
                if !c.is_one() {
                    let (c, reste) = x.coeff_et_reste();
                    return appel(Fonction::Abs, Expr::Nombre(c)) * appel(Fonction::Abs, reste);
                }
            }
        }
        _ => {}
    }

    // constante réelle : signe par lecture numérique
    if x.est_constante() && !x.contient_non_fini() && lecture::est_reel(&x) {
        match lecture::signe(&x) {
            Some(Ordering::Greater) | Some(Ordering::Equal) => return x,
            Some(Ordering::Less) => return -x,
            None => {}
        }
    }

    brut(Fonction::Abs, x)
}
