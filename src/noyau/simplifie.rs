// src/noyau/simplifie.rs
//
// Simplification “globale” (au-delà des constructeurs canoniques) :
// - developper : distribution des produits de sommes, (a+b)**n pour n entier borné
// - numer_denom : réduction au même dénominateur (fractions rationnelles)
// - simplifier : plus petite forme parmi canon / développée / identités trig
//
// Garde-fou : au-delà de MAX_TERMES termes, on renonce au développement (forme gardée).

use crate::noyau::expr::Expr;
use crate::noyau::identites_trig::trig_identites;
use crate::noyau::nombre;

use num_traits::{Signed, ToPrimitive};

/// Nombre maximal de termes produits par un développement.
const MAX_TERMES: usize = 512;

/// Exposant entier maximal développé ((a+b)**n).
const MAX_EXPOSANT: u32 = 24;

/* ------------------------ développement ------------------------ */

fn termes_de(e: &Expr) -> Vec<Expr> {
    match e {
        Expr::Add(ts) => ts.clone(),
        autre => vec![autre.clone()],
    }
}

/// Produit de deux listes de termes (None si trop gros).
fn croiser(a: &[Expr], b: &[Expr]) -> Option<Vec<Expr>> {
    if a.len().saturating_mul(b.len()) > MAX_TERMES {
        return None;
    }
    let mut out = Vec::with_capacity(a.len() * b.len());
    for x in a {
        for y in b {
            out.push(x.clone() * y.clone());
        }
    }
    Some(out)
}

/// Développement complet (bottom-up).
pub fn developper(e: &Expr) -> Expr {
    let e = e.reconstruire_avec(&developper);
    match &e {
        Expr::Mul(fs) if fs.iter().any(|f| matches!(f, Expr::Add(_))) => {
            let mut acc: Vec<Expr> = vec![Expr::un()];
            for f in fs {
                match croiser(&acc, &termes_de(f)) {
                    Some(v) => acc = v,
                    None => return e,
                }
            }
            Expr::somme(acc)
        }
        Expr::Pow(b, ex) if matches!(b.as_ref(), Expr::Add(_)) => {
            let n = match ex.comme_nombre().and_then(nombre::comme_entier) {
                Some(n) if n.is_positive() => n,
                _ => return e,
            };
            let n = match n.to_u32() {
                Some(n) if n <= MAX_EXPOSANT => n,
                _ => return e,
            };
            let base = termes_de(b);
            let mut acc: Vec<Expr> = vec![Expr::un()];
            for _ in 0..n {
                match croiser(&acc, &base) {
                    // regroupement à chaque étape : le nombre de termes reste polynomial
                    Some(v) => acc = termes_de(&Expr::somme(v)),
                    None => return e,
                }
            }
            Expr::somme(acc)
        }
        _ => e,
    }
}

/* ------------------------ numérateur / dénominateur ------------------------ */

/// e = n / d avec d sans puissance négative (fractions rationnelles).
pub fn numer_denom(e: &Expr) -> (Expr, Expr) {
    match e {
        Expr::Add(ts) => {
            let mut n = Expr::zero();
            let mut d = Expr::un();
            for t in ts {
                let (nt, dt) = numer_denom(t);
                if dt == d {
                    n = n + nt;
                } else if dt.est_un() {
                    n = n + nt * d.clone();
                } else if d.est_un() {
                    n = n * dt.clone() + nt;
                    d = dt;
                } else {
                    n = n * dt.clone() + nt * d.clone();
                    d = d * dt;
                }
            }
            (n, d)
        }
        Expr::Mul(fs) => {
            let mut n = Vec::with_capacity(fs.len());
            let mut d = Vec::new();
            for f in fs {
                let (nf, df) = numer_denom(f);
                n.push(nf);
                d.push(df);
            }
            (Expr::produit(n), Expr::produit(d))
        }
        Expr::Pow(b, ex) => match ex.comme_rationnel() {
            Some(r) if r.is_negative() => {
                let pos = Expr::depuis_rat(-r.clone());
                if r.is_integer() {
                    let (nb, db) = numer_denom(b);
                    (
                        Expr::puissance(db, pos.clone()),
                        Expr::puissance(nb, pos),
                    )
                } else {
                    (Expr::un(), Expr::puissance((**b).clone(), pos))
                }
            }
            Some(r) if r.is_integer() => {
                let (nb, db) = numer_denom(b);
                (
                    Expr::puissance(nb, ex.as_ref().clone()),
                    Expr::puissance(db, ex.as_ref().clone()),
                )
            }
            _ => (e.clone(), Expr::un()),
        },
        _ => (e.clone(), Expr::un()),
    }
}

/* ------------------------ simplify ------------------------ */

/// Plus petite forme (taille) parmi : canon, développée, identités trig.
/// À égalité, la forme canonique est gardée.
pub fn simplifier(e: &Expr) -> Expr {
    let canon = e.canon();
    if canon.est_infini() || matches!(canon, Expr::Nombre(_) | Expr::Indefini) {
        return canon;
    }

    let dev = developper(&canon);
    let trig = trig_identites(dev.clone());
    let trig_canon = trig_identites(canon.clone());

    let mut meilleur = canon;
    for cand in [trig_canon, dev, trig] {
        if cand.taille() < meilleur.taille() {
            meilleur = cand;
        }
    }
    log::trace!("simplifier: {e} => {meilleur}");
    meilleur
}
