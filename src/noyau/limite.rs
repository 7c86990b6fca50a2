// src/noyau/limite.rs
//
// Limites (unilatérales / bilatérales, point fini ou ±oo).
//
// Stratégie :
// 1) changement de variable vers t -> 0+ :
//      x -> a + t (droite), x -> a - t (gauche), x -> 1/t (+oo), x -> -1/t (-oo)
// 2) série de Puiseux tronquée (serie.rs), ordre relancé tant que le terme dominant
//    est inconnu ; le terme dominant c·t^v donne la limite
// 3) repli structurel si la série diverge (exp(-oo) = 0, log(oo) = oo, …)
//
// SAFE: la récursion du repli descend strictement dans l’arbre.

use crate::noyau::erreur::ErreurNoyau;
use crate::noyau::expr::{Expr, Fonction};
use crate::noyau::lecture;
use crate::noyau::serie::{Developpeur, ErreurSerie, LOG_T};
use crate::noyau::simplifie::{developper, simplifier};

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use std::cmp::Ordering;

/// Variable interne du développement (non saisissable au clavier).
const VAR_T: &str = "τ";

/// Ordres successifs des développements.
const ORDRES: [i64; 5] = [3, 6, 10, 16, 24];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Bilaterale,
    Droite,
    Gauche,
}

/// lim_{var -> point} e
pub fn limite(e: &Expr, var: &str, point: &Expr, dir: Direction) -> Result<Expr, ErreurNoyau> {
    if !e.contient_var(var) {
        return Ok(simplifier(e));
    }
    let incalculable = || ErreurNoyau::LimiteIncalculable(e.to_string());
    let t = Expr::var(VAR_T);

    let valeur = match point {
        Expr::Infini => {
            limite_en_zero(&e.substituer_var(var, &t.inverse())).ok_or_else(incalculable)?
        }
        Expr::MoinsInfini => {
            limite_en_zero(&e.substituer_var(var, &-t.inverse())).ok_or_else(incalculable)?
        }
        Expr::InfiniComplexe | Expr::Indefini => return Err(incalculable()),
        a => match dir {
            Direction::Droite => cote(e, var, a, &t).ok_or_else(incalculable)?,
            Direction::Gauche => cote(e, var, a, &-t).ok_or_else(incalculable)?,
            Direction::Bilaterale => {
                let droite = cote(e, var, a, &t).ok_or_else(incalculable)?;
                let gauche = cote(e, var, a, &-t).ok_or_else(incalculable)?;
                if !memes(&gauche, &droite) {
                    return Err(ErreurNoyau::LimiteBilaterale {
                        gauche: simplifier(&gauche).to_string(),
                        droite: simplifier(&droite).to_string(),
                    });
                }
                droite
            }
        },
    };

    Ok(simplifier(&valeur))
}

fn cote(e: &Expr, var: &str, a: &Expr, pas: &Expr) -> Option<Expr> {
    limite_en_zero(&e.substituer_var(var, &(a.clone() + pas.clone())))
}

fn memes(a: &Expr, b: &Expr) -> bool {
    if a == b {
        return true;
    }
    if a.contient_non_fini() || b.contient_non_fini() {
        return false;
    }
    a.est_constante() && b.est_constante() && lecture::est_nul(&(a.clone() - b.clone()))
}

/* ------------------------ t -> 0+ ------------------------ */

fn limite_en_zero(f: &Expr) -> Option<Expr> {
    if !f.contient_var(VAR_T) {
        return accepter(f.clone());
    }

    for n in ORDRES {
        match Developpeur::new(VAR_T, n).serie(f) {
            Ok(s) if s.est_zero_exact() => return Some(Expr::zero()),
            Ok(s) => match s.dominant() {
                Some((v, c)) => {
                    log::debug!("limite: ordre {n}, terme dominant ({c})*t**({v})");
                    if let Some(l) = valeur_dominante(&v, &c) {
                        return accepter(l);
                    }
                    break;
                }
                None => log::trace!("limite: ordre {n} insuffisant pour {f}"),
            },
            Err(ErreurSerie::Precision) => log::trace!("limite: ordre {n} insuffisant pour {f}"),
            Err(err) => {
                log::debug!("limite: {err} pour {f}, repli structurel");
                break;
            }
        }
    }

    structurel(f)
}

/// Refuse les formes indéterminées.
fn accepter(l: Expr) -> Option<Expr> {
    if contient_indefini(&l) {
        None
    } else {
        Some(l)
    }
}

/// Limite de c·t^v quand t -> 0+ (c peut contenir log t).
fn valeur_dominante(v: &BigRational, c: &Expr) -> Option<Expr> {
    let (a, b) = partie_log(c)?;

    if v.is_positive() {
        return Some(Expr::zero());
    }
    if !b.est_zero() {
        // log t -> -oo domine toute constante
        return Some(infini_signe(&-b));
    }
    if v.is_zero() {
        return Some(a);
    }
    Some(infini_signe(&a))
}

/// c = a + b·log t (affine en log t).
fn partie_log(c: &Expr) -> Option<(Expr, Expr)> {
    if !c.contient_var(LOG_T) {
        return Some((c.clone(), Expr::zero()));
    }
    let en = |k: i64| developper(&c.substituer_var(LOG_T, &Expr::entier(k)));
    let a = en(0);
    let b = developper(&(en(1) - a.clone()));
    let reste = developper(&(en(2) - a.clone() - Expr::entier(2) * b.clone()));
    if !reste.est_zero() {
        return None;
    }
    Some((a, b))
}

fn infini_signe(c: &Expr) -> Expr {
    match lecture::signe(c) {
        Some(Ordering::Greater) => Expr::Infini,
        Some(Ordering::Less) => Expr::MoinsInfini,
        _ if c.est_constante() => Expr::InfiniComplexe,
        _ => Expr::produit(vec![c.clone(), Expr::Infini]),
    }
}

/* ------------------------ repli structurel ------------------------ */

fn structurel(f: &Expr) -> Option<Expr> {
    if !f.contient_var(VAR_T) {
        return accepter(f.clone());
    }
    let l = match f {
        Expr::Var(_) => Expr::zero(),
        Expr::Add(ts) => Expr::somme(ts.iter().map(limite_en_zero).collect::<Option<Vec<_>>>()?),
        Expr::Mul(fs) => Expr::produit(fs.iter().map(limite_en_zero).collect::<Option<Vec<_>>>()?),
        Expr::Pow(b, ex) => Expr::puissance(limite_en_zero(b)?, limite_en_zero(ex)?),
        Expr::Appel(g, u) => {
            let lu = limite_en_zero(u)?;
            match g {
                // |u| -> 0 : partie réelle du log -> -oo
                Fonction::Log if lu.est_zero() => Expr::MoinsInfini,
                _ => Expr::appel(*g, lu),
            }
        }
        _ => return None,
    };
    log::trace!("limite: repli structurel {f} -> {l}");
    accepter(l)
}

fn contient_indefini(e: &Expr) -> bool {
    matches!(e, Expr::Indefini) || e.enfants().into_iter().any(contient_indefini)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::eval::analyser;
    use pretty_assertions::assert_eq;

    fn lim(e: &str, point: &str, dir: Direction) -> Result<String, ErreurNoyau> {
        let e = analyser(e).unwrap();
        let p = analyser(point).unwrap();
        limite(&e, "x", &p, dir).map(|l| l.to_string())
    }

    fn ok(e: &str, point: &str, dir: Direction) -> String {
        lim(e, point, dir).unwrap_or_else(|err| panic!("limite({e}) : {err}"))
    }

    #[test]
    fn nombre_e() {
        assert_eq!(ok("(1 + 1/x)**x", "oo", Direction::Bilaterale), "E");
    }

    #[test]
    fn sinus_ordre_trois() {
        assert_eq!(ok("(sin(x) - x)/x**3", "0", Direction::Bilaterale), "-1/6");
        assert_eq!(ok("sin(x)/x", "0", Direction::Bilaterale), "1");
    }

    #[test]
    fn fraction_rationnelle_levee() {
        assert_eq!(ok("(x**2 - 1)/(x - 1)", "1", Direction::Bilaterale), "2");
    }

    #[test]
    fn limites_laterales() {
        assert_eq!(ok("1/x", "0", Direction::Droite), "oo");
        assert_eq!(ok("1/x", "0", Direction::Gauche), "-oo");
        assert_eq!(
            lim("1/x", "0", Direction::Bilaterale),
            Err(ErreurNoyau::LimiteBilaterale {
                gauche: "-oo".into(),
                droite: "oo".into()
            })
        );
    }

    #[test]
    fn logarithmes() {
        assert_eq!(ok("log(x)", "0", Direction::Droite), "-oo");
        assert_eq!(ok("x*log(x)", "0", Direction::Droite), "0");
        assert_eq!(ok("x**x", "0", Direction::Droite), "1");
        assert_eq!(ok("log(x)", "oo", Direction::Bilaterale), "oo");
    }

    #[test]
    fn repli_structurel() {
        assert_eq!(ok("exp(-x)", "oo", Direction::Bilaterale), "0");
        assert_eq!(ok("exp(x)", "oo", Direction::Bilaterale), "oo");
        assert_eq!(ok("exp(1/x)", "0", Direction::Droite), "oo");
    }

    #[test]
    fn sans_variable() {
        assert_eq!(ok("2 + 3", "1", Direction::Bilaterale), "5");
    }

    #[test]
    fn oscillation_incalculable() {
        assert!(matches!(
            lim("sin(x)", "oo", Direction::Bilaterale),
            Err(ErreurNoyau::LimiteIncalculable(_))
        ));
    }
}
