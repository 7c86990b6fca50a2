// src/noyau/identites_trig.rs
//
// Identités trigonométriques exactes, version SAFE (anti-boucle)
//
// Objectifs :
// - Règles toujours sûres (réduisent / normalisent sans exploser)
// - Garde-fous anti-boucle via score (noeuds, profondeur) + passes bornées
// - Zéro flottants, zéro heuristique “magique”
//
// Parité et décalages par kπ/2 sont déjà faits par les constructeurs (fonctions.rs).
// Règles incluses ici (sommes n-aires canoniques) :
// B3 Pythagoricienne
//   c·R·sin(y)^2 + c·R·cos(y)^2 -> c·R
// B3' Complément
//   a - a·sin(y)^2 -> a·cos(y)^2   (et symétrique)
// BONUS (safe) : sin(y)^k · cos(y)^(-k) -> tan(y)^k
//
// IMPORTANT : on N’EXPAND PAS tan(x) -> sin/cos (risque de boucles / indéfinis).

use crate::noyau::expr::{Expr, Fonction};
use crate::noyau::nombre::Nombre;

pub fn trig_identites(e: Expr) -> Expr {
    // Passes bornées : on réécrit tant que ça n’empire pas le score.
    let mut cur = e;
    let mut cur_score = score(&cur);

    for _ in 0..6 {
        let next = rewrite_once(&cur);
        if next == cur {
            break;
        }
        let next_score = score(&next);

        // Garde-fou : accepter si score DIMINUE ou RESTE ÉGAL.
        if next_score <= cur_score {
            cur = next;
            cur_score = next_score;
        } else {
            break;
        }
    }

    cur
}

/* ------------------------ réécriture : 1 passe ------------------------ */

fn rewrite_once(e: &Expr) -> Expr {
    // descente d’abord, puis règles au noeud courant
    let e = e.reconstruire_avec(&rewrite_once);
    match e {
        Expr::Add(termes) => pythagore(termes),
        Expr::Mul(facteurs) => sin_sur_cos(facteurs),
        autre => autre,
    }
}

/* ------------------------ pythagore ------------------------ */

/// Terme de la forme c·R·f(y)^2 avec f ∈ {sin, cos}.
struct CarreTrig {
    f: Fonction,
    y: Expr,
    c: Nombre,
    r: Expr,
}

fn carre_trig(t: &Expr) -> Option<CarreTrig> {
    let (c, reste) = t.coeff_et_reste();
    let facteurs: Vec<Expr> = match reste {
        Expr::Mul(fs) => fs,
        autre => vec![autre],
    };
    for (i, fac) in facteurs.iter().enumerate() {
        if let Expr::Pow(b, ex) = fac {
            if let Expr::Appel(f @ (Fonction::Sin | Fonction::Cos), y) = b.as_ref() {
                if ex.as_ref() == &Expr::entier(2) {
                    let mut autres = facteurs.clone();
                    autres.remove(i);
                    return Some(CarreTrig {
                        f: *f,
                        y: (**y).clone(),
                        c,
                        r: Expr::produit(autres),
                    });
                }
            }
        }
    }
    None
}

fn pythagore(mut termes: Vec<Expr>) -> Expr {
    let mut change = true;
    while change {
        change = false;
        'recherche: for i in 0..termes.len() {
            let Some(a) = carre_trig(&termes[i]) else {
                continue;
            };

            // B3 : sin² + cos² (même coefficient, même reste)
            for j in 0..termes.len() {
                if i == j {
                    continue;
                }
                if let Some(b) = carre_trig(&termes[j]) {
                    if a.f != b.f && a.y == b.y && a.c == b.c && a.r == b.r {
                        let remplace = Expr::produit(vec![Expr::Nombre(a.c.clone()), a.r.clone()]);
                        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
                        termes.remove(hi);
                        termes.remove(lo);
                        termes.push(remplace);
                        change = true;
                        break 'recherche;
                    }
                }
            }

            // B3' : a - a·sin²(y) -> a·cos²(y)
            if a.r.est_un() {
                let oppose = -a.c.clone();
                if let Some(k) = termes
                    .iter()
                    .position(|t| matches!(t, Expr::Nombre(z) if *z == oppose))
                {
                    let autre = if a.f == Fonction::Sin {
                        Fonction::Cos
                    } else {
                        Fonction::Sin
                    };
                    let carre = Expr::puissance(Expr::appel(autre, a.y.clone()), Expr::entier(2));
                    let remplace = Expr::Nombre(oppose) * carre;
                    let (hi, lo) = if i > k { (i, k) } else { (k, i) };
                    termes.remove(hi);
                    termes.remove(lo);
                    termes.push(remplace);
                    change = true;
                    break 'recherche;
                }
            }
        }
    }
    Expr::somme(termes)
}

/* ------------------------ sin/cos -> tan ------------------------ */

fn sin_sur_cos(facteurs: Vec<Expr>) -> Expr {
    let mut fs = facteurs;
    for i in 0..fs.len() {
        let (bi, ei) = fs[i].base_et_exposant();
        let Expr::Appel(Fonction::Sin, y) = &bi else {
            continue;
        };
        let oppose = -ei.clone();
        let cible = Expr::appel(Fonction::Cos, (**y).clone());
        let j = fs.iter().position(|f| {
            let (bj, ej) = f.base_et_exposant();
            bj == cible && ej == oppose
        });
        if let Some(j) = j {
            let tan = Expr::puissance(Expr::appel(Fonction::Tan, (**y).clone()), ei);
            let (hi, lo) = if i > j { (i, j) } else { (j, i) };
            fs.remove(hi);
            fs.remove(lo);
            fs.push(tan);
            return Expr::produit(fs);
        }
    }
    Expr::produit(fs)
}

/* ------------------------ score anti-boucle ------------------------ */

fn score(e: &Expr) -> (usize, usize) {
    // (noeuds, profondeur)
    fn profondeur(e: &Expr) -> usize {
        1 + e.enfants().into_iter().map(profondeur).max().unwrap_or(0)
    }
    (e.taille(), profondeur(e))
}

/* ------------------------ tests ------------------------ */

#[cfg(test)]
mod tests {
    use super::trig_identites;
    use crate::noyau::expr::{Expr, Fonction};
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::var("x")
    }
    fn sin(e: Expr) -> Expr {
        Expr::appel(Fonction::Sin, e)
    }
    fn cos(e: Expr) -> Expr {
        Expr::appel(Fonction::Cos, e)
    }
    fn carre(e: Expr) -> Expr {
        Expr::puissance(e, Expr::entier(2))
    }

    #[test]
    fn b3_pythagore() {
        let e = carre(sin(x())) + carre(cos(x()));
        assert_eq!(trig_identites(e), Expr::un());
    }

    #[test]
    fn b3_pythagore_avec_coefficient_et_reste() {
        let y = Expr::var("y");
        let e = Expr::entier(3) * y.clone() * carre(sin(x()))
            + Expr::entier(3) * y.clone() * carre(cos(x()))
            + Expr::entier(1);
        assert_eq!(trig_identites(e), Expr::entier(3) * y + Expr::entier(1));
    }

    #[test]
    fn b3_complement() {
        let e = Expr::entier(1) - carre(sin(x()));
        assert_eq!(trig_identites(e), carre(cos(x())));
    }

    #[test]
    fn pythagore_arguments_differents_inchange() {
        let e = carre(sin(x())) + carre(cos(Expr::var("y")));
        assert_eq!(trig_identites(e.clone()), e);
    }

    #[test]
    fn bonus_sin_sur_cos_vers_tan() {
        let e = sin(x()) / cos(x());
        assert_eq!(trig_identites(e), Expr::appel(Fonction::Tan, x()));
    }
}
