// src/noyau/trig.rs
//
// Trig spéciale (angles “exactement reconnus”) pour sin/cos/tan
// -----------------------------------------------------------
// - Entrée : coefficient rationnel r de r·π
// - Réduction modulo période via mod_rationnel() (sin/cos: 2 ; tan: 1)
// - Table angles spéciaux sur n ∈ {1,2,3,4,6}
// - Hors table : réduction au premier quadrant (sin(6π/7) = sin(π/7))

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use super::expr::{Expr, Fonction};

#[derive(Clone, Debug)]
pub enum TrigOutcome {
    Valeur(Expr, String),
    Indefini(String),
}

/// r mod m (m entier > 0), résultat dans [0, m).
pub fn mod_rationnel(r: &BigRational, m: i64) -> BigRational {
    let m = BigRational::from_integer(BigInt::from(m));
    let q = (r / &m).floor();
    r - q * m
}

/// Reconnaît les angles spéciaux pour sin/cos/tan en r·π.
///
/// Retour:
/// - Some(Valeur(expr_exact, preuve)) si reconnu
/// - Some(Indefini(preuve)) si pôle (tan(π/2), tan(3π/2))
/// - None si non reconnu (ou f n’est pas trigonométrique)
pub fn trig_special(coeff: &BigRational, f: Fonction) -> Option<TrigOutcome> {
    // 1) réduire modulo période
    let coeff_reduit = match f {
        Fonction::Sin | Fonction::Cos => mod_rationnel(coeff, 2),
        Fonction::Tan => mod_rationnel(coeff, 1),
        _ => return None,
    };

    // 2) convertir en k/n "petit"
    let (k, n) = rational_to_small_kn(&coeff_reduit)?;

    // 3) réduction modulo 2π : k mod (2n)
    let k_mod = k.rem_euclid(2 * n);

    let zero = Expr::zero();
    let one = Expr::un();
    let neg_one = Expr::entier(-1);
    let half = Expr::rationnel(1, 2);
    let neg_half = Expr::rationnel(-1, 2);

    let sqrt3 = Expr::entier(3).racine();
    let sqrt2_over_2 = Expr::entier(2).racine() * Expr::rationnel(1, 2);
    let sqrt3_over_2 = sqrt3.clone() * Expr::rationnel(1, 2);
    let sqrt3_over_3 = sqrt3.clone() * Expr::rationnel(1, 3);

    let angle_txt = format_angle_kn_pi(k_mod, n);
    let a = (k_mod, n);
    let nom = f.nom();
    let valeur = |e: Expr, txt: &str| TrigOutcome::Valeur(e, format!("{nom}({angle_txt}) = {txt}"));

    let out = match f {
        Fonction::Sin => match a {
            (0, _) | (1, 1) | (2, 1) => valeur(zero, "0"),
            (1, 6) | (5, 6) => valeur(half, "1/2"),
            (7, 6) | (11, 6) => valeur(neg_half, "-1/2"),
            (1, 4) | (3, 4) => valeur(sqrt2_over_2, "√2/2"),
            (5, 4) | (7, 4) => valeur(-sqrt2_over_2, "-√2/2"),
            (1, 3) | (2, 3) => valeur(sqrt3_over_2, "√3/2"),
            (4, 3) | (5, 3) => valeur(-sqrt3_over_2, "-√3/2"),
            (1, 2) => valeur(one, "1"),
            (3, 2) => valeur(neg_one, "-1"),
            _ => return None,
        },

        Fonction::Cos => match a {
            (0, _) | (2, 1) => valeur(one, "1"),
            (1, 1) => valeur(neg_one, "-1"),
            (1, 6) | (11, 6) => valeur(sqrt3_over_2, "√3/2"),
            (5, 6) | (7, 6) => valeur(-sqrt3_over_2, "-√3/2"),
            (1, 4) | (7, 4) => valeur(sqrt2_over_2, "√2/2"),
            (3, 4) | (5, 4) => valeur(-sqrt2_over_2, "-√2/2"),
            (1, 3) | (5, 3) => valeur(half, "1/2"),
            (2, 3) | (4, 3) => valeur(neg_half, "-1/2"),
            (1, 2) | (3, 2) => valeur(zero, "0"),
            _ => return None,
        },

        Fonction::Tan => match a {
            (0, _) | (1, 1) | (2, 1) => valeur(zero, "0"),
            (1, 6) | (7, 6) => valeur(sqrt3_over_3, "√3/3"),
            (5, 6) | (11, 6) => valeur(-sqrt3_over_3, "-√3/3"),
            (1, 4) | (5, 4) => valeur(one, "1"),
            (3, 4) | (7, 4) => valeur(neg_one, "-1"),
            (1, 3) | (4, 3) => valeur(sqrt3, "√3"),
            (2, 3) | (5, 3) => valeur(-sqrt3, "-√3"),
            (1, 2) | (3, 2) => TrigOutcome::Indefini(format!("tan({angle_txt}) = pôle")),
            _ => return None,
        },

        _ => return None,
    };

    Some(out)
}

/// f(r·π) : table si possible, sinon réduction au premier quadrant.
/// tan sur un pôle => zoo.
pub fn reduire_angle(f: Fonction, r: &BigRational) -> Expr {
    match trig_special(r, f) {
        Some(TrigOutcome::Valeur(v, preuve)) => {
            log::trace!("{preuve}");
            return v;
        }
        Some(TrigOutcome::Indefini(preuve)) => {
            log::trace!("{preuve}");
            return Expr::InfiniComplexe;
        }
        None => {}
    }

    let un = BigRational::one();
    let demi = BigRational::new(BigInt::one(), BigInt::from(2));
    let brut = |c: BigRational| {
        Expr::Appel(
            f,
            Box::new(Expr::produit(vec![Expr::depuis_rat(c), Expr::Pi])),
        )
    };

    match f {
        Fonction::Sin => {
            let r = mod_rationnel(r, 2);
            if r >= un {
                -reduire_angle(f, &(r - un))
            } else if r > demi {
                reduire_angle(f, &(un - r))
            } else {
                brut(r)
            }
        }
        Fonction::Cos => {
            let r = mod_rationnel(r, 2);
            if r >= un {
                -reduire_angle(f, &(r - un))
            } else if r > demi {
                -reduire_angle(f, &(un - r))
            } else {
                brut(r)
            }
        }
        Fonction::Tan => {
            let r = mod_rationnel(r, 1);
            if r > demi {
                -reduire_angle(f, &(un - r))
            } else {
                brut(r)
            }
        }
        autre => Expr::Appel(autre, Box::new(Expr::depuis_rat(r.clone()) * Expr::Pi)),
    }
}

/// Quart de tour : 2r entier => Some(k mod 4).
pub fn quart_de_tour(r: &BigRational) -> Option<u8> {
    let deux_r = r * BigRational::from_integer(BigInt::from(2));
    if !deux_r.is_integer() {
        return None;
    }
    let k = deux_r.to_integer().mod_floor(&BigInt::from(4));
    k.to_u8()
}

/* ------------------------ Outils ------------------------ */

fn format_angle_kn_pi(k: i64, n: i64) -> String {
    if k == 0 {
        return "0".to_string();
    }
    if n == 1 {
        return match k {
            1 => "π".to_string(),
            _ => format!("{k}π"),
        };
    }
    if k == 1 {
        return format!("π/{n}");
    }
    format!("{k}π/{n}")
}

/// Convertit un rationnel en (k,n) i64 réduit.
/// Accepte seulement n ∈ {1,2,3,4,6}.
fn rational_to_small_kn(r: &BigRational) -> Option<(i64, i64)> {
    if r.is_zero() {
        return Some((0, 1));
    }
    let denom = r.denom().to_i64()?;
    let numer = r.numer().to_i64()?;
    // BigRational est déjà réduit, dénominateur > 0
    if [1, 2, 3, 4, 6].contains(&denom) {
        Some((numer, denom))
    } else {
        None
    }
}
