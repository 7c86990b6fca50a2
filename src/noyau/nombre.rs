// src/noyau/nombre.rs
//
// Nombres exacts : rationnels de Gauss a + b·i (a, b ∈ Q), sans flottants.
// - arithmétique : num_complex::Complex<BigRational>
// - puissances entières bornées (anti-gel)
// - puissances rationnelles : extraction des puissances parfaites
//   (√12 = 2√3, 8^(2/3) = 4, 1/√2 = √2/2)
// - √ exacte d’un rationnel de Gauss quand elle existe (√(3+4i) = 2+i)

use num_bigint::BigInt;
use num_complex::Complex;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::cmp::Ordering;

pub type Nombre = Complex<BigRational>;

/// Garde-fou : |exposant| maximal pour une puissance entière exacte.
const MAX_EXPOSANT: u64 = 4096;

/// Garde-fou : taille (bits) maximale d’un résultat intermédiaire.
const MAX_BITS: u64 = 1 << 16;

/// Garde-fou : indice maximal d’une racine (x^(1/q)).
const MAX_INDICE: u32 = 64;

/// Crible borné pour l’extraction des puissances parfaites.
const LIMITE_CRIBLE: u64 = 100_000;

/* ------------------------ Constructeurs ------------------------ */

pub fn rat(n: i64, d: i64) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

pub fn reel(r: BigRational) -> Nombre {
    Complex::new(r, BigRational::zero())
}

pub fn entier(n: i64) -> Nombre {
    reel(BigRational::from_integer(BigInt::from(n)))
}

pub fn imaginaire(r: BigRational) -> Nombre {
    Complex::new(BigRational::zero(), r)
}

pub fn unite_i() -> Nombre {
    imaginaire(BigRational::one())
}

/* ------------------------ Tests de nature ------------------------ */

pub fn est_entier(z: &Nombre) -> bool {
    z.im.is_zero() && z.re.is_integer()
}

pub fn comme_entier(z: &Nombre) -> Option<BigInt> {
    if est_entier(z) {
        Some(z.re.to_integer())
    } else {
        None
    }
}

pub fn comme_rationnel(z: &Nombre) -> Option<&BigRational> {
    if z.im.is_zero() {
        Some(&z.re)
    } else {
        None
    }
}

/// Signe d’un nombre réel (None si partie imaginaire non nulle).
pub fn signe_reel(z: &Nombre) -> Option<Ordering> {
    if !z.im.is_zero() {
        return None;
    }
    Some(z.re.cmp(&BigRational::zero()))
}

/* ------------------------ Opérations gardées ------------------------ */

pub fn inverse(z: &Nombre) -> Option<Nombre> {
    if z.is_zero() {
        return None;
    }
    let n2 = &z.re * &z.re + &z.im * &z.im;
    Some(Complex::new(&z.re / &n2, -(&z.im / &n2)))
}

fn taille_bits(z: &Nombre) -> u64 {
    [
        z.re.numer().bits(),
        z.re.denom().bits(),
        z.im.numer().bits(),
        z.im.denom().bits(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// z^n exact (n entier). None si hors garde-fous ou 0^(négatif).
pub fn puissance_entiere(z: &Nombre, n: &BigInt) -> Option<Nombre> {
    if n.is_zero() {
        return Some(Nombre::one());
    }
    let mag = n.abs().to_u64()?;
    if mag > MAX_EXPOSANT || taille_bits(z).saturating_mul(mag) > MAX_BITS {
        return None;
    }

    let mut e = mag;
    let mut acc = Nombre::one();
    let mut b = z.clone();
    while e > 0 {
        if (e & 1) == 1 {
            acc = &acc * &b;
        }
        e >>= 1;
        if e > 0 {
            b = &b * &b;
        }
    }

    if n.is_negative() {
        inverse(&acc)
    } else {
        Some(acc)
    }
}

fn puissance_entiere_rat(r: &BigRational, n: &BigInt) -> Option<BigRational> {
    puissance_entiere(&reel(r.clone()), n).map(|z| z.re)
}

/* ------------------------ Puissances parfaites ------------------------ */

/// Décompose n > 0 en n = s^q * t (t sans facteur puissance q-ième connu).
/// Crible borné + test final du cofacteur.
pub fn extraire_puissance(n: &BigInt, q: u32) -> (BigInt, BigInt) {
    let mut reste = n.clone();
    let mut s = BigInt::one();

    if reste.is_zero() || q < 2 {
        return (s, reste);
    }

    let mut p: u64 = 2;
    while p <= LIMITE_CRIBLE {
        let pb = BigInt::from(p);
        let pq = pb.pow(q);
        if pq > reste {
            break;
        }
        while (&reste % &pq).is_zero() {
            reste /= &pq;
            s *= &pb;
        }
        p = if p == 2 { 3 } else { p + 2 };
    }

    // cofacteur : gros premier à la puissance q ?
    let r = reste.nth_root(q);
    if r.pow(q) == reste && !r.is_one() {
        s *= r;
        reste = BigInt::one();
    }

    (s, reste)
}

fn racine_entiere_exacte(n: &BigInt, q: u32) -> Option<BigInt> {
    if n.is_negative() {
        return None;
    }
    let r = n.nth_root(q);
    if r.pow(q) == *n {
        Some(r)
    } else {
        None
    }
}

/// Racine q-ième exacte d’un rationnel ≥ 0.
pub fn racine_exacte(r: &BigRational, q: u32) -> Option<BigRational> {
    if r.is_negative() || q == 0 {
        return None;
    }
    let n = racine_entiere_exacte(r.numer(), q)?;
    let d = racine_entiere_exacte(r.denom(), q)?;
    Some(BigRational::new(n, d))
}

/// coeff · radicande^(1/indice), radicande entier > 0 sans puissance parfaite extractible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Radical {
    pub coeff: BigRational,
    pub radicande: BigInt,
    pub indice: u32,
}

/// base^(p/q) pour base rationnelle > 0, forme rationalisée :
/// b^(p/q) = b^k · (n^r · d^(q-r))^(1/q) / d  avec p = kq + r.
pub fn puissance_rationnelle(base: &BigRational, p: &BigInt, q: u32) -> Option<Radical> {
    if !base.is_positive() || q == 0 || q > MAX_INDICE {
        return None;
    }

    let qq = BigInt::from(q);
    let k = p.div_floor(&qq);
    let r = p.mod_floor(&qq);

    let bk = puissance_entiere_rat(base, &k)?;
    if r.is_zero() {
        return Some(Radical {
            coeff: bk,
            radicande: BigInt::one(),
            indice: 1,
        });
    }

    let r = r.to_u32()?;
    let n = base.numer();
    let d = base.denom();

    let bits = n.bits() * u64::from(r) + d.bits() * u64::from(q - r);
    if bits > MAX_BITS {
        return None;
    }

    let m = n.pow(r) * d.pow(q - r);
    let (s, mut t) = extraire_puissance(&m, q);
    let coeff = bk * BigRational::new(s, d.clone());

    // réduction de l’indice : 4^(1/4) = 2^(1/2)
    let mut indice = q;
    for g in (2..=indice).rev() {
        if indice % g == 0 {
            if let Some(w) = racine_entiere_exacte(&t, g) {
                t = w;
                indice /= g;
                break;
            }
        }
    }
    if t.is_one() {
        indice = 1;
    }

    Some(Radical {
        coeff,
        radicande: t,
        indice,
    })
}

/// Décomposition r = c^m (m maximal, r > 0, r ≠ 1). Sert aux logarithmes exacts.
pub fn base_primitive(r: &BigRational) -> Option<(BigRational, u32)> {
    if !r.is_positive() || r.is_one() {
        return None;
    }
    let bits = r.numer().bits().max(r.denom().bits());
    let max_m = u32::try_from(bits).ok()?.min(MAX_EXPOSANT as u32);
    for m in (2..=max_m).rev() {
        if let Some(c) = racine_exacte(r, m) {
            return Some((c, m));
        }
    }
    Some((r.clone(), 1))
}

/// √z exacte pour un rationnel de Gauss non réel (None sinon).
pub fn racine_carree_gauss(z: &Nombre) -> Option<Nombre> {
    if z.im.is_zero() {
        return None;
    }
    let module2 = &z.re * &z.re + &z.im * &z.im;
    let m = racine_exacte(&module2, 2)?;
    let x2 = (m + &z.re) / BigRational::from_integer(BigInt::from(2));
    let x = racine_exacte(&x2, 2)?;
    if x.is_zero() {
        return None;
    }
    let y = &z.im / (BigRational::from_integer(BigInt::from(2)) * &x);
    Some(Complex::new(x, y))
}

/* ------------------------ Lecture des littéraux ------------------------ */

/// Lit un littéral décimal exact : "12", "2.5", ".5", "1e-3", "6.02E23".
pub fn lire_decimal(texte: &str) -> Option<BigRational> {
    let (mantisse, exposant) = match texte.find(['e', 'E']) {
        Some(pos) => (&texte[..pos], Some(&texte[pos + 1..])),
        None => (texte, None),
    };

    let (entiere, fraction) = match mantisse.find('.') {
        Some(pos) => (&mantisse[..pos], &mantisse[pos + 1..]),
        None => (mantisse, ""),
    };
    if entiere.is_empty() && fraction.is_empty() {
        return None;
    }
    if !entiere.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let chiffres = format!("{entiere}{fraction}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
    let mut echelle = i64::try_from(fraction.len()).ok()?;

    if let Some(exp) = exposant {
        let e: i64 = exp.parse().ok()?;
        if e.unsigned_abs() > MAX_EXPOSANT {
            return None;
        }
        echelle -= e;
    }

    let dix = BigInt::from(10);
    let r = if echelle >= 0 {
        BigRational::new(n, dix.pow(u32::try_from(echelle).ok()?))
    } else {
        BigRational::from_integer(n * dix.pow(u32::try_from(-echelle).ok()?))
    };
    Some(r)
}

/// Lecture exacte d’un flottant via sa forme décimale la plus courte.
pub fn depuis_f64(x: f64) -> Option<BigRational> {
    if !x.is_finite() {
        return None;
    }
    let texte = format!("{}", x.abs());
    let r = lire_decimal(&texte)?;
    Some(if x.is_sign_negative() { -r } else { r })
}

/* ------------------------ Lecture approchée ------------------------ */

pub fn rationnel_vers_f64(r: &BigRational) -> f64 {
    match (r.numer().to_f64(), r.denom().to_f64()) {
        (Some(n), Some(d)) if n.is_finite() && d.is_finite() => n / d,
        _ => {
            // grands entiers : on réduit l’échelle avant conversion
            let decalage = r.numer().bits().max(r.denom().bits()).saturating_sub(900);
            let n = (r.numer() >> decalage).to_f64().unwrap_or(f64::NAN);
            let d = (r.denom() >> decalage).to_f64().unwrap_or(f64::NAN);
            n / d
        }
    }
}
