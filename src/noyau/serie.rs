// src/noyau/serie.rs
//
// Séries de Puiseux tronquées en t -> 0+ (exposants rationnels, coefficients exacts).
//
// - Serie { termes, ordre } : Σ c_k t^e_k + O(t^ordre) ; ordre = None => série exacte (finie)
// - précision suivie à chaque opération (produit, inverse, compositions de Taylor)
// - log t n’est pas une série : il est porté par le symbole réservé LOG_T dans les coefficients
//   (exp(c·log t) redevient t^c)
//
// SAFE: toutes les boucles sont bornées par l’ordre cible n ; une opération qui ne peut
// pas garantir le terme dominant renvoie Precision (l’appelant relance à un ordre plus grand).

use crate::noyau::expr::{Expr, Fonction};
use crate::noyau::lecture;
use crate::noyau::simplifie::developper;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

/// Symbole réservé représentant log(t) (non saisissable au clavier).
pub const LOG_T: &str = "ℓ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErreurSerie {
    /// singularité essentielle (exp(1/t), sin(1/t), …)
    Divergente,
    /// terme dominant inconnu à cet ordre
    Precision,
    /// forme non couverte
    NonSupporte,
}

impl fmt::Display for ErreurSerie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErreurSerie::Divergente => "série divergente",
            ErreurSerie::Precision => "précision insuffisante",
            ErreurSerie::NonSupporte => "forme non supportée",
        };
        f.write_str(s)
    }
}

fn min_ordre(a: &Option<BigRational>, b: &Option<BigRational>) -> Option<BigRational> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (Some(x), Some(y)) => Some(std::cmp::min(x, y).clone()),
    }
}

fn entier(k: usize) -> BigRational {
    BigRational::from_integer(BigInt::from(k))
}

/// Coefficient “nettoyé” : None s’il est nul.
fn nettoyer(c: Expr) -> Option<Expr> {
    if c.est_zero() {
        return None;
    }
    if matches!(c, Expr::Nombre(_)) {
        return Some(c);
    }
    let c = developper(&c);
    if c.est_zero() {
        return None;
    }
    if c.est_constante() && lecture::est_nul(&c) {
        return None;
    }
    Some(c)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Serie {
    termes: Vec<(BigRational, Expr)>,
    ordre: Option<BigRational>,
}

impl Serie {
    pub fn zero_exact() -> Serie {
        Serie {
            termes: Vec::new(),
            ordre: None,
        }
    }

    pub fn monome(e: BigRational, c: Expr) -> Serie {
        let termes = match nettoyer(c) {
            Some(c) => vec![(e, c)],
            None => Vec::new(),
        };
        Serie {
            termes,
            ordre: None,
        }
    }

    pub fn constante(c: Expr) -> Serie {
        Serie::monome(BigRational::zero(), c)
    }

    fn depuis_map(map: BTreeMap<BigRational, Vec<Expr>>, ordre: Option<BigRational>) -> Serie {
        let mut termes = Vec::with_capacity(map.len());
        for (e, cs) in map {
            if matches!(&ordre, Some(o) if e >= *o) {
                continue;
            }
            if let Some(c) = nettoyer(Expr::somme(cs)) {
                termes.push((e, c));
            }
        }
        Serie { termes, ordre }
    }

    pub fn est_zero_exact(&self) -> bool {
        self.termes.is_empty() && self.ordre.is_none()
    }

    /// Valuation connue : premier exposant, sinon l’ordre (None : zéro exact).
    fn val(&self) -> Option<BigRational> {
        match self.termes.first() {
            Some((e, _)) => Some(e.clone()),
            None => self.ordre.clone(),
        }
    }

    /// Terme dominant (exposant, coefficient), s’il est connu.
    pub fn dominant(&self) -> Option<(BigRational, Expr)> {
        self.termes.first().cloned()
    }

    pub fn tronquer(mut self, n: &BigRational) -> Serie {
        let avant = self.termes.len();
        self.termes.retain(|(e, _)| e < n);
        if self.termes.len() != avant {
            self.ordre = min_ordre(&self.ordre, &Some(n.clone()));
        }
        self
    }

    pub fn plus(&self, autre: &Serie) -> Serie {
        let ordre = min_ordre(&self.ordre, &autre.ordre);
        let mut map: BTreeMap<BigRational, Vec<Expr>> = BTreeMap::new();
        for (e, c) in self.termes.iter().chain(autre.termes.iter()) {
            map.entry(e.clone()).or_default().push(c.clone());
        }
        Serie::depuis_map(map, ordre)
    }

    pub fn fois(&self, autre: &Serie, n: &BigRational) -> Serie {
        let (Some(va), Some(vb)) = (self.val(), autre.val()) else {
            return Serie::zero_exact();
        };
        let ordre = min_ordre(
            &self.ordre.as_ref().map(|o| o + &vb),
            &autre.ordre.as_ref().map(|o| o + &va),
        );
        let mut map: BTreeMap<BigRational, Vec<Expr>> = BTreeMap::new();
        for (ea, ca) in &self.termes {
            for (eb, cb) in &autre.termes {
                let e = ea + eb;
                if matches!(&ordre, Some(o) if e >= *o) {
                    continue;
                }
                map.entry(e).or_default().push(ca.clone() * cb.clone());
            }
        }
        Serie::depuis_map(map, ordre).tronquer(n)
    }

    pub fn scal(&self, c: &Expr) -> Serie {
        if c.est_zero() {
            return Serie::zero_exact();
        }
        let termes = self
            .termes
            .iter()
            .filter_map(|(e, k)| nettoyer(k.clone() * c.clone()).map(|k| (e.clone(), k)))
            .collect();
        Serie {
            termes,
            ordre: self.ordre.clone(),
        }
    }

    pub fn decaler(&self, v: &BigRational) -> Serie {
        Serie {
            termes: self
                .termes
                .iter()
                .map(|(e, c)| (e + v, c.clone()))
                .collect(),
            ordre: self.ordre.as_ref().map(|o| o + v),
        }
    }

    /// Coefficient de t^0 (zéro si absent).
    fn coeff_constant(&self) -> Expr {
        self.termes
            .iter()
            .find(|(e, _)| e.is_zero())
            .map(|(_, c)| c.clone())
            .unwrap_or_else(Expr::zero)
    }

    fn sans_constante(&self) -> Serie {
        Serie {
            termes: self
                .termes
                .iter()
                .filter(|(e, _)| !e.is_zero())
                .cloned()
                .collect(),
            ordre: self.ordre.clone(),
        }
    }

    /// s = c·t^v·(1 + w), w de valuation > 0.
    fn factoriser(&self) -> Result<(BigRational, Expr, Serie), ErreurSerie> {
        let (v, c) = self.dominant().ok_or(ErreurSerie::Precision)?;
        if c.contient_var(LOG_T) {
            return Err(ErreurSerie::NonSupporte);
        }
        let w = self
            .decaler(&-v.clone())
            .scal(&c.clone().inverse())
            .sans_constante();
        Ok((v, c, w))
    }

    /// Σ a_k r^k (r de valuation > 0), termes omis d’ordre ≥ n.
    fn taylor(&self, coeffs: &dyn Fn(usize) -> BigRational, n: &BigRational) -> Result<Serie, ErreurSerie> {
        let a0 = Serie::constante(Expr::depuis_rat(coeffs(0)));
        if self.est_zero_exact() {
            return Ok(a0);
        }
        if self.termes.is_empty() {
            let mut s = a0;
            s.ordre = min_ordre(&s.ordre, &self.ordre);
            return Ok(s.tronquer(n));
        }
        let vr = self.val().ok_or(ErreurSerie::Precision)?;
        if !vr.is_positive() {
            return Err(ErreurSerie::Precision);
        }

        let mut acc = a0;
        let mut p = Serie::constante(Expr::un());
        let mut k: usize = 1;
        while &vr * entier(k) < *n {
            p = p.fois(self, n);
            let ak = coeffs(k);
            if !ak.is_zero() {
                acc = acc.plus(&p.scal(&Expr::depuis_rat(ak)));
            }
            k += 1;
        }
        acc.ordre = min_ordre(&acc.ordre, &Some(n.clone()));
        Ok(acc.tronquer(n))
    }

    pub fn inverse(&self, n: &BigRational) -> Result<Serie, ErreurSerie> {
        let (v, c, w) = self.factoriser()?;
        let n_rel = n + &v;
        let moins_w = w.scal(&Expr::entier(-1));
        let geo = moins_w.taylor(&|_| BigRational::one(), &n_rel)?;
        Ok(geo.scal(&c.inverse()).decaler(&-v).tronquer(n))
    }

    pub fn puissance_entiere(&self, k: &BigInt, n: &BigRational) -> Result<Serie, ErreurSerie> {
        if k.is_negative() {
            return self.inverse(n)?.puissance_entiere(&-k, n);
        }
        let mut e = k.to_u64().ok_or(ErreurSerie::NonSupporte)?;
        let mut acc = Serie::constante(Expr::un());
        let mut b = self.clone();
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.fois(&b, n);
            }
            e >>= 1;
            if e > 0 {
                b = b.fois(&b, n);
            }
        }
        Ok(acc)
    }

    pub fn puissance_rationnelle(&self, r: &BigRational, n: &BigRational) -> Result<Serie, ErreurSerie> {
        let (v, c, w) = self.factoriser()?;
        let decal = &v * r;
        let n_rel = n - &decal;
        let rr = r.clone();
        let bin = w.taylor(&|k| binomial(&rr, k), &n_rel)?;
        let c_r = Expr::puissance(c, Expr::depuis_rat(r.clone()));
        Ok(bin.scal(&c_r).decaler(&decal).tronquer(n))
    }

    fn exiger_borne(&self) -> Result<(), ErreurSerie> {
        if self.termes.iter().any(|(e, _)| e.is_negative()) {
            return Err(ErreurSerie::Divergente);
        }
        if matches!(&self.ordre, Some(o) if !o.is_positive()) {
            return Err(ErreurSerie::Precision);
        }
        Ok(())
    }

    pub fn exp(&self, n: &BigRational) -> Result<Serie, ErreurSerie> {
        self.exiger_borne()?;
        let u0 = self.coeff_constant();
        let r = self.sans_constante();
        let (a, decal) = separer_log(&u0)?;
        let n_rel = n - &decal;
        let base = r.taylor(&|k| BigRational::one() / factorielle(k), &n_rel)?;
        Ok(base
            .scal(&Expr::appel(Fonction::Exp, a))
            .decaler(&decal)
            .tronquer(n))
    }

    pub fn log(&self, n: &BigRational) -> Result<Serie, ErreurSerie> {
        let (v, c, w) = self.factoriser()?;
        let l = w.taylor(
            &|k| {
                if k == 0 {
                    BigRational::zero()
                } else if k % 2 == 1 {
                    BigRational::one() / entier(k)
                } else {
                    -BigRational::one() / entier(k)
                }
            },
            n,
        )?;
        let constante =
            Expr::appel(Fonction::Log, c) + Expr::depuis_rat(v) * Expr::var(LOG_T);
        Ok(l.plus(&Serie::constante(constante)).tronquer(n))
    }

    /// (sin s, cos s)
    pub fn sin_cos(&self, n: &BigRational) -> Result<(Serie, Serie), ErreurSerie> {
        self.exiger_borne()?;
        let u0 = self.coeff_constant();
        if u0.contient_var(LOG_T) {
            return Err(ErreurSerie::Divergente);
        }
        let r = self.sans_constante();
        let s = r.taylor(&coeff_sin, n)?;
        let c = r.taylor(&coeff_cos, n)?;
        let sin0 = Expr::appel(Fonction::Sin, u0.clone());
        let cos0 = Expr::appel(Fonction::Cos, u0);
        let sin = s.scal(&cos0).plus(&c.scal(&sin0));
        let cos = c.scal(&cos0).plus(&s.scal(&-sin0));
        Ok((sin.tronquer(n), cos.tronquer(n)))
    }

    /// |s| pour un coefficient dominant de signe connu.
    pub fn abs(&self) -> Result<Serie, ErreurSerie> {
        let (_, c) = self.dominant().ok_or(ErreurSerie::Precision)?;
        match lecture::signe(&c) {
            Some(std::cmp::Ordering::Greater) => Ok(self.clone()),
            Some(std::cmp::Ordering::Less) => Ok(self.scal(&Expr::entier(-1))),
            _ => Err(ErreurSerie::NonSupporte),
        }
    }
}

/* ------------------------ coefficients de Taylor ------------------------ */

fn factorielle(k: usize) -> BigRational {
    (1..=k).fold(BigRational::one(), |acc, j| acc * entier(j))
}

fn coeff_sin(k: usize) -> BigRational {
    if k % 2 == 0 {
        return BigRational::zero();
    }
    let s = BigRational::one() / factorielle(k);
    if (k / 2) % 2 == 0 {
        s
    } else {
        -s
    }
}

fn coeff_cos(k: usize) -> BigRational {
    if k % 2 == 1 {
        return BigRational::zero();
    }
    let s = BigRational::one() / factorielle(k);
    if (k / 2) % 2 == 0 {
        s
    } else {
        -s
    }
}

/// C(r, k) = r(r-1)…(r-k+1)/k!
fn binomial(r: &BigRational, k: usize) -> BigRational {
    let mut acc = BigRational::one();
    for j in 0..k {
        acc *= r - entier(j);
    }
    acc / factorielle(k)
}

/// u0 = a + c·log t, c rationnel => (a, c).
fn separer_log(u0: &Expr) -> Result<(Expr, BigRational), ErreurSerie> {
    if !u0.contient_var(LOG_T) {
        return Ok((u0.clone(), BigRational::zero()));
    }
    let en = |v: i64| {
        let mut table = HashMap::new();
        table.insert(LOG_T.to_string(), Expr::entier(v));
        developper(&u0.substituer(&table))
    };
    let a = en(0);
    let c = developper(&(en(1) - a.clone()));
    // linéarité en log t
    if developper(&(en(2) - a.clone() - Expr::entier(2) * c.clone())) != Expr::zero() {
        return Err(ErreurSerie::NonSupporte);
    }
    let c = c.comme_rationnel().cloned().ok_or(ErreurSerie::NonSupporte)?;
    Ok((a, c))
}

/* ------------------------ développement d’une expression ------------------------ */

/// Développe une expression en série de la variable `var` (t -> 0+), à l’ordre n.
pub struct Developpeur<'a> {
    var: &'a str,
    n: BigRational,
}

impl<'a> Developpeur<'a> {
    pub fn new(var: &'a str, ordre: i64) -> Self {
        Developpeur {
            var,
            n: BigRational::from_integer(BigInt::from(ordre)),
        }
    }

    pub fn serie(&self, e: &Expr) -> Result<Serie, ErreurSerie> {
        let n = &self.n;
        if !e.contient_var(self.var) {
            if e.contient_non_fini() {
                return Err(ErreurSerie::NonSupporte);
            }
            return Ok(Serie::constante(e.clone()));
        }

        match e {
            Expr::Var(_) => Ok(Serie::monome(BigRational::one(), Expr::un())),

            Expr::Add(ts) => {
                let mut acc = Serie::zero_exact();
                for t in ts {
                    acc = acc.plus(&self.serie(t)?);
                }
                Ok(acc.tronquer(n))
            }

            Expr::Mul(fs) => {
                let mut acc = Serie::constante(Expr::un());
                for f in fs {
                    acc = acc.fois(&self.serie(f)?, n);
                }
                Ok(acc)
            }

            Expr::Pow(b, ex) => {
                let sb = self.serie(b)?;
                if ex.contient_var(self.var) {
                    let se = self.serie(ex)?;
                    return se.fois(&sb.log(n)?, n).exp(n);
                }
                match ex.comme_rationnel() {
                    Some(r) if r.is_integer() => sb.puissance_entiere(&r.to_integer(), n),
                    Some(r) => sb.puissance_rationnelle(r, n),
                    None => sb.log(n)?.scal(ex).exp(n),
                }
            }

            Expr::Appel(f, u) => {
                let su = self.serie(u)?;
                match f {
                    Fonction::Exp => su.exp(n),
                    Fonction::Log => su.log(n),
                    Fonction::Sin => Ok(su.sin_cos(n)?.0),
                    Fonction::Cos => Ok(su.sin_cos(n)?.1),
                    Fonction::Tan => {
                        let (s, c) = su.sin_cos(n)?;
                        Ok(s.fois(&c.inverse(n)?, n))
                    }
                    Fonction::Abs => su.abs(),
                }
            }

            _ => Err(ErreurSerie::NonSupporte),
        }
    }
}
