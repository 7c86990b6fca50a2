// src/noyau/format.rs
//
// Affichage EXACT, deux rendus :
// - Ascii   : relisible par le parseur (sqrt(2)/2, 15/2 - 5*I/2, x**2, pi, oo)
// - Unicode : lisible (√(2)/2, π, ∞, x^2, ·) ; relisible après normalisation
//
// Le mode est un paramètre explicite du Rendu (pas d’état global).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::expr::Expr;
use super::nombre::{self, Nombre};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeRendu {
    #[default]
    Ascii,
    Unicode,
}

/* ------------------------ précédences ------------------------ */

const PREC_ADD: u8 = 10;
const PREC_MUL: u8 = 20;
const PREC_POW: u8 = 30;
const PREC_ATOME: u8 = 100;

/// Texte + précédence du noeud rendu (pour les parenthèses).
struct Morceau {
    texte: String,
    prec: u8,
}

impl Morceau {
    fn new(texte: String, prec: u8) -> Self {
        Morceau { texte, prec }
    }

    fn signe(texte: String, prec: u8) -> Self {
        let prec = if texte.starts_with('-') { PREC_ADD } else { prec };
        Morceau { texte, prec }
    }

    fn entoure_si(self, min: u8) -> String {
        if self.prec < min {
            format!("({})", self.texte)
        } else {
            self.texte
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Rendu {
    mode: ModeRendu,
}

impl Rendu {
    pub fn new(mode: ModeRendu) -> Self {
        Rendu { mode }
    }

    pub fn rendre(&self, e: &Expr) -> String {
        self.morceau(e).texte
    }

    fn fois(&self) -> &'static str {
        match self.mode {
            ModeRendu::Ascii => "*",
            ModeRendu::Unicode => "·",
        }
    }

    fn puiss(&self) -> &'static str {
        match self.mode {
            ModeRendu::Ascii => "**",
            ModeRendu::Unicode => "^",
        }
    }

    fn racine(&self, interieur: &str) -> String {
        match self.mode {
            ModeRendu::Ascii => format!("sqrt({interieur})"),
            ModeRendu::Unicode => format!("√({interieur})"),
        }
    }

    fn morceau(&self, e: &Expr) -> Morceau {
        let unicode = self.mode == ModeRendu::Unicode;
        match e {
            Expr::Nombre(z) => self.nombre(z),
            Expr::Pi => Morceau::new(if unicode { "π" } else { "pi" }.to_string(), PREC_ATOME),
            Expr::E => Morceau::new("E".to_string(), PREC_ATOME),
            Expr::Infini => Morceau::new(if unicode { "∞" } else { "oo" }.to_string(), PREC_ATOME),
            Expr::MoinsInfini => {
                Morceau::new(if unicode { "-∞" } else { "-oo" }.to_string(), PREC_ADD)
            }
            Expr::InfiniComplexe => Morceau::new("zoo".to_string(), PREC_ATOME),
            Expr::Indefini => Morceau::new("nan".to_string(), PREC_ATOME),
            Expr::Var(v) => Morceau::new(v.clone(), PREC_ATOME),
            Expr::Appel(f, x) => {
                Morceau::new(format!("{}({})", f.nom(), self.rendre(x)), PREC_ATOME)
            }
            Expr::Pow(b, ex) => self.puissance(b, ex),
            Expr::Mul(fs) => self.produit(fs),
            Expr::Add(ts) => self.somme(ts),
        }
    }

    /* ------------------------ nombres ------------------------ */

    fn rationnel(r: &BigRational) -> Morceau {
        if r.denom().is_one() {
            Morceau::signe(format!("{}", r.numer()), PREC_ATOME)
        } else {
            Morceau::signe(format!("{}/{}", r.numer(), r.denom()), PREC_MUL)
        }
    }

    /// b·I : "I", "-I", "3*I", "5*I/2", "-I/2".
    fn imaginaire(&self, b: &BigRational) -> String {
        let p = b.numer();
        let q = b.denom();
        let signe = if p.is_negative() { "-" } else { "" };
        let pa = p.abs();
        let tete = if pa.is_one() {
            "I".to_string()
        } else {
            format!("{pa}{}I", self.fois())
        };
        if q.is_one() {
            format!("{signe}{tete}")
        } else {
            format!("{signe}{tete}/{q}")
        }
    }

    fn nombre(&self, z: &Nombre) -> Morceau {
        if z.im.is_zero() {
            return Rendu::rationnel(&z.re);
        }
        let im = self.imaginaire(&z.im);
        if z.re.is_zero() {
            return Morceau::signe(im, PREC_MUL);
        }
        let re = Rendu::rationnel(&z.re).texte;
        let texte = match im.strip_prefix('-') {
            Some(abs) => format!("{re} - {abs}"),
            None => format!("{re} + {im}"),
        };
        Morceau::new(texte, PREC_ADD)
    }

    /* ------------------------ puissances ------------------------ */

    fn puissance(&self, b: &Expr, ex: &Expr) -> Morceau {
        if let Some(r) = ex.comme_rationnel() {
            let demi = nombre::rat(1, 2);
            if *r == demi {
                return Morceau::new(self.racine(&self.rendre(b)), PREC_ATOME);
            }
            if *r == -demi {
                return Morceau::new(format!("1/{}", self.racine(&self.rendre(b))), PREC_MUL);
            }
            if *r == -BigRational::one() {
                let base = self.morceau(b).entoure_si(PREC_POW);
                return Morceau::new(format!("1/{base}"), PREC_MUL);
            }
        }
        let base = self.morceau(b).entoure_si(PREC_POW + 1);
        let expo = self.morceau(ex).entoure_si(PREC_ATOME);
        Morceau::new(format!("{base}{}{expo}", self.puiss()), PREC_POW)
    }

    /* ------------------------ produits ------------------------ */

    fn produit(&self, fs: &[Expr]) -> Morceau {
        let mut num: Vec<String> = Vec::new();
        let mut den: Vec<String> = Vec::new();
        let mut negatif = false;

        let mut reste = fs;
        if let Some(Expr::Nombre(c)) = fs.first() {
            reste = &fs[1..];
            if c.im.is_zero() || c.re.is_zero() {
                // réel ou imaginaire pur : p/q (·I)
                let r = if c.im.is_zero() { &c.re } else { &c.im };
                negatif = r.is_negative();
                let p = r.numer().abs();
                if c.im.is_zero() {
                    if !p.is_one() {
                        num.push(p.to_string());
                    }
                } else if p.is_one() {
                    num.push("I".to_string());
                } else {
                    num.push(format!("{p}{}I", self.fois()));
                }
                if !r.denom().is_one() {
                    den.push(r.denom().to_string());
                }
            } else {
                num.push(format!("({})", self.nombre(c).texte));
            }
        }

        for f in reste {
            match denominateur(f) {
                Some(d) => den.push(self.morceau(&d).entoure_si(PREC_MUL)),
                None => num.push(self.morceau(f).entoure_si(PREC_MUL)),
            }
        }

        let fois = self.fois();
        let mut texte = if num.is_empty() {
            "1".to_string()
        } else {
            num.join(fois)
        };
        if !den.is_empty() {
            let d = if den.len() == 1 {
                den.join(fois)
            } else {
                format!("({})", den.join(fois))
            };
            texte = format!("{texte}/{d}");
        }
        if negatif {
            texte = format!("-{texte}");
        }
        Morceau::signe(texte, PREC_MUL)
    }

    /* ------------------------ sommes ------------------------ */

    fn somme(&self, ts: &[Expr]) -> Morceau {
        // degré décroissant, constantes numériques en dernier
        let mut ordre: Vec<&Expr> = ts.iter().collect();
        ordre.sort_by(|a, b| {
            let na = matches!(a, Expr::Nombre(_));
            let nb = matches!(b, Expr::Nombre(_));
            na.cmp(&nb).then_with(|| degre(b).cmp(&degre(a)))
        });

        let mut texte = String::new();
        for (i, t) in ordre.into_iter().enumerate() {
            let s = self.morceau(t).entoure_si(PREC_ADD);
            if i == 0 {
                texte.push_str(&s);
            } else if let Some(abs) = s.strip_prefix('-') {
                texte.push_str(" - ");
                texte.push_str(abs);
            } else {
                texte.push_str(" + ");
                texte.push_str(&s);
            }
        }
        Morceau::new(texte, PREC_ADD)
    }
}

/// Facteur de dénominateur : b**(-r) (r > 0 rationnel) => b**r.
fn denominateur(f: &Expr) -> Option<Expr> {
    if let Expr::Pow(b, e) = f {
        let r = e.comme_rationnel()?;
        if r.is_negative() {
            let r = -r.clone();
            if r.is_one() {
                return Some((**b).clone());
            }
            return Some(Expr::Pow(b.clone(), Box::new(Expr::depuis_rat(r))));
        }
    }
    None
}

/// Degré total en les variables (0 pour les constantes).
pub fn degre(e: &Expr) -> BigRational {
    match e {
        Expr::Var(_) => BigRational::one(),
        Expr::Pow(b, ex) => match ex.comme_rationnel() {
            Some(r) => degre(b) * r,
            None => BigRational::zero(),
        },
        Expr::Mul(fs) => fs.iter().map(degre).fold(BigRational::zero(), |a, d| a + d),
        Expr::Add(ts) => ts
            .iter()
            .map(degre)
            .max()
            .unwrap_or_else(|| BigRational::from_integer(BigInt::zero())),
        _ => BigRational::zero(),
    }
}
