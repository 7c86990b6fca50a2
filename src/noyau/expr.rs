// src/noyau/expr.rs
//
// AST exact (sans flottants).
// - Nombre : rationnel de Gauss exact (a + b·i)
// - Pi, E  : constantes symboliques
// - Infini, MoinsInfini, InfiniComplexe, Indefini : valeurs étendues
// - Var    : variable symbolique (ex: x)
// - Add / Mul : n-aires, toujours aplatis et triés (voir canon.rs)
// - Pow    : base ** exposant
// - Appel  : fonction élémentaire (sin, cos, tan, exp, log, Abs)
//
// IMPORTANT (SAFE):
// - les variantes ne se construisent qu’à travers les constructeurs (somme, produit,
//   puissance, appel) : ce sont eux qui garantissent la forme canonique.
// - simplify ne doit jamais “inventer” une valeur pour Var.

use crate::noyau::canon;
use crate::noyau::fonctions;
use crate::noyau::format::{ModeRendu, Rendu};
use crate::noyau::nombre::{self, Nombre};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use std::collections::HashMap;
use std::fmt;
use std::ops;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Abs,
}

impl Fonction {
    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Exp => "exp",
            Fonction::Log => "log",
            Fonction::Abs => "Abs",
        }
    }

    /// Noms acceptés en entrée (sensibles à la casse, sauf Abs/abs).
    pub fn depuis_nom(nom: &str) -> Option<Fonction> {
        match nom {
            "sin" => Some(Fonction::Sin),
            "cos" => Some(Fonction::Cos),
            "tan" => Some(Fonction::Tan),
            "exp" => Some(Fonction::Exp),
            "log" | "ln" => Some(Fonction::Log),
            "Abs" | "abs" => Some(Fonction::Abs),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    Nombre(Nombre),
    Pi,
    E,

    Infini,
    MoinsInfini,
    InfiniComplexe,
    Indefini,

    Var(String),

    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Appel(Fonction, Box<Expr>),
}

/* ------------------------ Constructeurs ------------------------ */

impl Expr {
    pub fn entier(n: i64) -> Expr {
        Expr::Nombre(nombre::entier(n))
    }

    pub fn rationnel(n: i64, d: i64) -> Expr {
        Expr::Nombre(nombre::reel(nombre::rat(n, d)))
    }

    pub fn depuis_rat(r: BigRational) -> Expr {
        Expr::Nombre(nombre::reel(r))
    }

    pub fn depuis_bigint(n: BigInt) -> Expr {
        Expr::Nombre(nombre::reel(BigRational::from_integer(n)))
    }

    pub fn zero() -> Expr {
        Expr::entier(0)
    }

    pub fn un() -> Expr {
        Expr::entier(1)
    }

    pub fn i() -> Expr {
        Expr::Nombre(nombre::unite_i())
    }

    pub fn var(nom: &str) -> Expr {
        Expr::Var(nom.to_string())
    }

    pub fn somme(termes: Vec<Expr>) -> Expr {
        canon::somme(termes)
    }

    pub fn produit(facteurs: Vec<Expr>) -> Expr {
        canon::produit(facteurs)
    }

    pub fn puissance(base: Expr, exposant: Expr) -> Expr {
        canon::puissance(base, exposant)
    }

    pub fn appel(f: Fonction, x: Expr) -> Expr {
        fonctions::appel(f, x)
    }

    /// log(x, base) : valeur exacte si x et base sont des puissances d’une même base.
    pub fn log_base(x: Expr, base: Expr) -> Expr {
        fonctions::log_base(x, base)
    }

    pub fn racine(self) -> Expr {
        Expr::puissance(self, Expr::rationnel(1, 2))
    }

    pub fn inverse(self) -> Expr {
        Expr::puissance(self, Expr::entier(-1))
    }
}

/* ------------------------ Opérateurs (via constructeurs canoniques) ------------------------ */

impl ops::Add for Expr {
    type Output = Expr;
    fn add(self, autre: Expr) -> Expr {
        Expr::somme(vec![self, autre])
    }
}

impl ops::Sub for Expr {
    type Output = Expr;
    fn sub(self, autre: Expr) -> Expr {
        Expr::somme(vec![self, -autre])
    }
}

impl ops::Mul for Expr {
    type Output = Expr;
    fn mul(self, autre: Expr) -> Expr {
        Expr::produit(vec![self, autre])
    }
}

impl ops::Div for Expr {
    type Output = Expr;
    fn div(self, autre: Expr) -> Expr {
        Expr::produit(vec![self, autre.inverse()])
    }
}

impl ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::produit(vec![Expr::entier(-1), self])
    }
}

/* ------------------------ Requêtes ------------------------ */

impl Expr {
    pub fn comme_nombre(&self) -> Option<&Nombre> {
        match self {
            Expr::Nombre(z) => Some(z),
            _ => None,
        }
    }

    pub fn comme_rationnel(&self) -> Option<&BigRational> {
        self.comme_nombre().and_then(nombre::comme_rationnel)
    }

    pub fn est_zero(&self) -> bool {
        matches!(self, Expr::Nombre(z) if z.is_zero())
    }

    pub fn est_un(&self) -> bool {
        matches!(self, Expr::Nombre(z) if z.is_one())
    }

    pub fn est_infini(&self) -> bool {
        matches!(
            self,
            Expr::Infini | Expr::MoinsInfini | Expr::InfiniComplexe
        )
    }

    /// Vrai si l’arbre contient une valeur étendue (∞, zoo, nan).
    pub fn contient_non_fini(&self) -> bool {
        self.existe(&|e| e.est_infini() || matches!(e, Expr::Indefini))
    }

    pub fn contient_var(&self, nom: &str) -> bool {
        self.existe(&|e| matches!(e, Expr::Var(v) if v == nom))
    }

    /// Aucune variable libre : valeur purement numérique (au sens symbolique).
    pub fn est_constante(&self) -> bool {
        !self.existe(&|e| matches!(e, Expr::Var(_)))
    }

    pub fn enfants(&self) -> Vec<&Expr> {
        match self {
            Expr::Add(v) | Expr::Mul(v) => v.iter().collect(),
            Expr::Pow(b, e) => vec![b.as_ref(), e.as_ref()],
            Expr::Appel(_, x) => vec![x.as_ref()],
            _ => Vec::new(),
        }
    }

    fn existe(&self, pred: &dyn Fn(&Expr) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        self.enfants().into_iter().any(|c| c.existe(pred))
    }

    /// Nombre de noeuds (score de simplicité).
    pub fn taille(&self) -> usize {
        1 + self.enfants().into_iter().map(Expr::taille).sum::<usize>()
    }

    /// Sépare le coefficient numérique : 3*x*y => (3, x*y) ; x => (1, x).
    pub fn coeff_et_reste(&self) -> (Nombre, Expr) {
        match self {
            Expr::Nombre(z) => (z.clone(), Expr::un()),
            Expr::Mul(fs) => match fs.first() {
                Some(Expr::Nombre(z)) => {
                    let reste: Vec<Expr> = fs[1..].to_vec();
                    let reste = if reste.len() == 1 {
                        reste.into_iter().next().unwrap_or_else(Expr::un)
                    } else {
                        Expr::Mul(reste)
                    };
                    (z.clone(), reste)
                }
                _ => (Nombre::one(), self.clone()),
            },
            _ => (Nombre::one(), self.clone()),
        }
    }

    /// x**e => (x, e) ; x => (x, 1).
    pub fn base_et_exposant(&self) -> (Expr, Expr) {
        match self {
            Expr::Pow(b, e) => ((**b).clone(), (**e).clone()),
            _ => (self.clone(), Expr::un()),
        }
    }

    /// Détecte un coeff·π (forme simple) : π, r·π.
    ///
    /// SAFE: Var => None (on ne “devine” rien).
    pub fn as_coeff_pi(&self) -> Option<BigRational> {
        match self {
            Expr::Pi => Some(BigRational::one()),
            Expr::Mul(fs) if fs.len() == 2 => match (&fs[0], &fs[1]) {
                (Expr::Nombre(z), Expr::Pi) => nombre::comme_rationnel(z).cloned(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Décompose t = r·π + reste, r rationnel (r = 0 si aucun terme en π).
    pub fn separe_multiple_pi(&self) -> (BigRational, Expr) {
        if let Some(c) = self.as_coeff_pi() {
            return (c, Expr::zero());
        }
        if let Expr::Add(termes) = self {
            let mut coeff = BigRational::zero();
            let mut reste = Vec::with_capacity(termes.len());
            for t in termes {
                match t.as_coeff_pi() {
                    Some(c) => coeff += c,
                    None => reste.push(t.clone()),
                }
            }
            return (coeff, Expr::somme(reste));
        }
        (BigRational::zero(), self.clone())
    }

    /// Reconnaît `c * log(y)` (c rationnel réel) et renvoie (c, y).
    pub fn comme_multiple_log(&self) -> Option<(BigRational, Expr)> {
        match self {
            Expr::Appel(Fonction::Log, y) => Some((BigRational::one(), (**y).clone())),
            Expr::Mul(fs) if fs.len() == 2 => match (&fs[0], &fs[1]) {
                (Expr::Nombre(z), Expr::Appel(Fonction::Log, y)) => {
                    nombre::comme_rationnel(z).map(|c| (c.clone(), (**y).clone()))
                }
                _ => None,
            },
            _ => None,
        }
    }
}

/* ------------------------ Substitution / reconstruction ------------------------ */

impl Expr {
    /// Substitution simultanée des variables (reconstruction canonique).
    pub fn substituer(&self, table: &HashMap<String, Expr>) -> Expr {
        match self {
            Expr::Var(v) => table.get(v).cloned().unwrap_or_else(|| self.clone()),
            _ => self.reconstruire_avec(&|e| e.substituer(table)),
        }
    }

    pub fn substituer_var(&self, nom: &str, valeur: &Expr) -> Expr {
        let mut table = HashMap::new();
        table.insert(nom.to_string(), valeur.clone());
        self.substituer(&table)
    }

    /// Reconstruit le noeud à partir d’enfants transformés (constructeurs canoniques).
    pub fn reconstruire_avec(&self, f: &dyn Fn(&Expr) -> Expr) -> Expr {
        match self {
            Expr::Add(v) => Expr::somme(v.iter().map(f).collect()),
            Expr::Mul(v) => Expr::produit(v.iter().map(f).collect()),
            Expr::Pow(b, e) => Expr::puissance(f(b.as_ref()), f(e.as_ref())),
            Expr::Appel(g, x) => Expr::appel(*g, f(x.as_ref())),
            _ => self.clone(),
        }
    }

    /// Canonicalisation forte : reconstruit tout l’arbre par les constructeurs.
    pub fn canon(&self) -> Expr {
        self.reconstruire_avec(&|e| e.canon())
    }

    pub fn affichage(&self, mode: ModeRendu) -> String {
        Rendu::new(mode).rendre(self)
    }
}

/* ------------------------ Affichage (ASCII par défaut) ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Rendu::new(ModeRendu::Ascii).rendre(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn termes_semblables() {
        let e = x() + x() + Expr::entier(3) - Expr::entier(1);
        assert_eq!(e.to_string(), "2*x + 2");
    }

    #[test]
    fn coefficient_et_reste() {
        let e = Expr::entier(3) * x() * Expr::var("y");
        let (c, r) = e.coeff_et_reste();
        assert_eq!(c, nombre::entier(3));
        assert_eq!(r, x() * Expr::var("y"));
    }

    #[test]
    fn substitution_simultanee() {
        let e = x() + Expr::entier(2) * Expr::var("y");
        let mut table = HashMap::new();
        table.insert("x".to_string(), Expr::var("y"));
        table.insert("y".to_string(), x());
        assert_eq!(e.substituer(&table), Expr::var("y") + Expr::entier(2) * x());
    }

    #[test]
    fn coeff_pi() {
        let e = Expr::rationnel(3, 2) * Expr::Pi;
        assert_eq!(e.as_coeff_pi(), Some(nombre::rat(3, 2)));
        assert_eq!(x().as_coeff_pi(), None);
    }
}
