// src/calcul/geometrie.rs
//
// Table de dispatch des six figures : nom -> (paramètres attendus, calcul).
// Chaque longueur est contrôlée (constante, réelle, > 0) avant le calcul.

use std::cmp::Ordering;
use std::fmt;

use num_rational::BigRational;
use num_traits::Zero;

use super::erreur::{ErreurCalcul, Resultat};
use super::parametres::Parametres;
use super::Calculatrice;
use crate::noyau::{lecture, simplifier, Expr, ModeRendu};

/// Résultat étiqueté : « circle_area: 9*pi ».
#[derive(Clone, Debug, PartialEq)]
pub struct ResultatGeometrie {
    pub nom: &'static str,
    pub valeur: Expr,
}

impl ResultatGeometrie {
    pub fn affichage(&self, mode: ModeRendu) -> String {
        format!("{}: {}", self.nom, self.valeur.affichage(mode))
    }
}

impl fmt::Display for ResultatGeometrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.affichage(ModeRendu::Ascii))
    }
}

type Calcul = fn(&Calculatrice, &Parametres) -> Resultat<Expr>;

struct Figure {
    nom: &'static str,
    parametres: &'static [&'static str],
    calcul: Calcul,
}

const FIGURES: [Figure; 6] = [
    Figure {
        nom: "circle_area",
        parametres: &["radius"],
        calcul: aire_cercle,
    },
    Figure {
        nom: "circle_circumference",
        parametres: &["radius"],
        calcul: perimetre_cercle,
    },
    Figure {
        nom: "rectangle_area",
        parametres: &["width", "height"],
        calcul: aire_rectangle,
    },
    Figure {
        nom: "rectangle_perimeter",
        parametres: &["width", "height"],
        calcul: perimetre_rectangle,
    },
    Figure {
        nom: "triangle_area",
        parametres: &["side_a", "side_b", "side_c"],
        calcul: aire_triangle,
    },
    Figure {
        nom: "triangle_perimeter",
        parametres: &["side_a", "side_b", "side_c"],
        calcul: perimetre_triangle,
    },
];

/// Noms des figures, dans l’ordre de la table.
pub fn figures() -> impl Iterator<Item = &'static str> {
    FIGURES.iter().map(|f| f.nom)
}

impl Calculatrice {
    pub fn geometrie(&self, figure: &str, parametres: &Parametres) -> Resultat<ResultatGeometrie> {
        let cle = figure.trim().to_lowercase();
        let Some(fig) = FIGURES.iter().find(|f| f.nom == cle) else {
            let noms: Vec<&str> = figures().collect();
            return Err(ErreurCalcul::new(format!(
                "Unknown geometry operation. Available: {}",
                noms.join(", ")
            )));
        };
        let ensemble_exact = parametres.len() == fig.parametres.len()
            && fig.parametres.iter().all(|p| parametres.contient(p));
        if !ensemble_exact {
            return Err(ErreurCalcul::new(
                "Invalid set of parameters for the chosen operation.",
            ));
        }
        log::debug!("géométrie: {} {:?}", fig.nom, parametres);
        let valeur = simplifier(&(fig.calcul)(self, parametres)?);
        Ok(ResultatGeometrie {
            nom: fig.nom,
            valeur,
        })
    }

    /// Longueur strictement positive ; `nom` sert aux messages (« Side a »).
    fn longueur(&self, parametres: &Parametres, cle: &str, nom: &str) -> Resultat<Expr> {
        let texte = parametres.get(cle).ok_or_else(|| {
            ErreurCalcul::new("Invalid set of parameters for the chosen operation.")
        })?;
        let v = simplifier(&self.valeur(texte)?);
        if !v.est_constante() {
            return Err(ErreurCalcul::new(format!("{nom} must be numeric.")));
        }
        if v.contient_non_fini() || !lecture::est_reel(&v) {
            return Err(ErreurCalcul::new(format!("{nom} must be real.")));
        }
        if signe(&v) != Some(Ordering::Greater) {
            return Err(ErreurCalcul::new(format!("{nom} must be greater than zero.")));
        }
        Ok(v)
    }

    fn cotes(&self, p: &Parametres) -> Resultat<[Expr; 3]> {
        let a = self.longueur(p, "side_a", "Side a")?;
        let b = self.longueur(p, "side_b", "Side b")?;
        let c = self.longueur(p, "side_c", "Side c")?;
        for (x, y, z) in [(&a, &b, &c), (&a, &c, &b), (&b, &c, &a)] {
            if inferieur_ou_egal(&(x.clone() + y.clone()), z) {
                return Err(ErreurCalcul::new("Triangle inequality is violated."));
            }
        }
        Ok([a, b, c])
    }
}

/// Signe exact pour les rationnels, lecture numérique sinon.
fn signe(v: &Expr) -> Option<Ordering> {
    match v.comme_rationnel() {
        Some(r) => Some(r.cmp(&BigRational::zero())),
        None => lecture::signe(v),
    }
}

/// x ≤ y ; un écart indécidable (trop proche de 0) compte comme une égalité.
fn inferieur_ou_egal(x: &Expr, y: &Expr) -> bool {
    let ecart = simplifier(&(y.clone() - x.clone()));
    signe(&ecart) != Some(Ordering::Less)
}

/* ------------------------ Formules ------------------------ */

fn aire_cercle(c: &Calculatrice, p: &Parametres) -> Resultat<Expr> {
    let r = c.longueur(p, "radius", "Radius")?;
    Ok(Expr::Pi * Expr::puissance(r, Expr::entier(2)))
}

fn perimetre_cercle(c: &Calculatrice, p: &Parametres) -> Resultat<Expr> {
    let r = c.longueur(p, "radius", "Radius")?;
    Ok(Expr::entier(2) * Expr::Pi * r)
}

fn aire_rectangle(c: &Calculatrice, p: &Parametres) -> Resultat<Expr> {
    let w = c.longueur(p, "width", "Width")?;
    let h = c.longueur(p, "height", "Height")?;
    Ok(w * h)
}

fn perimetre_rectangle(c: &Calculatrice, p: &Parametres) -> Resultat<Expr> {
    let w = c.longueur(p, "width", "Width")?;
    let h = c.longueur(p, "height", "Height")?;
    Ok(Expr::entier(2) * (w + h))
}

/// Formule de Héron.
fn aire_triangle(c: &Calculatrice, p: &Parametres) -> Resultat<Expr> {
    let [a, b, cc] = c.cotes(p)?;
    let s = (a.clone() + b.clone() + cc.clone()) / Expr::entier(2);
    let produit = s.clone() * (s.clone() - a) * (s.clone() - b) * (s - cc);
    Ok(simplifier(&produit).racine())
}

fn perimetre_triangle(c: &Calculatrice, p: &Parametres) -> Resultat<Expr> {
    let [a, b, cc] = c.cotes(p)?;
    Ok(a + b + cc)
}
