//! Noyau symbolique exact
//!
//! Organisation interne :
//! - nombre.rs         : rationnels de Gauss exacts, radicaux, décimaux exacts
//! - expr.rs           : AST + requêtes + substitution
//! - canon.rs          : constructeurs canoniques (somme, produit, puissance)
//! - fonctions.rs      : sin/cos/tan/exp/log/Abs (valeurs exactes, parité, décalages)
//! - trig.rs           : angles spéciaux kπ/n + réduction au premier quadrant
//! - identites_trig.rs : sin² + cos² = 1 et voisines (passes bornées)
//! - simplifie.rs      : développement, numérateur/dénominateur, simplify
//! - format.rs         : rendu ASCII (relisible) ou Unicode
//! - lecture.rs        : lecture numérique (Complex64) pour les décisions de signe
//! - jetons.rs / rpn.rs / eval.rs : texte -> jetons -> RPN -> Expr
//! - serie.rs / limite.rs         : séries de Puiseux tronquées, limites
//! - polynome.rs / resolution.rs  : racines exactes dans C

pub mod canon;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod fonctions;
pub mod format;
pub mod identites_trig;
pub mod jetons;
pub mod lecture;
pub mod limite;
pub mod nombre;
pub mod polynome;
pub mod resolution;
pub mod rpn;
pub mod serie;
pub mod simplifie;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::ErreurNoyau;
pub use eval::analyser;
pub use expr::{Expr, Fonction};
pub use format::ModeRendu;
pub use limite::{limite, Direction};
pub use resolution::{racines_quadratiques, resoudre, Ensemble};
pub use simplifie::simplifier;
