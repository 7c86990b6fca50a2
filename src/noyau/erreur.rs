// src/noyau/erreur.rs
//
// Erreurs du noyau. Les messages sont ceux montrés à l’utilisateur
// (la couche calcul les transmet tels quels).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErreurNoyau {
    #[error("Empty expression.")]
    Vide,

    #[error("Unexpected character '{0}'.")]
    CaractereInattendu(char),

    #[error("Invalid number: {0}")]
    NombreInvalide(String),

    #[error("Unbalanced parentheses.")]
    Parentheses,

    #[error("Invalid syntax near '{0}'.")]
    Syntaxe(String),

    #[error("Invalid expression.")]
    ExpressionInvalide,

    #[error("Expression is nested too deeply (limit {0}).")]
    TropProfonde(usize),

    #[error("Unknown function: {0}")]
    FonctionInconnue(String),

    #[error("{nom}() takes {attendu} argument(s), {recu} given.")]
    Arite {
        nom: String,
        attendu: &'static str,
        recu: usize,
    },

    #[error("Cannot compute the limit of {0}.")]
    LimiteIncalculable(String),

    #[error("The limit does not exist since left hand limit = {gauche} and right hand limit = {droite}")]
    LimiteBilaterale { gauche: String, droite: String },

    #[error("Analytic solution is unavailable. Try refining the equation or switch to numeric methods.")]
    SolutionIndisponible,
}
