// src/calcul/erreur.rs
//
// Erreur unique de la couche calcul : un message lisible, rien d’autre.
// Les erreurs du noyau s’y replient avec leur message d’affichage.

use thiserror::Error;

use crate::noyau::ErreurNoyau;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ErreurCalcul {
    message: String,
}

impl ErreurCalcul {
    pub fn new(message: impl Into<String>) -> Self {
        ErreurCalcul {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ErreurNoyau> for ErreurCalcul {
    fn from(e: ErreurNoyau) -> Self {
        ErreurCalcul::new(e.to_string())
    }
}

pub type Resultat<T> = Result<T, ErreurCalcul>;
