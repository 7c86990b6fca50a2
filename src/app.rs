// src/app.rs
//
// Calculatrice avancée : module App (racine)
// ------------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs : menu + boucle ; vue.rs : console)
// - Fournir `lancer` pour main.rs (terminal rustyline)

pub mod etat;
pub mod vue;

use anyhow::Context;

use crate::calcul::Calculatrice;
use vue::Terminal;

/// Boucle interactive sur le terminal courant.
pub fn lancer(calc: Calculatrice) -> anyhow::Result<()> {
    let mut terminal = Terminal::new().context("terminal indisponible")?;
    log::info!("session ouverte (rendu {:?})", calc.mode());
    etat::boucle(&calc, &mut terminal);
    Ok(())
}
