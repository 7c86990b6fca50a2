// src/main.rs
//
// Calculatrice avancée : point d’entrée (terminal)
// ------------------------------------------------
// - Options      : clap (config.rs)
// - Journal      : env_logger sur stderr, warn par défaut, -v pour plus
// - Boucle       : app::lancer (rustyline)
//
// Le mode de rendu est passé explicitement à la calculatrice (pas d’état global).

mod app;
mod calcul;
mod config;
mod noyau;

use clap::Parser;

use calcul::Calculatrice;
use config::Arguments;

fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();

    env_logger::Builder::new()
        .filter_level(args.niveau_journal())
        .parse_default_env()
        .init();

    app::lancer(Calculatrice::new(args.rendu.into()))
}
