// src/config.rs
//
// Options de la ligne de commande (clap, derive).
// Pas de fichier de configuration : tout passe par les drapeaux.

use clap::{Parser, ValueEnum};

use crate::noyau::ModeRendu;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Rendu {
    /// pi, sqrt(2), x**2 (relisible tel quel)
    #[default]
    Ascii,
    /// π, √(2), x^2
    Unicode,
}

impl From<Rendu> for ModeRendu {
    fn from(r: Rendu) -> Self {
        match r {
            Rendu::Ascii => ModeRendu::Ascii,
            Rendu::Unicode => ModeRendu::Unicode,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Advanced symbolic calculator (interactive)")]
pub struct Arguments {
    /// Rendu des résultats.
    #[arg(long, value_enum, default_value_t = Rendu::Ascii)]
    pub rendu: Rendu,

    /// Verbosité du journal (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Arguments {
    /// Niveau de journal : warn par défaut, relevé par -v.
    pub fn niveau_journal(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_valide() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn valeurs_par_defaut() {
        let a = Arguments::parse_from(["calculatrice"]);
        assert_eq!(a.rendu, Rendu::Ascii);
        assert_eq!(a.niveau_journal(), log::LevelFilter::Warn);
    }

    #[test]
    fn rendu_et_verbosite() {
        let a = Arguments::parse_from(["calculatrice", "--rendu", "unicode", "-vv"]);
        assert_eq!(ModeRendu::from(a.rendu), ModeRendu::Unicode);
        assert_eq!(a.niveau_journal(), log::LevelFilter::Debug);
    }

    #[test]
    fn rendu_inconnu_refuse() {
        assert!(Arguments::try_parse_from(["calculatrice", "--rendu", "latex"]).is_err());
    }
}
