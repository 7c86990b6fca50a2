// src/app/vue.rs
//
// Entrées/sorties de la boucle interactive
// ----------------------------------------
// - Console          : ce dont la boucle a besoin (lire une ligne, écrire une ligne)
// - Terminal         : rustyline (édition de ligne + historique de la session)
// - ConsoleScriptee  : réponses préparées + transcription (tests)
//
// `lire` rend None en fin de saisie (Ctrl-D, Ctrl-C, flux fermé).

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub trait Console {
    fn lire(&mut self, invite: &str) -> Option<String>;
    fn ecrire(&mut self, ligne: &str);
}

/* ------------------------ Terminal (rustyline) ------------------------ */

pub struct Terminal {
    editeur: DefaultEditor,
}

impl Terminal {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Terminal {
            editeur: DefaultEditor::new()?,
        })
    }
}

impl Console for Terminal {
    fn lire(&mut self, invite: &str) -> Option<String> {
        match self.editeur.readline(invite) {
            Ok(ligne) => {
                if !ligne.trim().is_empty() {
                    // SAFE : un historique refusé n’empêche pas la saisie
                    if let Err(e) = self.editeur.add_history_entry(ligne.as_str()) {
                        log::debug!("historique: {e}");
                    }
                }
                Some(ligne)
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
            Err(e) => {
                log::warn!("lecture du terminal impossible: {e}");
                None
            }
        }
    }

    fn ecrire(&mut self, ligne: &str) {
        println!("{ligne}");
    }
}

/* ------------------------ Console scriptée (tests) ------------------------ */

#[cfg(test)]
pub struct ConsoleScriptee {
    reponses: std::collections::VecDeque<String>,
    transcription: Vec<String>,
}

#[cfg(test)]
impl ConsoleScriptee {
    pub fn new<'a>(reponses: impl IntoIterator<Item = &'a str>) -> Self {
        ConsoleScriptee {
            reponses: reponses.into_iter().map(str::to_string).collect(),
            transcription: Vec::new(),
        }
    }

    /// Lignes écrites, invites comprises (« Dividend: 1 »).
    pub fn transcription(&self) -> &[String] {
        &self.transcription
    }

    /// Lignes écrites par la boucle, sans les invites.
    pub fn sorties(&self) -> Vec<&str> {
        self.transcription
            .iter()
            .filter(|l| !l.starts_with('>'))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
impl Console for ConsoleScriptee {
    fn lire(&mut self, invite: &str) -> Option<String> {
        let r = self.reponses.pop_front()?;
        self.transcription.push(format!("> {invite}{r}"));
        Some(r)
    }

    fn ecrire(&mut self, ligne: &str) {
        self.transcription.push(ligne.to_string());
    }
}
