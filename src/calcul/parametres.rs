// src/calcul/parametres.rs
//
// Listes `cle=valeur,cle=valeur` (paramètres de géométrie, substitutions).
// Ordre d’insertion conservé ; une clé répétée écrase la valeur en place.

use super::erreur::{ErreurCalcul, Resultat};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parametres {
    paires: Vec<(String, String)>,
}

impl Parametres {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insère ou remplace (la position d’origine est gardée).
    pub fn inserer(&mut self, cle: impl Into<String>, valeur: impl Into<String>) {
        let cle = cle.into();
        let valeur = valeur.into();
        match self.paires.iter_mut().find(|(k, _)| *k == cle) {
            Some((_, v)) => *v = valeur,
            None => self.paires.push((cle, valeur)),
        }
    }

    pub fn get(&self, cle: &str) -> Option<&str> {
        self.paires
            .iter()
            .find(|(k, _)| k == cle)
            .map(|(_, v)| v.as_str())
    }

    pub fn contient(&self, cle: &str) -> bool {
        self.get(cle).is_some()
    }

    pub fn len(&self) -> usize {
        self.paires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paires.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.paires.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parametres {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut p = Parametres::new();
        for (k, v) in iter {
            p.inserer(k, v);
        }
        p
    }
}

/// Lit `a=1, b=2`. Les éléments vides sont ignorés ; un élément sans `=`
/// donne « Invalid <libelle>: <element> ».
pub fn analyser_parametres(texte: &str, libelle: &str) -> Resultat<Parametres> {
    let mut p = Parametres::new();
    for element in texte.split(',') {
        let element = element.trim();
        if element.is_empty() {
            continue;
        }
        let Some((cle, valeur)) = element.split_once('=') else {
            return Err(ErreurCalcul::new(format!("Invalid {libelle}: {element}")));
        };
        p.inserer(cle.trim(), valeur.trim());
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lecture_simple() {
        let p = analyser_parametres("side_a=3, side_b = 4 ,side_c=5", "parameter").unwrap();
        let v: Vec<_> = p.iter().collect();
        assert_eq!(v, vec![("side_a", "3"), ("side_b", "4"), ("side_c", "5")]);
    }

    #[test]
    fn elements_vides_ignores() {
        let p = analyser_parametres(" , radius=2,, ", "parameter").unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("radius"), Some("2"));
        assert!(analyser_parametres("", "substitution").unwrap().is_empty());
    }

    #[test]
    fn derniere_ecriture_gagne() {
        let p = analyser_parametres("x=1,y=2,x=3", "substitution").unwrap();
        let v: Vec<_> = p.iter().collect();
        assert_eq!(v, vec![("x", "3"), ("y", "2")]);
    }

    #[test]
    fn element_sans_egal() {
        let e = analyser_parametres("radius=2,oops", "parameter").unwrap_err();
        assert_eq!(e.message(), "Invalid parameter: oops");
        let e = analyser_parametres("x", "substitution").unwrap_err();
        assert_eq!(e.message(), "Invalid substitution: x");
    }
}
