// src/noyau/jetons.rs

use num_rational::BigRational;

use super::erreur::ErreurNoyau;
use super::nombre::lire_decimal;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(BigRational),

    // Fonctions + variables + constantes (pi, E, I, oo, zoo, nan)
    // NOTE: le parse (RPN->Expr) décidera si c’est une fonction ou un atome.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Pow, // ** ou ^

    LPar,
    RPar,
    Comma,

    // produits par to_rpn() seulement
    Neg,
    Appel(String, usize),
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - entiers et décimaux exacts (ex: 12, 2.5, .5, 1e-3, 6.02E23)
/// - opérateurs + - * / ** ^
/// - parenthèses ( ) et virgule (arguments)
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (sensibles à la casse : E ≠ e, I ≠ i)
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurNoyau> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Ponctuation + opérateurs
        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Comma),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Pow),
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    i += 1;
                    Some(Tok::Pow)
                } else {
                    Some(Tok::Star)
                }
            }
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word));
            continue;
        }

        // Nombre décimal : chiffres [. chiffres] [e[+-]chiffres]
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // exposant seulement s’il est suivi d’un chiffre (sinon "2e" = 2 puis ident e)
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let texte: String = chars[start..i].iter().collect();
            let r = lire_decimal(&texte).ok_or(ErreurNoyau::NombreInvalide(texte))?;
            out.push(Tok::Num(r));
            continue;
        }

        return Err(ErreurNoyau::CaractereInattendu(c));
    }

    Ok(out)
}

/// Format utilitaire (journal de “démarche”) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(r) => {
                if r.is_integer() {
                    format!("{}", r.numer())
                } else {
                    format!("{}/{}", r.numer(), r.denom())
                }
            }
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Pow => "**".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Comma => ",".to_string(),

            Tok::Neg => "neg".to_string(),
            Tok::Appel(name, n) => format!("{name}/{n}"),
        };
        out.push(s);
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::nombre::rat;
    use pretty_assertions::assert_eq;

    #[test]
    fn double_etoile_et_caret() {
        let t = tokenize("x**2 ^ 3").unwrap();
        assert_eq!(format_tokens(&t), "x ** 2 ** 3");
    }

    #[test]
    fn decimaux_et_scientifique() {
        let t = tokenize("2.5 + 1e-3").unwrap();
        assert_eq!(
            t,
            vec![Tok::Num(rat(5, 2)), Tok::Plus, Tok::Num(rat(1, 1000))]
        );
        // "2e" sans chiffre : nombre puis identifiant
        let t = tokenize("2e").unwrap();
        assert_eq!(t, vec![Tok::Num(rat(2, 1)), Tok::Ident("e".into())]);
    }

    #[test]
    fn casse_preservee() {
        let t = tokenize("E*I").unwrap();
        assert_eq!(
            t,
            vec![Tok::Ident("E".into()), Tok::Star, Tok::Ident("I".into())]
        );
    }

    #[test]
    fn caractere_inconnu() {
        assert_eq!(tokenize("2 $ 3"), Err(ErreurNoyau::CaractereInattendu('$')));
        assert!(matches!(tokenize("1.2.3"), Err(ErreurNoyau::NombreInvalide(_))));
    }
}
