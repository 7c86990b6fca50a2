// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr par les constructeurs canoniques
//
// Règles:
// - Ident(name) suivi de '(' => appel de fonction (arité comptée sur les virgules)
// - Ident(name) sinon        => constante (pi, E, I, oo, zoo, nan) ou variable
// - Moins unaire : opérateur préfixe Neg, entre * et ** (-x**2 = -(x**2), 2**-1 = 1/2)
// - Plus unaire : ignoré
// - ** associatif à droite (2**3**2 = 2**9)
//
// Garde-fou : imbrication (parenthèses, puissances, moins unaire, appels)
// bornée par MAX_PROFONDEUR ; les parcours récursifs de l’AST restent sûrs.
//
// NOTE:
// - Les fonctions sont traitées comme des opérateurs “collés” à leur argument
//   et sont sorties après la parenthèse fermante.

use super::erreur::ErreurNoyau;
use super::expr::{Expr, Fonction};
use super::jetons::Tok;

pub const MAX_PROFONDEUR: usize = 256;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg => 3,
        Tok::Pow => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Pow | Tok::Neg)
}

fn texte(t: &Tok) -> String {
    super::jetons::format_tokens(std::slice::from_ref(t))
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Ident("pi"), Slash, Num(2), RPar]
///   rpn:    [Ident("pi"), Num(2), Slash, Appel("sin", 1)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, ErreurNoyau> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();
    // une entrée par '(' ouverte : nombre d’arguments vus (virgules + 1)
    let mut arites: Vec<usize> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire (et les valeurs juxtaposées).
    let mut prev_was_value = false;

    for (idx, tok) in tokens.iter().cloned().enumerate() {
        match tok {
            Tok::Num(_) => {
                if prev_was_value {
                    return Err(ErreurNoyau::Syntaxe(texte(&tok)));
                }
                out.push(tok);
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if prev_was_value {
                    return Err(ErreurNoyau::Syntaxe(name));
                }
                if matches!(tokens.get(idx + 1), Some(Tok::LPar)) {
                    // fonction : on la garde sur la pile (elle sortira après son argument)
                    ops.push(Tok::Appel(name, 0));
                    prev_was_value = false;
                } else {
                    out.push(Tok::Ident(name));
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(ErreurNoyau::Syntaxe("(".into()));
                }
                ops.push(tok);
                arites.push(1);
                if arites.len() > MAX_PROFONDEUR {
                    return Err(ErreurNoyau::TropProfonde(MAX_PROFONDEUR));
                }
                prev_was_value = false;
            }

            Tok::Comma => {
                if !prev_was_value {
                    return Err(ErreurNoyau::Syntaxe(",".into()));
                }
                loop {
                    match ops.last() {
                        Some(Tok::LPar) => break,
                        Some(_) => {
                            if let Some(op) = ops.pop() {
                                out.push(op);
                            }
                        }
                        None => return Err(ErreurNoyau::Syntaxe(",".into())),
                    }
                }
                // la virgule n’a de sens que dans un appel de fonction
                let dans_appel = ops.len() >= 2 && matches!(ops[ops.len() - 2], Tok::Appel(_, _));
                if !dans_appel {
                    return Err(ErreurNoyau::Syntaxe(",".into()));
                }
                if let Some(n) = arites.last_mut() {
                    *n += 1;
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                if !prev_was_value {
                    return Err(ErreurNoyau::Syntaxe(")".into()));
                }
                // dépile jusqu’à '('
                loop {
                    match ops.pop() {
                        Some(Tok::LPar) => break,
                        Some(op) => out.push(op),
                        None => return Err(ErreurNoyau::Parentheses),
                    }
                }
                let n = arites.pop().unwrap_or(1);

                // si une fonction est au sommet, on la sort aussi (avec son arité)
                if let Some(Tok::Appel(_, _)) = ops.last() {
                    if let Some(Tok::Appel(name, _)) = ops.pop() {
                        out.push(Tok::Appel(name, n));
                    }
                }

                prev_was_value = true;
            }

            Tok::Plus | Tok::Minus if !prev_was_value => {
                // unaire : + ignoré, - devient Neg (préfixe : pas de dépilement)
                if matches!(tok, Tok::Minus) {
                    ops.push(Tok::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Pow => {
                if !prev_was_value {
                    return Err(ErreurNoyau::Syntaxe(texte(&tok)));
                }
                // dépile tant que:
                // - on n'est pas bloqué par '('
                // - et on ne traverse pas une fonction (fonction reste collée à son argument)
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar | Tok::Appel(_, _)) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(&tok);

                    let doit_pop = if is_right_associative(&tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(op) = ops.pop() {
                        out.push(op);
                    }
                }

                ops.push(tok);
                prev_was_value = false;
            }

            Tok::Neg | Tok::Appel(_, _) => return Err(ErreurNoyau::ExpressionInvalide),
        }
    }

    if !prev_was_value {
        return Err(ErreurNoyau::ExpressionInvalide);
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar | Tok::Appel(_, _)) {
            return Err(ErreurNoyau::Parentheses);
        }
        out.push(op);
    }

    Ok(out)
}

/// Atome nommé : constante reconnue ou variable.
fn atome(name: String) -> Expr {
    match name.as_str() {
        "pi" => Expr::Pi,
        "E" => Expr::E,
        "I" => Expr::i(),
        "oo" => Expr::Infini,
        "zoo" => Expr::InfiniComplexe,
        "nan" => Expr::Indefini,
        _ => Expr::Var(name),
    }
}

fn verifier_arite(
    nom: &str,
    recu: usize,
    ok: bool,
    attendu: &'static str,
) -> Result<(), ErreurNoyau> {
    if ok {
        Ok(())
    } else {
        Err(ErreurNoyau::Arite {
            nom: nom.to_string(),
            attendu,
            recu,
        })
    }
}

/// Construit une Expr à partir d’une RPN.
///
/// Chaque valeur de la pile porte sa profondeur d’imbrication : `**`, le moins
/// unaire et les appels l’augmentent ; `+ - * /` s’aplatissent (la profondeur
/// due aux parenthèses est déjà bornée par `to_rpn`).
pub fn from_rpn(rpn: &[Tok]) -> Result<Expr, ErreurNoyau> {
    let mut st: Vec<(Expr, usize)> = Vec::new();

    let imbriquer = |d: usize| -> Result<usize, ErreurNoyau> {
        if d >= MAX_PROFONDEUR {
            Err(ErreurNoyau::TropProfonde(MAX_PROFONDEUR))
        } else {
            Ok(d + 1)
        }
    };

    for tok in rpn.iter().cloned() {
        match tok {
            Tok::Num(r) => st.push((Expr::depuis_rat(r), 0)),
            Tok::Ident(name) => st.push((atome(name), 0)),

            Tok::Neg => {
                let (a, d) = st.pop().ok_or(ErreurNoyau::ExpressionInvalide)?;
                st.push((-a, imbriquer(d)?));
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Pow => {
                let (b, db) = st.pop().ok_or(ErreurNoyau::ExpressionInvalide)?;
                let (a, da) = st.pop().ok_or(ErreurNoyau::ExpressionInvalide)?;
                let d = da.max(db);

                let e = match tok {
                    Tok::Plus => (a + b, d),
                    Tok::Minus => (a - b, d),
                    Tok::Star => (a * b, d),
                    Tok::Slash => (a / b, d),
                    _ => (Expr::puissance(a, b), imbriquer(d)?),
                };

                st.push(e);
            }

            Tok::Appel(name, n) => {
                if st.len() < n {
                    return Err(ErreurNoyau::ExpressionInvalide);
                }
                let args = st.split_off(st.len() - n);
                let d = args.iter().map(|(_, d)| *d).max().unwrap_or(0);
                let d = imbriquer(d)?;
                let args = args.into_iter().map(|(e, _)| e).collect();
                st.push((appliquer(&name, args)?, d));
            }

            Tok::LPar | Tok::RPar | Tok::Comma => return Err(ErreurNoyau::ExpressionInvalide),
        }
    }

    if st.len() != 1 {
        return Err(ErreurNoyau::ExpressionInvalide);
    }
    st.pop()
        .map(|(e, _)| e)
        .ok_or(ErreurNoyau::ExpressionInvalide)
}

fn appliquer(name: &str, args: Vec<Expr>) -> Result<Expr, ErreurNoyau> {
    let n = args.len();
    let mut it = args.into_iter();
    match name {
        "sqrt" => {
            verifier_arite(name, n, n == 1, "1")?;
            Ok(it.next().ok_or(ErreurNoyau::ExpressionInvalide)?.racine())
        }
        "log" | "ln" => {
            verifier_arite(name, n, n == 1 || n == 2, "1 or 2")?;
            let x = it.next().ok_or(ErreurNoyau::ExpressionInvalide)?;
            Ok(match it.next() {
                Some(base) => Expr::log_base(x, base),
                None => Expr::appel(Fonction::Log, x),
            })
        }
        _ => {
            let f = Fonction::depuis_nom(name)
                .ok_or_else(|| ErreurNoyau::FonctionInconnue(name.to_string()))?;
            verifier_arite(name, n, n == 1, "1")?;
            let x = it.next().ok_or(ErreurNoyau::ExpressionInvalide)?;
            Ok(Expr::appel(f, x))
        }
    }
}
