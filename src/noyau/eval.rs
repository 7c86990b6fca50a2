//! Noyau : analyse (pipeline réel)
//!
//! texte -> jetons -> RPN -> Expr (canonique dès la construction)
//!
//! Les étapes intermédiaires (jetons, RPN) sont journalisées au niveau trace
//! pour garder la “démarche” hors de l’AST.

use super::erreur::ErreurNoyau;
use super::expr::Expr;
use super::jetons::{format_tokens, tokenize};
use super::rpn::{from_rpn, to_rpn};

/// API publique : lit une expression (syntaxe ASCII du moteur).
pub fn analyser(texte: &str) -> Result<Expr, ErreurNoyau> {
    let s = texte.trim();
    if s.is_empty() {
        return Err(ErreurNoyau::Vide);
    }

    // 1) Jetons
    let jetons = tokenize(s)?;
    log::trace!("jetons: {}", format_tokens(&jetons));

    // 2) RPN
    let rpn = to_rpn(&jetons)?;
    log::trace!("rpn: {}", format_tokens(&rpn));

    // 3) AST (Expr) : les constructeurs canonisent au fil de la construction
    let expr = from_rpn(&rpn)?;
    log::trace!("expr: {expr}");

    Ok(expr)
}
