// src/calcul/normalisation.rs
//
// Nettoyage du texte saisi avant le parseur du noyau :
// - glyphes copiés/collés (×, ÷, −, √, π, ∞, …) -> syntaxe ASCII
// - ^ isolé -> ** (un ^ collé à une * est laissé tel quel)
//
// Pure, ne échoue jamais, idempotente.

/// Table des glyphes remplacés littéralement.
const GLYPHES: [(char, &str); 10] = [
    ('×', "*"),
    ('·', "*"),
    ('∙', "*"),
    ('÷', "/"),
    ('−', "-"),
    ('–', "-"),
    ('—', "-"),
    ('√', "sqrt"),
    ('π', "pi"),
    ('∞', "oo"),
];

pub fn normaliser(texte: &str) -> String {
    let mut s = String::with_capacity(texte.len());
    for c in texte.chars() {
        match GLYPHES.iter().find(|(g, _)| *g == c) {
            Some((_, r)) => s.push_str(r),
            None => s.push(c),
        }
    }

    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '^' {
            let etoile_avant = i > 0 && chars[i - 1] == '*';
            let etoile_apres = chars.get(i + 1) == Some(&'*');
            if !etoile_avant && !etoile_apres {
                out.push_str("**");
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::normaliser;
    use pretty_assertions::assert_eq;

    #[test]
    fn glyphes() {
        assert_eq!(normaliser("3×4 ÷ 2 − 1"), "3*4 / 2 - 1");
        assert_eq!(normaliser("√(2)·π"), "sqrt(2)*pi");
        assert_eq!(normaliser("−∞"), "-oo");
    }

    #[test]
    fn caret() {
        assert_eq!(normaliser("x^2 + y^3"), "x**2 + y**3");
        // collé à une étoile : inchangé
        assert_eq!(normaliser("x*^2"), "x*^2");
        assert_eq!(normaliser("x^*2"), "x^*2");
    }

    #[test]
    fn idempotente() {
        for s in ["x^2", "√(2)/2", "a ** b", "x*^2", "2·π^2"] {
            let une = normaliser(s);
            assert_eq!(normaliser(&une), une);
        }
    }
}
