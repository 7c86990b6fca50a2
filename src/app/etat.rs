//! src/app/etat.rs
//!
//! Menu + boucle interactive (sans terminal concret : tout passe par `Console`).
//!
//! Contrats :
//! - Le menu est une table clé -> (libellé, action), réaffichée à chaque tour.
//! - Choix vide ou fin de saisie : « Goodbye! » et sortie.
//! - Une erreur de calcul s’affiche (« Error: ... ») et la boucle continue.

use super::vue::Console;
use crate::calcul::{analyser_parametres, geometrie, Calculatrice, ErreurCalcul, Operande};
use crate::noyau::Expr;

const BANNIERE: &str = "Advanced calculator (press Enter on empty choice to exit).";

/// Pourquoi une action s’arrête avant d’afficher son résultat.
#[derive(Debug)]
enum Arret {
    Calcul(ErreurCalcul),
    FinDeSaisie,
}

impl From<ErreurCalcul> for Arret {
    fn from(e: ErreurCalcul) -> Self {
        Arret::Calcul(e)
    }
}

type Action = fn(&Calculatrice, &mut dyn Console) -> Result<(), Arret>;

pub struct EntreeMenu {
    pub cle: &'static str,
    pub libelle: &'static str,
    action: Action,
}

pub const MENU: [EntreeMenu; 13] = [
    EntreeMenu { cle: "1", libelle: "Addition", action: addition },
    EntreeMenu { cle: "2", libelle: "Subtraction", action: soustraction },
    EntreeMenu { cle: "3", libelle: "Multiplication", action: multiplication },
    EntreeMenu { cle: "4", libelle: "Division", action: division },
    EntreeMenu { cle: "5", libelle: "Exponentiation", action: puissance },
    EntreeMenu { cle: "6", libelle: "Root", action: racine },
    EntreeMenu { cle: "7", libelle: "Absolute value", action: absolu },
    EntreeMenu { cle: "8", libelle: "Logarithm", action: logarithme },
    EntreeMenu { cle: "9", libelle: "Quadratic equation", action: quadratique },
    EntreeMenu { cle: "10", libelle: "Geometry helper", action: aide_geometrie },
    EntreeMenu { cle: "11", libelle: "Limit", action: limite },
    EntreeMenu { cle: "12", libelle: "Expression mode", action: expression },
    EntreeMenu { cle: "13", libelle: "Equation mode", action: equation },
];

/* ------------------------ Boucle ------------------------ */

pub fn boucle(calc: &Calculatrice, console: &mut dyn Console) {
    console.ecrire(BANNIERE);
    loop {
        console.ecrire("");
        console.ecrire("Choose an action:");
        for e in &MENU {
            console.ecrire(&format!("  {}. {}", e.cle, e.libelle));
        }
        console.ecrire("");
        let choix = console.lire("Your choice: ").unwrap_or_default();
        let choix = choix.trim();
        if choix.is_empty() {
            console.ecrire("Goodbye!");
            return;
        }

        let Some(entree) = MENU.iter().find(|e| e.cle == choix) else {
            console.ecrire("Unknown command. Try again.");
            continue;
        };

        log::debug!("menu: {}", entree.libelle);
        match (entree.action)(calc, console) {
            Ok(()) => {}
            Err(Arret::Calcul(e)) => {
                log::info!("{}: {e}", entree.libelle);
                console.ecrire(&format!("Error: {}", e.message()));
            }
            Err(Arret::FinDeSaisie) => {
                console.ecrire("Goodbye!");
                return;
            }
        }
    }
}

/* ------------------------ Saisie ------------------------ */

/// Valeur éventuellement vide (espaces retirés).
fn demander(console: &mut dyn Console, invite: &str) -> Result<String, Arret> {
    console
        .lire(invite)
        .map(|s| s.trim().to_string())
        .ok_or(Arret::FinDeSaisie)
}

fn exiger(console: &mut dyn Console, invite: &str) -> Result<String, Arret> {
    let v = demander(console, invite)?;
    if v.is_empty() {
        return Err(ErreurCalcul::new("Value cannot be empty.").into());
    }
    Ok(v)
}

/// Deux opérandes obligatoires.
fn paire(console: &mut dyn Console, premier: &str, second: &str) -> Result<(String, String), Arret> {
    let a = exiger(console, premier)?;
    let b = exiger(console, second)?;
    Ok((a, b))
}

fn resultat(calc: &Calculatrice, console: &mut dyn Console, e: &Expr) {
    console.ecrire(&format!("Result: {}", calc.rendre(e)));
}

/* ------------------------ Actions ------------------------ */

fn addition(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let (a, b) = paire(console, "First addend: ", "Second addend: ")?;
    let r = calc.additionner(a, b)?;
    resultat(calc, console, &r);
    Ok(())
}

fn soustraction(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let (a, b) = paire(console, "Minuend: ", "Subtrahend: ")?;
    let r = calc.soustraire(a, b)?;
    resultat(calc, console, &r);
    Ok(())
}

fn multiplication(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let (a, b) = paire(console, "First factor: ", "Second factor: ")?;
    let r = calc.multiplier(a, b)?;
    resultat(calc, console, &r);
    Ok(())
}

fn division(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let (a, b) = paire(console, "Dividend: ", "Divisor: ")?;
    let r = calc.diviser(a, b)?;
    resultat(calc, console, &r);
    Ok(())
}

fn puissance(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let (b, e) = paire(console, "Base: ", "Exponent: ")?;
    let r = calc.puissance(b, e)?;
    resultat(calc, console, &r);
    Ok(())
}

fn racine(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let v = exiger(console, "Radicand: ")?;
    let mut degre = demander(console, "Root degree (default 2): ")?;
    if degre.is_empty() {
        degre = "2".to_string();
    }
    let r = calc.racine(v, degre)?;
    resultat(calc, console, &r);
    Ok(())
}

fn absolu(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let v = exiger(console, "Argument for absolute value: ")?;
    let r = calc.valeur_absolue(v)?;
    resultat(calc, console, &r);
    Ok(())
}

fn logarithme(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let v = exiger(console, "Logarithm argument: ")?;
    let base = demander(console, "Base (leave blank for natural logarithm): ")?;
    let base = (!base.is_empty()).then(|| Operande::from(base));
    let r = calc.logarithme(v, base)?;
    resultat(calc, console, &r);
    Ok(())
}

fn quadratique(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let a = exiger(console, "Coefficient a: ")?;
    let b = exiger(console, "Coefficient b: ")?;
    let c = exiger(console, "Coefficient c: ")?;
    let (r1, r2) = calc.resoudre_quadratique(a, b, c)?;
    console.ecrire(&format!("Roots: {}, {}", calc.rendre(&r1), calc.rendre(&r2)));
    Ok(())
}

fn aide_geometrie(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let noms: Vec<&str> = geometrie::figures().collect();
    console.ecrire(&format!("Available operations: {}", noms.join(", ")));
    let figure = exiger(console, "Operation name: ")?;
    let brut = demander(
        console,
        "Parameters (comma separated, e.g. radius=3 or side_a=3,side_b=4,side_c=5): ",
    )?;
    let parametres = analyser_parametres(&brut, "parameter")?;
    let r = calc.geometrie(&figure, &parametres)?;
    console.ecrire(&r.affichage(calc.mode()));
    Ok(())
}

fn limite(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let e = exiger(console, "Expression: ")?;
    let var = exiger(console, "Variable: ")?;
    let point = exiger(console, "Approaches: ")?;
    let mut sens = demander(console, "Direction [both/plus/minus] (default both): ")?;
    if sens.is_empty() {
        sens = "both".to_string();
    }
    let l = calc.limite(&e, &var, point, &sens)?;
    console.ecrire(&format!("Limit: {}", calc.rendre(&l)));
    Ok(())
}

fn expression(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let e = exiger(console, "Expression: ")?;
    let brut = demander(console, "Substitutions (format x=1,y=2, optional): ")?;
    let subs = analyser_parametres(&brut, "substitution")?;
    let r = calc.evaluer_expression(&e, Some(&subs))?;
    resultat(calc, console, &r);
    Ok(())
}

fn equation(calc: &Calculatrice, console: &mut dyn Console) -> Result<(), Arret> {
    let eq = exiger(console, "Equation (use '=' or imply =0): ")?;
    let var = exiger(console, "Solve for variable: ")?;
    let s = calc.resoudre_equation(&eq, &var)?;
    console.ecrire(&format!("Solutions: {}", s.affichage(calc.mode())));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::vue::ConsoleScriptee;
    use crate::noyau::ModeRendu;
    use pretty_assertions::assert_eq;

    /// Lignes produites par les actions (ni menu, ni bannière, ni invites).
    fn session(mode: ModeRendu, reponses: &[&str]) -> Vec<String> {
        let mut console = ConsoleScriptee::new(reponses.iter().copied());
        boucle(&Calculatrice::new(mode), &mut console);
        console
            .sorties()
            .into_iter()
            .filter(|l| {
                !l.is_empty()
                    && *l != BANNIERE
                    && *l != "Choose an action:"
                    && !l.starts_with("  ")
            })
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn menu_complet_puis_sortie() {
        let mut console = ConsoleScriptee::new([""]);
        boucle(&Calculatrice::default(), &mut console);
        let t = console.transcription();
        assert_eq!(t[0], BANNIERE);
        assert_eq!(t[2], "Choose an action:");
        assert_eq!(t[3], "  1. Addition");
        assert_eq!(t[15], "  13. Equation mode");
        assert_eq!(t[17], "> Your choice: ");
        assert_eq!(t.last().map(String::as_str), Some("Goodbye!"));
    }

    #[test]
    fn arithmetique_de_bout_en_bout() {
        let sorties = session(
            ModeRendu::Ascii,
            &[
                "1", "1/2", "1/3", //
                "4", "1", "0", //
                "6", "8", "", //
                "8", "8", "2", //
                "9", "1", "0", "1", //
                "",
            ],
        );
        assert_eq!(
            sorties,
            vec![
                "Result: 5/6",
                "Error: Division by zero is not allowed.",
                "Result: 2*sqrt(2)",
                "Result: 3",
                "Roots: I, -I",
                "Goodbye!",
            ]
        );
    }

    #[test]
    fn geometrie_limite_equation() {
        let sorties = session(
            ModeRendu::Ascii,
            &[
                "10", "TRIANGLE_AREA", "side_a=13, side_b=14, side_c=15", //
                "10", "circle_area", "radius", //
                "11", "(1 + 1/x)^x", "x", "oo", "", //
                "12", "x**2 + y", "x=3,y=1", //
                "13", "x**5 = x", "x", //
                "",
            ],
        );
        assert_eq!(
            sorties,
            vec![
                "Available operations: circle_area, circle_circumference, rectangle_area, \
                 rectangle_perimeter, triangle_area, triangle_perimeter",
                "triangle_area: 84",
                "Available operations: circle_area, circle_circumference, rectangle_area, \
                 rectangle_perimeter, triangle_area, triangle_perimeter",
                "Error: Invalid parameter: radius",
                "Limit: E",
                "Result: 10",
                "Solutions: {-1, 0, 1, -I, I}",
                "Goodbye!",
            ]
        );
    }

    #[test]
    fn erreurs_de_saisie() {
        let sorties = session(ModeRendu::Ascii, &["42", "1", "", "7", "(1", ""]);
        assert_eq!(
            sorties,
            vec![
                "Unknown command. Try again.",
                "Error: Value cannot be empty.",
                "Error: Unbalanced parentheses.",
                "Goodbye!",
            ]
        );
    }

    #[test]
    fn imbrication_excessive_puis_reprise() {
        let profonde = format!("{}x{}", "sin(".repeat(5000), ")".repeat(5000));
        let sorties = session(ModeRendu::Ascii, &["7", &profonde, "7", "-3", ""]);
        assert_eq!(
            sorties,
            vec![
                "Error: Expression is nested too deeply (limit 256).",
                "Result: 3",
                "Goodbye!",
            ]
        );
    }

    #[test]
    fn fin_de_saisie_dans_une_action() {
        // le flux se ferme au milieu d’une addition
        let sorties = session(ModeRendu::Ascii, &["1", "2"]);
        assert_eq!(sorties, vec!["Goodbye!"]);
    }

    #[test]
    fn rendu_unicode() {
        let sorties = session(ModeRendu::Unicode, &["13", "x^2 = 2", "x", "5", "π", "2", ""]);
        assert_eq!(
            sorties,
            vec!["Solutions: {-√(2), √(2)}", "Result: π^2", "Goodbye!"]
        );
    }
}
