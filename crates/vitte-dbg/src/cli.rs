//! cli.rs — Analyse de la ligne de commande de `gubed`.
//!
//! Analogue direct du `cmdline.h` de l'implémentation d'origine : un seul
//! paramètre positionnel obligatoire (le module à déboguer), et deux
//! options à tiret simple (`-di`, `-h`), sans dépendre d'un crate tiers
//! puisque ce format n'est pas celui que `clap` modélise nativement.

/// Options résolues à partir des arguments du processus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    /// Nom du module à déboguer (sans l'extension `.wren`).
    pub script: String,
    /// `-di` : exécute sans instrumentation.
    pub disable_instrumentation: bool,
}

/// Résultat de l'analyse des arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Arguments valides : prête à lancer une session de débogage.
    Run(CliOptions),
    /// `-h` a été passé : afficher l'aide et sortir avec succès.
    Help,
    /// Arguments invalides : afficher le message (s'il n'est pas vide) puis
    /// l'usage, et sortir avec un code d'erreur.
    UsageError(String),
}

/// Analyse `args` (sans le nom du programme).
pub fn parse_args(args: &[String]) -> ParseOutcome {
    let mut disable_instrumentation = false;
    let mut positionals = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-di" => disable_instrumentation = true,
            "-h" => return ParseOutcome::Help,
            other if other.starts_with('-') => {
                return ParseOutcome::UsageError(format!("Invalid command line option {other}"));
            },
            other => positionals.push(other.to_string()),
        }
    }

    match positionals.len() {
        1 => ParseOutcome::Run(CliOptions {
            script: positionals.remove(0),
            disable_instrumentation,
        }),
        0 => ParseOutcome::UsageError("Missing <script> parameter".to_string()),
        _ => ParseOutcome::UsageError("Invalid number of parameters".to_string()),
    }
}

/// Texte d'usage affiché sur `-h` ou en cas d'erreur d'analyse.
pub fn usage(program_name: &str) -> String {
    format!(
        "Usage: {program_name} [options] <script>\n\
         \x20   -di\tDisable instrumentation\n\
         \x20   -h\tDisplay command line help\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_positional_runs() {
        let outcome = parse_args(&args(&["Foo"]));
        assert_eq!(
            outcome,
            ParseOutcome::Run(CliOptions { script: "Foo".to_string(), disable_instrumentation: false })
        );
    }

    #[test]
    fn di_flag_disables_instrumentation() {
        let outcome = parse_args(&args(&["-di", "Foo"]));
        assert_eq!(
            outcome,
            ParseOutcome::Run(CliOptions { script: "Foo".to_string(), disable_instrumentation: true })
        );
    }

    #[test]
    fn flag_order_is_irrelevant() {
        let outcome = parse_args(&args(&["Foo", "-di"]));
        assert_eq!(
            outcome,
            ParseOutcome::Run(CliOptions { script: "Foo".to_string(), disable_instrumentation: true })
        );
    }

    #[test]
    fn h_flag_yields_help_even_with_other_args() {
        assert_eq!(parse_args(&args(&["-h"])), ParseOutcome::Help);
        assert_eq!(parse_args(&args(&["Foo", "-h"])), ParseOutcome::Help);
    }

    #[test]
    fn missing_positional_is_a_usage_error() {
        assert!(matches!(parse_args(&args(&[])), ParseOutcome::UsageError(_)));
        assert!(matches!(parse_args(&args(&["-di"])), ParseOutcome::UsageError(_)));
    }

    #[test]
    fn too_many_positionals_is_a_usage_error() {
        assert!(matches!(parse_args(&args(&["Foo", "Bar"])), ParseOutcome::UsageError(_)));
    }

    #[test]
    fn unknown_option_is_a_usage_error() {
        assert!(matches!(parse_args(&args(&["-x", "Foo"])), ParseOutcome::UsageError(_)));
    }
}
