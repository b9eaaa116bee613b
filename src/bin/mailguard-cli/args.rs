use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mailguard_lib::{ValidationMode, ValidationOptions};

#[derive(Parser)]
#[command(name = "mailguard-cli")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// write report to file (JSON/NDJSON/CSV selon --format)
    #[arg(long)]
    pub out: Option<String>,

    /// mode: strict|relaxed
    #[arg(long, default_value = "relaxed")]
    pub mode: String,

    /// raccourci pour --mode strict (équivaut au mode strict global)
    #[arg(long)]
    pub strict: bool,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// affiche les règles de liste noire déclenchées
    #[arg(long)]
    pub explain: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    Validate {
        /// mode: strict|relaxed (prend le pas sur l'option globale)
        #[arg(long)]
        mode: Option<String>,
        email: String,
    },
    /// affiche le motif syntaxique (sans liste noire)
    Regexp {
        #[arg(long)]
        mode: Option<String>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    /// Defaults installed for the whole process before any validation.
    pub fn default_options(&self) -> Result<ValidationOptions> {
        if self.strict {
            return Ok(ValidationOptions::strict());
        }
        Ok(ValidationOptions::new().with_mode(parse_mode(&self.mode)?))
    }
}

pub fn parse_mode(s: &str) -> Result<ValidationMode> {
    s.parse::<ValidationMode>()
        .with_context(|| format!("invalid --mode '{s}'"))
}

/// Per-call override taken from a subcommand flag.
pub fn override_options(mode: Option<&str>) -> Result<ValidationOptions> {
    match mode {
        Some(m) => Ok(ValidationOptions::new().with_mode(parse_mode(m)?)),
        None => Ok(ValidationOptions::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_flag_wins_over_mode() {
        let cli = Cli::try_parse_from(["mailguard-cli", "--strict", "--mode", "relaxed"])
            .expect("parse");
        assert!(cli.default_options().expect("options").is_strict());
    }

    #[test]
    fn bad_mode_is_an_error() {
        assert!(parse_mode("loose").is_err());
        assert!(override_options(Some("strict")).expect("ok").is_strict());
        assert_eq!(override_options(None).expect("ok"), ValidationOptions::new());
    }

    #[test]
    fn command_is_well_formed() {
        Cli::clap_command().debug_assert();
    }
}
