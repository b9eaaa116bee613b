mod args;
mod output;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use mailguard_lib::{Validator, ValidationOptions, set_defaults};

use crate::args::{Cli, Commands, override_options};
use crate::output::{OutputRow, any_invalid, write_reports};

#[cfg(feature = "with-tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn validate_row(validator: &Validator, email: &str, options: &ValidationOptions) -> OutputRow {
    let mode = validator.effective(options).mode();
    let outcome = validator.check(Some(email), options);
    let parts = validator.pattern(options).split(email);
    OutputRow::new(email, mode, &outcome, parts)
}

fn main() -> Result<()> {
    #[cfg(feature = "with-tracing")]
    init_tracing();

    let cli = Cli::parse();
    set_defaults(cli.default_options()?);
    let validator = Validator::from_global();
    let mut rows: Vec<OutputRow> = Vec::new();

    if cli.stdin {
        let options = ValidationOptions::new();
        for line in io::stdin().lock().lines() {
            let email = line.context("read stdin")?;
            if email.trim().is_empty() {
                continue;
            }
            rows.push(validate_row(&validator, &email, &options));
        }
    } else {
        match &cli.cmd {
            Some(Commands::Validate { mode, email }) => {
                // la sous-commande a priorité
                let options = override_options(mode.as_deref())?;
                rows.push(validate_row(&validator, email, &options));
            }
            Some(Commands::Regexp { mode }) => {
                let options = override_options(mode.as_deref())?;
                println!("{}", validator.regexp(&options).as_str());
                return Ok(());
            }
            None => {
                Cli::clap_command().print_help()?;
                println!();
                return Ok(());
            }
        }
    }

    write_reports(&rows, &cli)?;

    // codes de sortie : 0 OK, 2 invalids, 1 fatal
    if any_invalid(&rows) {
        std::process::exit(2);
    }
    Ok(())
}
