#[cfg(any(feature = "with-serde", feature = "with-csv"))]
use anyhow::Context;
use anyhow::{Result, bail};

use crate::args::Cli;
use mailguard_lib::{Outcome, ValidationMode};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct OutputRow {
    pub original: String,
    pub mode: ValidationMode,
    pub valid: bool,
    pub outcome: &'static str,
    pub reasons: Vec<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub rules: Vec<&'static str>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub local: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub domain: Option<String>,
}

impl OutputRow {
    /// `parts` is the `(local, domain)` split from the syntactic pattern, when it matched.
    pub fn new(
        original: impl Into<String>,
        mode: ValidationMode,
        outcome: &Outcome,
        parts: Option<(&str, &str)>,
    ) -> Self {
        let rules = match outcome {
            Outcome::BlacklistRejected { rules } => rules.iter().map(|r| r.as_str()).collect(),
            _ => Vec::new(),
        };
        Self {
            original: original.into(),
            mode,
            valid: outcome.is_valid(),
            outcome: outcome.kind(),
            reasons: outcome.reasons(),
            rules,
            local: parts.map(|(local, _)| local.to_string()),
            domain: parts.map(|(_, domain)| domain.to_string()),
        }
    }
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows, cli),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

pub fn any_invalid(rows: &[OutputRow]) -> bool {
    rows.iter().any(|row| !row.valid)
}

fn write_human(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    for row in rows {
        if row.valid {
            println!("[OK]    {}", row.original);
        } else {
            println!("[INVALID] {} :: {}", row.original, row.reasons.join("; "));
        }
        if cli.explain {
            if let (Some(local), Some(domain)) = (&row.local, &row.domain) {
                println!("        local: {local}  domain: {domain}");
            }
            if !row.rules.is_empty() {
                println!("        rules: {}", row.rules.join(", "));
            }
        }
    }
    Ok(())
}

#[cfg(feature = "with-serde")]
fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=ndjson nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

#[cfg(feature = "with-csv")]
fn csv_record(row: &OutputRow) -> [String; 7] {
    [
        row.original.clone(),
        row.local.clone().unwrap_or_default(),
        row.domain.clone().unwrap_or_default(),
        row.mode.as_str().to_string(),
        if row.valid { "true" } else { "false" }.to_string(),
        row.outcome.to_string(),
        row.rules.join("|"),
    ]
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailguard_lib::BlacklistRule;

    #[test]
    fn row_carries_blacklist_rules() {
        let outcome = Outcome::BlacklistRejected {
            rules: vec![BlacklistRule::EdgeHyphen, BlacklistRule::LeadingSymbol],
        };
        let row = OutputRow::new(
            "-x@example.com",
            ValidationMode::Relaxed,
            &outcome,
            Some(("-x", "example.com")),
        );
        assert!(!row.valid);
        assert_eq!(row.outcome, "blacklist_rejected");
        assert_eq!(row.rules, vec!["edge_hyphen", "leading_symbol"]);
        assert_eq!(row.local.as_deref(), Some("-x"));
        assert_eq!(row.domain.as_deref(), Some("example.com"));
        assert!(any_invalid(&[row]));
    }

    #[test]
    fn valid_row_has_no_reasons() {
        let row = OutputRow::new("a@b.co", ValidationMode::Strict, &Outcome::Valid, None);
        assert!(row.valid);
        assert!(row.local.is_none());
        assert!(row.reasons.is_empty());
        assert!(!any_invalid(&[row]));
    }
}
