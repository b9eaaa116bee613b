use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationMode {
    Strict,
    #[default]
    Relaxed,
}

impl ValidationMode {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Relaxed }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMode {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "relaxed" | "lenient" => Ok(Self::Relaxed),
            other => Err(EmailError::UnknownMode(other.to_string())),
        }
    }
}

/// Options d'une validation. Chaque champ absent laisse passer la valeur
/// de la couche inférieure (défauts du validateur) lors d'un [`merge`](Self::merge).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub strict_mode: Option<bool>,
    pub allow_nil: Option<bool>,
    pub message: Option<String>,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset "strict mode": only `strict_mode` is set.
    pub fn strict() -> Self {
        Self::new().with_strict_mode(true)
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = Some(strict);
        self
    }

    pub fn with_mode(self, mode: ValidationMode) -> Self {
        self.with_strict_mode(mode.is_strict())
    }

    pub fn with_allow_nil(mut self, allow: bool) -> Self {
        self.allow_nil = Some(allow);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Right-biased merge: fields set on `overrides` win.
    pub fn merge(&self, overrides: &ValidationOptions) -> ValidationOptions {
        ValidationOptions {
            strict_mode: overrides.strict_mode.or(self.strict_mode),
            allow_nil: overrides.allow_nil.or(self.allow_nil),
            message: overrides
                .message
                .clone()
                .or_else(|| self.message.clone()),
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict_mode.unwrap_or(false)
    }

    pub fn allows_nil(&self) -> bool {
        self.allow_nil.unwrap_or(false)
    }

    pub fn mode(&self) -> ValidationMode {
        ValidationMode::from_strict_flag(self.is_strict())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlacklistRule {
    /// `00000`, `11111`, ... at the very start.
    RepeatedDigits,
    /// First character is a symbol (not word, not whitespace, not `*`).
    LeadingSymbol,
    /// Starts with `danfe`, `nfe`, `wwww.` or `webmaster`.
    ReservedPrefix,
    EdgeHyphen,
    HyphenNextToDot,
    HyphenNextToAt,
    BlockedDomain,
}

impl BlacklistRule {
    pub const ALL: [BlacklistRule; 7] = [
        Self::RepeatedDigits,
        Self::LeadingSymbol,
        Self::ReservedPrefix,
        Self::EdgeHyphen,
        Self::HyphenNextToDot,
        Self::HyphenNextToAt,
        Self::BlockedDomain,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RepeatedDigits => "repeated_digits",
            Self::LeadingSymbol => "leading_symbol",
            Self::ReservedPrefix => "reserved_prefix",
            Self::EdgeHyphen => "edge_hyphen",
            Self::HyphenNextToDot => "hyphen_next_to_dot",
            Self::HyphenNextToAt => "hyphen_next_to_at",
            Self::BlockedDomain => "blocked_domain",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::RepeatedDigits => "starts with the same digit repeated five times",
            Self::LeadingSymbol => "starts with a symbol",
            Self::ReservedPrefix => "starts with a reserved token",
            Self::EdgeHyphen => "starts or ends with '-'",
            Self::HyphenNextToDot => "'-' adjacent to '.'",
            Self::HyphenNextToAt => "'-' adjacent to '@'",
            Self::BlockedDomain => "domain is blocked",
        }
    }
}

impl fmt::Display for BlacklistRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Résultat détaillé d'une validation ; `bool::from` redonne l'ancien contrat.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(tag = "outcome", rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Absent,
    TooLong { len: usize },
    SyntaxRejected,
    BlacklistRejected { rules: Vec<BlacklistRule> },
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Absent => "absent",
            Self::TooLong { .. } => "too_long",
            Self::SyntaxRejected => "syntax_rejected",
            Self::BlacklistRejected { .. } => "blacklist_rejected",
        }
    }

    pub fn reasons(&self) -> Vec<String> {
        match self {
            Self::Valid => Vec::new(),
            Self::Absent => vec!["value is absent".to_string()],
            Self::TooLong { len } => vec![format!(
                "total length {len} > {}",
                super::MAX_INPUT_LEN
            )],
            Self::SyntaxRejected => vec!["does not match the e-mail pattern".to_string()],
            Self::BlacklistRejected { rules } => rules
                .iter()
                .map(|rule| format!("blacklisted: {}", rule.description()))
                .collect(),
        }
    }
}

impl From<Outcome> for bool {
    fn from(outcome: Outcome) -> Self {
        outcome.is_valid()
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    pub reasons: Vec<String>,
}

impl From<&Outcome> for ValidationReport {
    fn from(outcome: &Outcome) -> Self {
        Self {
            ok: outcome.is_valid(),
            reasons: outcome.reasons(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("unknown validation mode '{0}' (use: strict|relaxed)")]
    UnknownMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_right_biased() {
        let base = ValidationOptions::strict().with_message("base");
        let over = ValidationOptions::new().with_strict_mode(false);
        let merged = base.merge(&over);
        assert!(!merged.is_strict());
        assert_eq!(merged.message(), Some("base"));
    }

    #[test]
    fn merge_keeps_base_when_override_is_empty() {
        let base = ValidationOptions::strict().with_allow_nil(true);
        let merged = base.merge(&ValidationOptions::default());
        assert_eq!(merged, base);
    }

    #[test]
    fn defaults_are_relaxed_and_disallow_nil() {
        let opts = ValidationOptions::default();
        assert_eq!(opts.mode(), ValidationMode::Relaxed);
        assert!(!opts.allows_nil());
        assert!(opts.message().is_none());
    }

    #[test]
    fn mode_parses() {
        assert_eq!("strict".parse::<ValidationMode>(), Ok(ValidationMode::Strict));
        assert_eq!(" Relaxed ".parse::<ValidationMode>(), Ok(ValidationMode::Relaxed));
        assert!(matches!(
            "loose".parse::<ValidationMode>(),
            Err(EmailError::UnknownMode(m)) if m == "loose"
        ));
    }

    #[test]
    fn outcome_coerces_to_bool() {
        assert!(bool::from(Outcome::Valid));
        assert!(!bool::from(Outcome::SyntaxRejected));
        let rejected = Outcome::BlacklistRejected {
            rules: vec![BlacklistRule::BlockedDomain],
        };
        let report = ValidationReport::from(&rejected);
        assert!(!report.ok);
        assert_eq!(report.reasons, vec!["blacklisted: domain is blocked"]);
    }
}
