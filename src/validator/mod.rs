mod attribute;
pub mod blacklist;
pub mod defaults;
mod pattern;
mod types;

use std::sync::Arc;

use regex::Regex;

pub use attribute::{AttributeError, DEFAULT_MESSAGE, Errors};
pub use pattern::{
    DomainGrammar, LocalPartClass, MAX_LOCAL_LEN, SyntacticPattern, build_pattern,
};
pub use types::{
    BlacklistRule, EmailError, Outcome, ValidationMode, ValidationOptions, ValidationReport,
};

/// Au-delà, l'entrée est rejetée sans passer par les regex.
pub const MAX_INPUT_LEN: usize = 320;

/// Validateur porteur de ses propres défauts ; les options par appel sont
/// fusionnées par-dessus (l'appel gagne).
#[derive(Debug, Clone, Default)]
pub struct Validator {
    defaults: Arc<ValidationOptions>,
}

impl Validator {
    pub fn new(defaults: ValidationOptions) -> Self {
        Self {
            defaults: Arc::new(defaults),
        }
    }

    pub fn strict() -> Self {
        Self::new(ValidationOptions::strict())
    }

    /// Snapshot of the process-wide defaults at call time.
    pub fn from_global() -> Self {
        Self {
            defaults: defaults::defaults(),
        }
    }

    pub fn defaults(&self) -> &ValidationOptions {
        &self.defaults
    }

    pub fn effective(&self, options: &ValidationOptions) -> ValidationOptions {
        self.defaults.merge(options)
    }

    pub fn pattern(&self, options: &ValidationOptions) -> &'static SyntacticPattern {
        build_pattern(self.effective(options).mode())
    }

    pub fn regexp(&self, options: &ValidationOptions) -> &'static Regex {
        self.pattern(options).regex()
    }

    pub fn check(&self, value: Option<&str>, options: &ValidationOptions) -> Outcome {
        let Some(value) = value else {
            return Outcome::Absent;
        };

        let len = value.chars().count();
        if len > MAX_INPUT_LEN {
            #[cfg(feature = "with-tracing")]
            tracing::debug!(len, "e-mail rejected: input too long");
            return Outcome::TooLong { len };
        }

        let pattern = self.pattern(options);
        if !pattern.is_match(value) {
            #[cfg(feature = "with-tracing")]
            tracing::debug!(mode = %pattern.mode(), "e-mail rejected: syntax");
            return Outcome::SyntaxRejected;
        }

        let rules = blacklist::matches(value);
        if rules.is_empty() {
            Outcome::Valid
        } else {
            #[cfg(feature = "with-tracing")]
            tracing::debug!(?rules, "e-mail rejected: blacklist");
            Outcome::BlacklistRejected { rules }
        }
    }

    pub fn valid(&self, value: Option<&str>, options: &ValidationOptions) -> bool {
        self.check(value, options).is_valid()
    }

    pub fn report(&self, value: Option<&str>, options: &ValidationOptions) -> ValidationReport {
        ValidationReport::from(&self.check(value, options))
    }
}

pub fn regexp(options: &ValidationOptions) -> &'static Regex {
    Validator::from_global().regexp(options)
}

pub fn check(value: Option<&str>, options: &ValidationOptions) -> Outcome {
    Validator::from_global().check(value, options)
}

pub fn valid(value: Option<&str>, options: &ValidationOptions) -> bool {
    Validator::from_global().valid(value, options)
}

pub fn is_valid_email(value: &str) -> bool {
    valid(Some(value), &ValidationOptions::default())
}

pub fn validate_email(email: &str, mode: ValidationMode) -> ValidationReport {
    Validator::from_global().report(Some(email), &ValidationOptions::new().with_mode(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relaxed() -> Validator {
        Validator::default()
    }

    #[test]
    fn accepts_basic() {
        let r = relaxed().report(Some("alice@example.com"), &ValidationOptions::default());
        assert!(r.ok, "{:?}", r.reasons);
    }

    #[test]
    fn absent_value_is_invalid() {
        let v = relaxed();
        assert_eq!(v.check(None, &ValidationOptions::default()), Outcome::Absent);
        assert!(!v.valid(None, &ValidationOptions::new().with_allow_nil(true)));
    }

    #[test]
    fn syntax_failure_skips_blacklist() {
        let outcome = relaxed().check(Some("-nope@com"), &ValidationOptions::default());
        assert_eq!(outcome, Outcome::SyntaxRejected);
    }

    #[test]
    fn blacklist_overrides_syntax() {
        let opts = ValidationOptions::default();
        let v = relaxed();
        assert!(v.regexp(&opts).is_match("danfe@example.com"));
        assert_eq!(
            v.check(Some("danfe@example.com"), &opts),
            Outcome::BlacklistRejected {
                rules: vec![BlacklistRule::ReservedPrefix]
            }
        );
    }

    #[test]
    fn too_long_is_rejected_before_matching() {
        let long = format!("user@{}.com", "a".repeat(400));
        let outcome = relaxed().check(Some(&long), &ValidationOptions::default());
        assert!(matches!(outcome, Outcome::TooLong { len } if len == long.len()));
    }

    #[test]
    fn per_call_options_win_over_defaults() {
        let strict = Validator::strict();
        let email = Some("hans,peter@example.com");
        assert!(!strict.valid(email, &ValidationOptions::default()));
        assert!(strict.valid(email, &ValidationOptions::new().with_strict_mode(false)));
        assert!(relaxed().valid(email, &ValidationOptions::default()));
        assert!(!relaxed().valid(email, &ValidationOptions::strict()));
    }

    #[test]
    fn regexp_follows_effective_mode() {
        let strict = Validator::strict();
        assert_eq!(
            strict.pattern(&ValidationOptions::default()).mode(),
            ValidationMode::Strict
        );
        assert_eq!(
            strict
                .pattern(&ValidationOptions::new().with_mode(ValidationMode::Relaxed))
                .mode(),
            ValidationMode::Relaxed
        );
    }

    #[test]
    fn report_lists_blacklist_reasons() {
        let r = relaxed().report(Some("john@itau.com.br"), &ValidationOptions::default());
        assert!(!r.ok);
        assert_eq!(r.reasons, vec!["blacklisted: domain is blocked"]);
    }
}
