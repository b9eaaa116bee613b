//! Construction du motif syntaxique (local-part + grammaire de domaine).
//!
//! Les deux variantes (strict / relaxed) sont compilées une seule fois et
//! partagées par tous les appels.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::types::ValidationMode;

/// Hard ceiling for the local part, in characters, in both modes.
pub const MAX_LOCAL_LEN: usize = 64;

// classes Unicode répétées 64 fois : la limite par défaut est trop juste
const COMPILED_SIZE_LIMIT: usize = 32 * (1 << 20);

/// Whitespace as the ASCII set `[ \t\r\n\v\f]`; NBSP and other Unicode
/// spaces are ordinary characters.
pub const ASCII_WHITESPACE: &str = r"[ \t\r\n\x0B\x0C]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalPartClass {
    /// Hyphen, letters, ASCII digits and `+ . _`.
    Strict,
    /// Anything but `@` and ASCII whitespace.
    Lenient,
}

impl LocalPartClass {
    pub fn for_mode(mode: ValidationMode) -> Self {
        match mode {
            ValidationMode::Strict => Self::Strict,
            ValidationMode::Relaxed => Self::Lenient,
        }
    }

    pub fn fragment(self) -> &'static str {
        match self {
            Self::Strict => r"[-\p{L}0-9+._]",
            Self::Lenient => r"[^@ \t\r\n\x0B\x0C]",
        }
    }
}

/// `label.` repeated at least once, then a letter-only TLD of length >= 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainGrammar;

impl DomainGrammar {
    pub const LABEL: &'static str = r"[-\p{L}0-9]+";
    pub const TLD: &'static str = r"\p{L}{2,}";

    pub fn fragment(self) -> String {
        format!(r"(?:{}\.)+{}", Self::LABEL, Self::TLD)
    }
}

#[derive(Debug)]
pub struct SyntacticPattern {
    mode: ValidationMode,
    regex: Regex,
}

impl SyntacticPattern {
    /// Source of the anchored pattern for `mode`; case folding is applied
    /// at compile time, not in the source.
    pub fn source(mode: ValidationMode) -> String {
        let local = LocalPartClass::for_mode(mode).fragment();
        let domain = DomainGrammar.fragment();
        let ws = ASCII_WHITESPACE;
        format!(r"\A{ws}*({local}{{1,{MAX_LOCAL_LEN}}})@({domain}){ws}*\z")
    }

    pub(crate) fn compile(mode: ValidationMode) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&Self::source(mode))
            .case_insensitive(true)
            .size_limit(COMPILED_SIZE_LIMIT)
            .build()?;
        Ok(Self { mode, regex })
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// `(local, domain)` sans les espaces d'entourage.
    pub fn split<'a>(&self, value: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.regex.captures(value)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }
}

static STRICT: LazyLock<SyntacticPattern> = LazyLock::new(|| {
    SyntacticPattern::compile(ValidationMode::Strict).expect("strict e-mail pattern must compile")
});

static RELAXED: LazyLock<SyntacticPattern> = LazyLock::new(|| {
    SyntacticPattern::compile(ValidationMode::Relaxed).expect("relaxed e-mail pattern must compile")
});

pub fn build_pattern(mode: ValidationMode) -> &'static SyntacticPattern {
    match mode {
        ValidationMode::Strict => &STRICT,
        ValidationMode::Relaxed => &RELAXED,
    }
}
