//! Liste noire appliquée après un succès syntaxique.
//!
//! Chaque règle est une alternative indépendante ; une seule correspondance
//! suffit à rejeter l'adresse.

use std::sync::LazyLock;

use phf::phf_set;
use regex::RegexSet;

use super::types::BlacklistRule;

/// Literal prefixes of the whole candidate (not of the local part).
pub const RESERVED_PREFIXES: [&str; 4] = ["danfe", "nfe", "wwww.", "webmaster"];

const BLOCKED_DOMAINS: phf::Set<&'static str> = phf_set! {
    "bradesco.com.br",
    "bb.com.br",
    "itau.com.br",
};

// indices alignés sur `pattern_sources()`
const PATTERN_RULES: [BlacklistRule; 6] = [
    BlacklistRule::RepeatedDigits,
    BlacklistRule::LeadingSymbol,
    BlacklistRule::ReservedPrefix,
    BlacklistRule::EdgeHyphen,
    BlacklistRule::HyphenNextToDot,
    BlacklistRule::HyphenNextToAt,
];

fn pattern_sources() -> Vec<String> {
    let repeated = (0..=9)
        .map(|d: u8| d.to_string().repeat(5))
        .collect::<Vec<_>>()
        .join("|");
    let reserved = RESERVED_PREFIXES
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");
    vec![
        format!(r"\A(?:{repeated})"),
        // mot et espace au sens ASCII : une lettre accentuée en tête est un symbole
        r"\A[^A-Za-z0-9_ \t\r\n\x0B\x0C*]".to_string(),
        format!(r"\A(?:{reserved})"),
        r"\A-|-\z".to_string(),
        r"-\.|\.-".to_string(),
        r"-@|@-".to_string(),
    ]
}

static PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(pattern_sources()).expect("blacklist patterns must compile")
});

/// The domain is whatever follows the last `@`, compared verbatim.
pub fn is_blocked_domain(value: &str) -> bool {
    value
        .rsplit_once('@')
        .is_some_and(|(_, domain)| BLOCKED_DOMAINS.contains(domain))
}

/// Toutes les règles déclenchées, dans l'ordre de [`BlacklistRule::ALL`].
pub fn matches(value: &str) -> Vec<BlacklistRule> {
    let hits = PATTERNS.matches(value);
    let mut rules: Vec<BlacklistRule> = hits.iter().map(|idx| PATTERN_RULES[idx]).collect();
    if is_blocked_domain(value) {
        rules.push(BlacklistRule::BlockedDomain);
    }
    rules
}

pub fn is_blacklisted(value: &str) -> bool {
    PATTERNS.is_match(value) || is_blocked_domain(value)
}
