#![forbid(unsafe_code)]
//! mailguard_lib — validation syntaxique d'e-mails + liste noire de motifs suspects

pub mod validator;
pub use validator::{
    AttributeError,
    BlacklistRule,
    DEFAULT_MESSAGE,
    DomainGrammar,
    EmailError,
    Errors,
    LocalPartClass,
    MAX_INPUT_LEN,
    MAX_LOCAL_LEN,
    Outcome,
    SyntacticPattern,
    ValidationMode,
    ValidationOptions,
    ValidationReport,
    Validator,
    blacklist,
    build_pattern,
    check,
    defaults::{defaults, enable_strict_mode, reset_defaults, set_defaults},
    is_valid_email,
    regexp,
    valid,
    validate_email,
};
