use std::collections::BTreeMap;

use thiserror::Error;

use super::Validator;
use super::types::ValidationOptions;

/// Message used when the caller did not supply one.
pub const DEFAULT_MESSAGE: &str = "is invalid";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{attribute} {message}")]
pub struct AttributeError {
    pub attribute: String,
    pub message: String,
}

/// Erreurs collectées, regroupées par attribut.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    by_attribute: BTreeMap<String, Vec<String>>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.by_attribute
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, attribute: &str) -> &[String] {
        self.by_attribute
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_attribute.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_attribute.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_attribute
            .iter()
            .flat_map(|(attr, msgs)| msgs.iter().map(move |m| (attr.as_str(), m.as_str())))
    }
}

impl Validator {
    /// Valide la valeur d'un attribut comme le ferait un pipeline de
    /// validation d'enregistrement : `allow_nil` court-circuite une valeur absente.
    pub fn validate_attribute(
        &self,
        attribute: &str,
        value: Option<&str>,
        options: &ValidationOptions,
    ) -> Result<(), AttributeError> {
        let effective = self.effective(options);
        if value.is_none() && effective.allows_nil() {
            return Ok(());
        }
        if self.valid(value, options) {
            return Ok(());
        }
        Err(AttributeError {
            attribute: attribute.to_string(),
            message: effective.message().unwrap_or(DEFAULT_MESSAGE).to_string(),
        })
    }

    /// Returns `true` when no error was added.
    pub fn validate_into(
        &self,
        errors: &mut Errors,
        attribute: &str,
        value: Option<&str>,
        options: &ValidationOptions,
    ) -> bool {
        match self.validate_attribute(attribute, value, options) {
            Ok(()) => true,
            Err(err) => {
                errors.add(err.attribute, err.message);
                false
            }
        }
    }
}
