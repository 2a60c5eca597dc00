//! Raw, user-supplied field values for one domain.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ApplicationError;
use crate::numeric::number_or_zero;

/// Field name to raw text value, exactly as typed into the form.
///
/// Nothing is validated on insert. Numeric coercion happens when a calculator
/// reads a field through [`InputRecord::number`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InputRecord {
    fields: BTreeMap<String, String>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
        Self { fields }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ApplicationError> {
        serde_json::from_str(raw)
            .map_err(|error| ApplicationError::Input(format!("invalid JSON input record: {error}")))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ApplicationError> {
        toml::from_str(raw)
            .map_err(|error| ApplicationError::Input(format!("invalid TOML input record: {error}")))
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Numeric value of a field; absent or unparseable fields read as `0.0`.
    pub fn number(&self, key: &str) -> f64 {
        self.get(key).map(number_or_zero).unwrap_or(0.0)
    }

    /// Copies every field of `other` over this record.
    pub fn merge(&mut self, other: InputRecord) {
        self.fields.extend(other.fields);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for InputRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let scalars = BTreeMap::<String, RawScalar>::deserialize(deserializer)?;
        let fields =
            scalars.into_iter().map(|(key, scalar)| (key, scalar.into_text())).collect();
        Ok(Self { fields })
    }
}

/// Scalar shapes accepted in input files; all are kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Empty(()),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => crate::numeric::plain(value),
            Self::Flag(value) => value.to_string(),
            Self::Empty(()) => String::new(),
        }
    }
}
