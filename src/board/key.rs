//! Storage key a board's task list lives under

use std::fmt;

const DATA_KEY: &str = "taskflow-data";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Key used while no client identity is known.
    pub fn anonymous() -> Self {
        Self(DATA_KEY.to_string())
    }

    /// `taskflow-data-<identity>`, or the anonymous key for a missing or
    /// blank identity.
    pub fn for_identity(identity: Option<&str>) -> Self {
        match identity.map(str::trim) {
            Some(id) if !id.is_empty() => Self(format!("{}-{}", DATA_KEY, id)),
            _ => Self::anonymous(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == DATA_KEY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
