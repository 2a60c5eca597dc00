pub mod input;
pub mod metric;
pub mod status;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// The two business areas the dashboard computes metrics for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Sales,
    Finance,
}

impl Domain {
    pub const ALL: [Domain; 2] = [Domain::Sales, Domain::Finance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Finance => "finance",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sales" => Ok(Self::Sales),
            "finance" => Ok(Self::Finance),
            other => Err(DomainError::UnknownDomain(other.to_string())),
        }
    }
}
