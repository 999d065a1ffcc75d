use serde::{Deserialize, Serialize};
use std::fmt;

const TAX_ID_DIGITS: usize = 11;

/// An 11-digit CPF, kept as bare digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Drops every non-digit and accepts the rest only when exactly 11 digits remain.
    pub fn parse(input: &str) -> Option<Self> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        (digits.len() == TAX_ID_DIGITS).then_some(Self(digits))
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    // DDD.DDD.DDD-DD
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

/// First and last name at least.
pub fn is_full_name(input: &str) -> bool {
    input.split_whitespace().count() >= 2
}

pub fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}
