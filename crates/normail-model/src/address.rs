#![deny(unsafe_code)]

//! Parsed email address value.
//!
//! An [`Address`] is a `(local, domain)` pair split on the single `@`
//! separator. Parsing performs no validation beyond the separator count:
//! empty parts are accepted, and any other count leaves the input unparsed
//! so callers can hand it back verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AddressError;

/// Separator between the local part and the domain part.
pub const SEPARATOR: char = '@';

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// Everything before the separator.
    pub local: String,
    /// Everything after the separator.
    pub domain: String,
}

impl Address {
    pub fn new(local: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            domain: domain.into(),
        }
    }

    /// Split `raw` on the separator.
    ///
    /// Returns `None` unless the separator occurs exactly once.
    pub fn parse(raw: &str) -> Option<Self> {
        let (local, domain) = raw.split_once(SEPARATOR)?;
        if domain.contains(SEPARATOR) {
            return None;
        }
        Some(Self::new(local, domain))
    }

    /// Join the parts back together as `local@domain`.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.local.len() + 1 + self.domain.len());
        out.push_str(&self.local);
        out.push(SEPARATOR);
        out.push_str(&self.domain);
        out
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AddressError::SeparatorCount {
            count: s.matches(SEPARATOR).count(),
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.local, self.domain)
    }
}
