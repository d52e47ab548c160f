//! # DID Identifiers
//!
//! Parsing of `did:<method>:<subject>` strings.

use crate::domain::errors::IdentityError;
use std::fmt;
use std::str::FromStr;

/// The only DID method accepted by this application.
pub const SUPPORTED_METHOD: &str = "bryk";

/// A parsed decentralized identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Did {
    method: String,
    subject: String,
}

impl Did {
    /// Parse a DID string.
    ///
    /// The method must be lowercase alphanumeric and the subject a non-empty
    /// run of `[A-Za-z0-9._:%-]`. Fragments and paths are not accepted.
    pub fn parse(value: &str) -> Result<Self, IdentityError> {
        let rest = value
            .strip_prefix("did:")
            .ok_or_else(|| IdentityError::InvalidDid(format!("missing 'did:' prefix: {value}")))?;

        let (method, subject) = rest
            .split_once(':')
            .ok_or_else(|| IdentityError::InvalidDid(format!("missing method-specific id: {value}")))?;

        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(IdentityError::InvalidDid(format!("invalid method name: {method:?}")));
        }

        if subject.is_empty() || !subject.chars().all(is_subject_char) {
            return Err(IdentityError::InvalidDid(format!("invalid subject: {subject:?}")));
        }

        Ok(Self {
            method: method.to_string(),
            subject: subject.to_string(),
        })
    }

    /// DID method name (e.g. `bryk`).
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Method-specific identifier.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Id of a key in this DID's document, e.g. `did:bryk:abc#master`.
    pub fn key_id(&self, fragment: &str) -> String {
        format!("{self}#{fragment}")
    }
}

fn is_subject_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '%' | '-')
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "did:{}:{}", self.method, self.subject)
    }
}

impl FromStr for Did {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
