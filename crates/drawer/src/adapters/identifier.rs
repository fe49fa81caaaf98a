//! Namespaced resource identifiers (`namespace:path`).

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Namespace assumed when the text has no `:`.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("invalid character {found:?} in namespace {namespace:?}")]
    InvalidNamespace { namespace: String, found: char },

    #[error("invalid character {found:?} in path {path:?}")]
    InvalidPath { path: String, found: char },
}

/// A resource identifier such as `minecraft:carrot`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    namespace: String,
    path: String,
}

fn namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

fn path_char(c: char) -> bool {
    namespace_char(c) || c == '/'
}

impl Identifier {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, IdentifierError> {
        let namespace = namespace.into();
        let path = path.into();
        if let Some(found) = namespace.chars().find(|c| !namespace_char(*c)) {
            return Err(IdentifierError::InvalidNamespace { namespace, found });
        }
        if let Some(found) = path.chars().find(|c| !path_char(*c)) {
            return Err(IdentifierError::InvalidPath { path, found });
        }
        Ok(Self { namespace, path })
    }

    /// An identifier in [`DEFAULT_NAMESPACE`].
    pub fn of_default(path: impl Into<String>) -> Result<Self, IdentifierError> {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    /// Parses `namespace:path`, or a bare `path` in the default namespace.
    /// An empty namespace before the `:` also means the default one.
    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        match text.split_once(':') {
            Some(("", path)) => Self::of_default(path),
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::of_default(text),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdentifierVisitor;

        impl Visitor<'_> for IdentifierVisitor {
            type Value = Identifier;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a namespace:path identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Identifier, E> {
                Identifier::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(IdentifierVisitor)
    }
}
