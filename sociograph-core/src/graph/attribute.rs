//! Node identifiers, attribute values, and edge signs.

use std::{borrow::Borrow, fmt, sync::Arc};

use crate::error::GraphError;

/// Stable string identifier of a node.
///
/// Identifiers order lexicographically, so `"10"` sorts before `"2"`.
///
/// # Examples
/// ```
/// use sociograph_core::NodeId;
///
/// let id = NodeId::from("alice");
/// assert_eq!(id.as_str(), "alice");
/// assert!(NodeId::from("10") < NodeId::from("2"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Returns the identifier as a string slice.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&NodeId> for NodeId {
    fn from(value: &NodeId) -> Self {
        value.clone()
    }
}

/// Scalar value stored under a node attribute key.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// Signed integer value, e.g. a community number.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Free-form text, e.g. a group label or colour name.
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Sign carried by an edge of a signed graph.
///
/// Edges without an explicit sign behave as [`Sign::Positive`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Friendly relation, `+1`.
    #[default]
    Positive,
    /// Hostile relation, `-1`.
    Negative,
}

impl Sign {
    /// Returns the numeric value of the sign (`1` or `-1`).
    #[must_use]
    pub const fn value(self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    /// Returns `true` for [`Sign::Negative`].
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Negative)
    }
}

impl TryFrom<i64> for Sign {
    type Error = GraphError;

    /// Converts the loader representation `+1` / `-1` into a [`Sign`].
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Positive),
            -1 => Ok(Self::Negative),
            other => Err(GraphError::invalid(
                "sign",
                format!("edge sign must be +1 or -1 (got {other})"),
            )),
        }
    }
}
