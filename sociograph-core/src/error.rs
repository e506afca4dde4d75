//! Error types for the sociograph core library.
//!
//! Only genuinely invalid requests are errors. Graph states that make an
//! analysis inapplicable (a disconnected graph, no signed edges, no
//! categorical attribute) are reported through typed result enums instead.

use std::{convert::Infallible, fmt};

use thiserror::Error;

use crate::graph::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Errors produced by graph construction and analysis.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// A caller-supplied parameter was outside its valid domain.
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human-readable explanation of the constraint that was violated.
        reason: String,
    },
    /// A node identifier did not name a node of the graph.
    #[error("node `{node}` is not present in the graph")]
    UnknownNode {
        /// The identifier that could not be resolved.
        node: NodeId,
    },
    /// An edge would have joined a node to itself.
    #[error("self-loop on node `{node}` is not allowed in a simple graph")]
    SelfLoop {
        /// The node both endpoints referred to.
        node: NodeId,
    },
    /// The operation observed a cancelled [`crate::CancellationToken`].
    #[error("operation was cancelled")]
    Cancelled,
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A caller-supplied parameter was outside its valid domain.
        InvalidParameter => InvalidParameter { .. } => "GRAPH_INVALID_PARAMETER",
        /// A node identifier did not name a node of the graph.
        UnknownNode => UnknownNode { .. } => "GRAPH_UNKNOWN_NODE",
        /// An edge would have joined a node to itself.
        SelfLoop => SelfLoop { .. } => "GRAPH_SELF_LOOP",
        /// The operation observed a cancelled token.
        Cancelled => Cancelled => "GRAPH_CANCELLED",
    }
}

impl GraphError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

impl From<Infallible> for GraphError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphError>;
