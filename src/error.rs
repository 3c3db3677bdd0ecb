//! Error types shared by the content model, the declaration graph and the
//! signature renderers.

use crate::model::NodeKind;
use thiserror::Error;

/// Structural misuse of the content tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("cannot append a child to leaf content node `{0}`")]
    LeafNode(&'static str),
}

/// Failures navigating or loading the declaration graph.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{kind} `{name}` has no {wanted} detail")]
    MissingDetail {
        kind: NodeKind,
        name: String,
        wanted: NodeKind,
    },

    #[error("{kind} `{name}` has no owner")]
    MissingOwner { kind: NodeKind, name: String },

    #[error("invalid declaration input: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while projecting a declaration into a signature.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The upstream extractor handed a node to a branch that cannot render it.
    #[error("unsupported declaration shape: {kind} `{name}` is not {expected}")]
    UnsupportedShape {
        kind: NodeKind,
        name: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Failures while writing a page in an output format.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to serialize page: {0}")]
    Json(#[from] serde_json::Error),
}
