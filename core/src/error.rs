//! Error types shared by the builder, the router and the backends.

use thiserror::Error;

/// Failure raised by a DOM backend.
///
/// The builder never pre-validates its input, so these errors are whatever the
/// underlying document reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// A tag or attribute name contains characters the document rejects.
    #[error("invalid character in name `{0}`")]
    InvalidCharacter(String),
    /// A selector could not be parsed.
    #[error("`{0}` is not a valid selector")]
    Syntax(String),
    /// The operation would produce an impossible tree (e.g. a node inside itself).
    #[error("hierarchy request error: {0}")]
    Hierarchy(String),
    /// Error reported by a JavaScript host.
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Fatal error raised by [`init`](crate::init).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    /// The configured root selector matched no element.
    #[error("root element `{0}` not found")]
    RootNotFound(String),
    /// The document rejected the root lookup.
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Failure of a single render pass.
///
/// These never escape the render loop: they are logged, handed to the error
/// hooks and masked behind the fallback message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The route table is empty, so nothing can be rendered.
    #[error("no route found for path `{path}`")]
    NoRoute {
        /// Path taken from the hash fragment.
        path: String,
    },
    /// A DOM operation failed while mounting.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// A component resolver reported a failure.
    #[error("component failed: {0}")]
    Component(String),
    /// A deferred component was dropped before it settled.
    #[error("deferred component was cancelled")]
    Cancelled,
}

impl RenderError {
    /// Creates a [`RenderError::Component`] from any displayable message.
    pub fn component(message: impl core::fmt::Display) -> Self {
        Self::Component(message.to_string())
    }
}

impl From<futures::channel::oneshot::Canceled> for RenderError {
    fn from(_: futures::channel::oneshot::Canceled) -> Self {
        Self::Cancelled
    }
}
