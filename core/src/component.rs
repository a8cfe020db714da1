//! Component shapes and their bounded resolution.

use core::{fmt, future::Future};
use std::rc::Rc;

use futures::{FutureExt, future::LocalBoxFuture};

use crate::error::RenderError;

/// Produces a component. Invoked fresh on every render pass.
pub type Resolver<N> = Rc<dyn Fn() -> Result<Component<N>, RenderError>>;

/// Number of callables unwrapped by [`resolve`]: the route's resolver and at
/// most one nested callable.
pub const MAX_INVOCATIONS: usize = 2;

/// What a resolver hands back.
pub enum Component<N> {
    /// A finished node, mounted as-is.
    Node(N),
    /// A nullary callable still to be invoked.
    Render(Resolver<N>),
    /// A value that settles later.
    Deferred(LocalBoxFuture<'static, Result<Component<N>, RenderError>>),
    /// Nothing to mount.
    Empty,
}

impl<N> Component<N> {
    /// Wraps a callable.
    pub fn render(f: impl Fn() -> Result<Self, RenderError> + 'static) -> Self {
        Self::Render(Rc::new(f))
    }

    /// Wraps a future settling to another component.
    pub fn deferred(future: impl Future<Output = Result<Self, RenderError>> + 'static) -> Self {
        Self::Deferred(future.boxed_local())
    }
}

impl<N> From<Option<N>> for Component<N> {
    fn from(value: Option<N>) -> Self {
        value.map_or(Self::Empty, Self::Node)
    }
}

impl<N: fmt::Debug> fmt::Debug for Component<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Render(_) => f.write_str("Render(..)"),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// Resolves `resolver` down to a node.
///
/// The resolver is invoked once; a [`Component::Render`] result is invoked
/// once more. Deferred values are awaited at either level and do not count as
/// an invocation. A callable left after [`MAX_INVOCATIONS`] is not invoked and
/// resolves to `None`, as does [`Component::Empty`].
///
/// # Errors
///
/// Returns the first error produced by a callable or a deferred value.
pub async fn resolve<N>(resolver: &Resolver<N>) -> Result<Option<N>, RenderError> {
    let mut current = resolver()?;
    let mut invocations = 1;
    loop {
        current = match current {
            Component::Node(node) => return Ok(Some(node)),
            Component::Empty => return Ok(None),
            Component::Deferred(future) => future.await?,
            Component::Render(next) if invocations < MAX_INVOCATIONS => {
                invocations += 1;
                next()?
            }
            Component::Render(_) => {
                tracing::debug!("component nested too deep, nothing mounted");
                return Ok(None);
            }
        };
    }
}
