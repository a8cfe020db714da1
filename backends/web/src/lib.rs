#![allow(clippy::module_name_repetitions)]
#![allow(clippy::future_not_send)]

//! Browser backend for `MiniFrame`.
//!
//! [`WebDom`] implements the core [`Dom`](miniframe_core::Dom) and
//! [`Host`](miniframe_core::Host) traits over `web-sys`, and [`WebApp`] wires
//! console logging, the panic hook and the render loop together.

mod app;
mod dom;
mod error;
mod listeners;
pub mod logging;

pub use app::{WebApp, WebAppBuilder};
pub use dom::WebDom;
pub use error::WebError;
pub use web_sys::Node;
