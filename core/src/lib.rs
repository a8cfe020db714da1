//! Core of `MiniFrame`: the element builder, the state store and the hash
//! router with its render loop.
//!
//! The crate is backend-neutral. It talks to a document through the [`Dom`]
//! and [`Host`] traits; `miniframe-web` implements them over `web-sys` and
//! the `headless` feature provides an in-memory document.
//!
//! ```
//! # #[cfg(feature = "headless")] {
//! use miniframe_core::{AppConfig, Component, Props, Store, build, headless::HeadlessDom, init};
//!
//! let (dom, root) = HeadlessDom::with_mount_point("app");
//! let store = Store::new();
//! let builder = dom.clone();
//! init(
//!     dom.clone(),
//!     &store,
//!     AppConfig::new("#app").route("/", move || {
//!         Ok(Component::Node(build(&builder, "div", Props::new(), "hi")?))
//!     }),
//! )
//! .unwrap();
//! assert_eq!(dom.inner_html(&root), "<div>hi</div>");
//! # }
//! ```
#![allow(clippy::future_not_send)]

pub mod builder;
pub mod component;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
#[cfg(feature = "headless")]
pub mod headless;
pub mod hooks;
pub mod props;
pub mod render;
pub mod route;
pub mod store;

#[doc(inline)]
pub use builder::build;
pub use component::{Component, Resolver};
pub use config::{AppConfig, RenderOptions};
pub use dom::{Dom, Event, Host, Listener, ListenerId};
pub use error::{DomError, InitError, RenderError};
pub use props::{Child, Children, PropValue, Props, Style};
#[doc(inline)]
pub use render::{Phase, RenderLoop, init};
pub use route::{Route, RouteTable};
pub use store::{Partial, Reentrancy, State, Store, StoreOptions, Subscription};

pub mod prelude {
    //! Commonly used items in one import.
    pub use crate::{
        AppConfig, Child, Children, Component, Dom, Event, Host, Partial, Props, RenderError,
        Store, Style, build,
        events::{off, on},
        init,
    };
    pub use serde_json::{Value, json};
}
