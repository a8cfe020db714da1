#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::future_not_send)]

pub mod logging;

#[doc(inline)]
pub use miniframe_core::{
    AppConfig, Child, Children, Component, Dom, DomError, Event, Host, InitError, Listener,
    ListenerId, Partial, Phase, PropValue, Props, Reentrancy, RenderError, RenderLoop,
    RenderOptions, Resolver, Route, RouteTable, State, Store, StoreOptions, Style, Subscription,
    build, builder, component, config, dom, error, events, hooks, init, props, render, route,
    store,
};

#[cfg(feature = "headless")]
pub use miniframe_core::headless;

/// Browser backend.
#[cfg(feature = "web")]
pub use miniframe_web as web;

/// The logging facade used throughout `MiniFrame`.
pub use tracing as log;

pub mod prelude {
    //! A collection of commonly used items for easy importing.
    //!
    //! ```
    //! use miniframe::prelude::*;
    //!
    //! let store = Store::new();
    //! store.set_state(json!({ "count": 1 }));
    //! assert_eq!(store.get("count"), Some(json!(1)));
    //! ```
    pub use miniframe_core::prelude::*;

    #[cfg(feature = "web")]
    pub use miniframe_web::{Node, WebApp, WebDom};
}
