use miniframe_core::{AppConfig, RenderLoop, Store, init};
use tracing::info;
use web_sys::Node;

use crate::{dom::WebDom, error::WebError, logging};

/// Builder for [`WebApp`].
#[derive(Debug, Clone)]
pub struct WebAppBuilder {
    log_level: Option<String>,
    panic_hook: bool,
}

impl Default for WebAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAppBuilder {
    /// Creates a new builder with default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            log_level: None,
            panic_hook: true,
        }
    }

    /// Sets the console log level (`"error"` through `"trace"`).
    #[must_use]
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Controls whether panics are reported to the console.
    #[must_use]
    pub const fn panic_hook(mut self, install: bool) -> Self {
        self.panic_hook = install;
        self
    }

    /// Installs logging, binds to the page and starts the render loop.
    ///
    /// # Errors
    ///
    /// Returns an error outside of a browser or when the root element is
    /// missing.
    pub fn mount(self, store: &Store, config: AppConfig<Node>) -> Result<WebApp, WebError> {
        if self.panic_hook {
            console_error_panic_hook::set_once();
        }
        match self.log_level.as_deref() {
            Some(level) => logging::init_with(level),
            None => logging::init(),
        }

        let dom = WebDom::new()?;
        let render_loop = init(dom.clone(), store, config)?;
        info!("mounted");
        Ok(WebApp { dom, render_loop })
    }
}

/// A `MiniFrame` application running in the browser.
#[derive(Debug, Clone)]
pub struct WebApp {
    dom: WebDom,
    render_loop: RenderLoop<WebDom>,
}

impl WebApp {
    /// Mounts with the default configuration.
    ///
    /// ```no_run
    /// use miniframe_core::{AppConfig, Component, Props, Store, build};
    /// use miniframe_web::{WebApp, WebDom};
    ///
    /// let store = Store::new();
    /// let dom = WebDom::new().unwrap();
    /// WebApp::mount(
    ///     &store,
    ///     AppConfig::new("#app").route("/", move || {
    ///         Ok(Component::Node(build(&dom, "h1", Props::new(), "Hello")?))
    ///     }),
    /// )
    /// .unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// See [`WebAppBuilder::mount`].
    pub fn mount(store: &Store, config: AppConfig<Node>) -> Result<Self, WebError> {
        WebAppBuilder::new().mount(store, config)
    }

    /// Returns a builder for custom setups.
    #[must_use]
    pub const fn builder() -> WebAppBuilder {
        WebAppBuilder::new()
    }

    /// The browser document.
    #[must_use]
    pub const fn dom(&self) -> &WebDom {
        &self.dom
    }

    /// The running render loop.
    #[must_use]
    pub const fn render_loop(&self) -> &RenderLoop<WebDom> {
        &self.render_loop
    }
}
