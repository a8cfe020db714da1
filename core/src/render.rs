//! The render loop.
//!
//! [`init`] finds the root element, wires the two triggers (hash change and
//! store notification) and runs the first pass. Every pass:
//!
//! 1. reads the hash and selects a route (`Resolving`),
//! 2. runs the `before_render` hooks and clears the root (`Rendering`),
//! 3. resolves the component, suspending on deferred values,
//! 4. mounts the resulting node as the only child of the root, or the
//!    fallback text on failure (`Error`),
//! 5. runs the `after_render` hooks and goes back to `Idle`.
//!
//! Passes are never cancelled. A pass is polled once inline; if it suspends
//! it is handed to [`Host::spawn_local`] and overlapping passes race for the
//! root.

use core::{
    cell::{Cell, RefCell},
    fmt,
    task::Context,
};
use std::rc::Rc;

use futures::{FutureExt, task::noop_waker_ref};
use tracing::{debug, error, info, trace, warn};

use crate::{
    component::resolve,
    config::{AppConfig, RenderOptions},
    dom::Host,
    error::{InitError, RenderError},
    hooks::Hooks,
    route::{RouteTable, hash_path},
    store::Store,
};

/// Where the render loop currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for a trigger.
    #[default]
    Idle,
    /// Selecting a route.
    Resolving,
    /// Clearing the root and resolving the component.
    Rendering,
    /// A pass failed and the fallback is being mounted.
    Error,
}

struct LoopInner<H: Host> {
    host: H,
    root: H::Node,
    routes: RouteTable<H::Node>,
    hooks: Hooks,
    options: RenderOptions,
    phase: Cell<Phase>,
    in_flight: Cell<usize>,
    generation: Cell<u64>,
    completed: Cell<u64>,
    last_error: RefCell<Option<RenderError>>,
}

impl<H: Host> LoopInner<H> {
    fn render(this: &Rc<Self>) {
        let generation = this.generation.get() + 1;
        this.generation.set(generation);
        this.in_flight.set(this.in_flight.get() + 1);
        this.phase.set(Phase::Resolving);

        let path = hash_path(&this.host.location_hash());
        debug!(%path, generation, "render pass started");

        let Some(route) = this.routes.resolve(&path) else {
            let error = RenderError::NoRoute { path };
            error!(%error, generation, "render pass skipped");
            this.report(error);
            this.settle();
            return;
        };
        trace!(route = %route.path, "route selected");
        let resolver = Rc::clone(&route.component);

        this.hooks.run_before();
        this.phase.set(Phase::Rendering);
        if let Err(error) = this.host.clear_children(&this.root) {
            this.finish(generation, Err(error.into()));
            return;
        }

        let pass = Rc::clone(this);
        let mut task = async move {
            let result = resolve(&resolver).await;
            pass.finish(generation, result);
        }
        .boxed_local();

        let mut cx = Context::from_waker(noop_waker_ref());
        if task.poll_unpin(&mut cx).is_pending() {
            debug!(generation, "render pass suspended");
            this.host.spawn_local(task);
        }
    }

    fn finish(&self, generation: u64, result: Result<Option<H::Node>, RenderError>) {
        let latest = self.generation.get();
        if self.options.discard_stale && generation != latest {
            warn!(generation, latest, "discarding stale render pass");
            self.settle();
            return;
        }

        match result.and_then(|node| self.mount(node.as_ref())) {
            Ok(()) => debug!(generation, "render pass mounted"),
            Err(error) => self.fail(generation, error),
        }
        self.completed.set(self.completed.get() + 1);
        self.hooks.run_after();
        self.settle();
    }

    /// Ends one pass. The loop is idle only once no other pass is suspended.
    fn settle(&self) {
        let remaining = self.in_flight.get().saturating_sub(1);
        self.in_flight.set(remaining);
        self.phase.set(if remaining == 0 {
            Phase::Idle
        } else {
            Phase::Rendering
        });
    }

    fn mount(&self, node: Option<&H::Node>) -> Result<(), RenderError> {
        self.host.clear_children(&self.root)?;
        match node {
            Some(node) => self.host.append_child(&self.root, node)?,
            None => trace!("component produced nothing to mount"),
        }
        Ok(())
    }

    fn fail(&self, generation: u64, error: RenderError) {
        self.phase.set(Phase::Error);
        error!(%error, generation, "render pass failed");
        self.host
            .set_text_content(&self.root, &self.options.fallback_message);
        self.report(error);
    }

    fn report(&self, error: RenderError) {
        self.hooks.run_error(&error);
        self.last_error.replace(Some(error));
    }
}

/// Handle to a running render loop.
///
/// The loop stays wired to its triggers for as long as the host and store
/// live; dropping the handle does not stop it.
pub struct RenderLoop<H: Host> {
    inner: Rc<LoopInner<H>>,
}

impl<H: Host> Clone for RenderLoop<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host> fmt::Debug for RenderLoop<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderLoop")
            .field("root", &self.inner.root)
            .field("routes", &self.inner.routes)
            .field("phase", &self.inner.phase.get())
            .field("in_flight", &self.inner.in_flight.get())
            .field("generation", &self.inner.generation.get())
            .field("completed", &self.inner.completed.get())
            .finish_non_exhaustive()
    }
}

impl<H: Host> RenderLoop<H> {
    /// Runs one pass now, as a trigger would.
    pub fn render(&self) {
        LoopInner::render(&self.inner);
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    /// Number of passes started so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    /// Number of passes that reached the end of rendering, whether they
    /// mounted content or the fallback.
    #[must_use]
    pub fn pass_count(&self) -> u64 {
        self.inner.completed.get()
    }

    /// The most recent failure, if any pass failed.
    #[must_use]
    pub fn last_error(&self) -> Option<RenderError> {
        self.inner.last_error.borrow().clone()
    }

    /// The mount point.
    #[must_use]
    pub fn root(&self) -> &H::Node {
        &self.inner.root
    }

    /// The host the loop renders into.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// The options the loop was started with.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.inner.options
    }
}

/// Starts the render loop.
///
/// Looks up the root element, subscribes to `store` and to hash changes of
/// `host`, then runs the first pass before returning. A first pass that does
/// not suspend has already mounted its content when this returns.
///
/// # Errors
///
/// Fails with [`InitError::RootNotFound`] when the root selector matches no
/// element. Nothing is rendered or subscribed in that case.
pub fn init<H: Host>(
    host: H,
    store: &Store,
    config: AppConfig<H::Node>,
) -> Result<RenderLoop<H>, InitError> {
    let (selector, routes, hooks, options) = config.into_parts();
    let root = host
        .query_selector(&selector)?
        .ok_or_else(|| InitError::RootNotFound(selector.clone()))?;
    info!(root = %selector, routes = routes.len(), "starting render loop");
    if routes.is_empty() {
        warn!("route table is empty, nothing will render");
    }

    let inner = Rc::new(LoopInner {
        host,
        root,
        routes,
        hooks,
        options,
        phase: Cell::new(Phase::Idle),
        in_flight: Cell::new(0),
        generation: Cell::new(0),
        completed: Cell::new(0),
        last_error: RefCell::new(None),
    });

    let on_hash = Rc::clone(&inner);
    inner
        .host
        .on_hash_change(Rc::new(move || LoopInner::render(&on_hash)));
    let on_state = Rc::clone(&inner);
    store.subscribe(move |_| LoopInner::render(&on_state));

    LoopInner::render(&inner);
    Ok(RenderLoop { inner })
}

#[cfg(all(test, feature = "headless"))]
mod tests {
    use futures::channel::oneshot;

    use super::*;
    use crate::{
        builder::build,
        component::Component,
        dom::Dom,
        headless::{HeadlessDom, NodeId},
        props::Props,
    };

    fn app() -> (HeadlessDom, NodeId, Store) {
        let (dom, root) = HeadlessDom::with_mount_point("app");
        (dom, root, Store::new())
    }

    #[test]
    fn missing_root_is_fatal() {
        let dom = HeadlessDom::new();
        let store = Store::new();
        let error = init(dom, &store, AppConfig::new("#app")).unwrap_err();
        assert_eq!(error, InitError::RootNotFound("#app".into()));
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn first_pass_runs_synchronously() {
        let (dom, root, store) = app();
        let builder = dom.clone();
        let app = init(
            dom.clone(),
            &store,
            AppConfig::new("#app").route("/", move || {
                Ok(Component::Node(build(&builder, "div", Props::new(), "hi")?))
            }),
        )
        .unwrap();
        assert_eq!(dom.inner_html(&root), "<div>hi</div>");
        assert_eq!(app.phase(), Phase::Idle);
        assert_eq!(app.pass_count(), 1);
    }

    #[test]
    fn empty_table_leaves_root_untouched() {
        let (dom, root, store) = app();
        let existing = dom.create_text_node("keep");
        dom.append_child(&root, &existing).unwrap();
        let app = init(dom.clone(), &store, AppConfig::new("#app")).unwrap();
        assert_eq!(dom.inner_html(&root), "keep");
        assert_eq!(
            app.last_error(),
            Some(RenderError::NoRoute { path: "/".into() })
        );
        assert_eq!(app.generation(), 1);
        assert_eq!(app.pass_count(), 0);
    }

    #[test]
    fn failure_mounts_fallback_and_recovers() {
        let (dom, root, store) = app();
        let builder = dom.clone();
        let failing = Rc::new(Cell::new(true));
        let toggle = Rc::clone(&failing);
        let app = init(
            dom.clone(),
            &store,
            AppConfig::new("#app").route("/", move || {
                if toggle.get() {
                    return Err(RenderError::component("broken"));
                }
                Ok(Component::Node(build(&builder, "p", Props::new(), "ok")?))
            }),
        )
        .unwrap();
        assert_eq!(dom.inner_html(&root), "Error loading component");
        assert_eq!(app.phase(), Phase::Idle);

        failing.set(false);
        app.render();
        assert_eq!(dom.inner_html(&root), "<p>ok</p>");
    }

    #[test]
    fn dom_errors_while_building_are_render_failures() {
        let (dom, root, store) = app();
        let builder = dom.clone();
        let app = init(
            dom.clone(),
            &store,
            AppConfig::new("#app").route("/", move || {
                Ok(Component::Node(build(&builder, "bad tag", Props::new(), ())?))
            }),
        )
        .unwrap();
        assert_eq!(dom.text_content(&root), "Error loading component");
        assert!(matches!(app.last_error(), Some(RenderError::Dom(_))));
    }

    #[test]
    fn custom_fallback_message() {
        let (dom, root, store) = app();
        init(
            dom.clone(),
            &store,
            AppConfig::new("#app")
                .route("/", || Err(RenderError::component("x")))
                .options(RenderOptions {
                    fallback_message: "Oops".into(),
                    ..RenderOptions::default()
                }),
        )
        .unwrap();
        assert_eq!(dom.inner_html(&root), "Oops");
    }

    #[test]
    fn empty_component_clears_root() {
        let (dom, root, store) = app();
        let existing = dom.create_text_node("old");
        dom.append_child(&root, &existing).unwrap();
        init(
            dom.clone(),
            &store,
            AppConfig::new("#app").route("/", || Ok(Component::Empty)),
        )
        .unwrap();
        assert_eq!(dom.inner_html(&root), "");
    }

    #[test]
    fn hooks_run_in_order() {
        let (dom, _, store) = app();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (before, during, after) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
        init(
            dom,
            &store,
            AppConfig::new("#app")
                .before_render(move || before.borrow_mut().push("before"))
                .route("/", move || {
                    during.borrow_mut().push("resolve");
                    Ok(Component::Empty)
                })
                .after_render(move || after.borrow_mut().push("after")),
        )
        .unwrap();
        assert_eq!(*log.borrow(), ["before", "resolve", "after"]);
    }

    #[test]
    fn error_hooks_receive_failures() {
        let (dom, _, store) = app();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        init(
            dom,
            &store,
            AppConfig::new("#app")
                .route("/", || Err(RenderError::component("nope")))
                .on_error(move |error| sink.borrow_mut().push(error.clone())),
        )
        .unwrap();
        assert_eq!(*seen.borrow(), [RenderError::Component("nope".into())]);
    }

    #[test]
    fn suspended_pass_finishes_on_the_executor() {
        let (dom, root, store) = app();
        let (sender, receiver) = oneshot::channel();
        let receiver = RefCell::new(Some(receiver));
        let app = init(
            dom.clone(),
            &store,
            AppConfig::new("#app").route("/", move || {
                let receiver = receiver.borrow_mut().take();
                Ok(Component::deferred(async move {
                    match receiver {
                        Some(receiver) => Ok(receiver.await?),
                        None => Ok(Component::Empty),
                    }
                }))
            }),
        )
        .unwrap();
        assert_eq!(app.phase(), Phase::Rendering);
        assert_eq!(app.pass_count(), 0);

        let node = dom.create_text_node("loaded");
        sender.send(Component::Node(node)).unwrap();
        dom.run_until_stalled();
        assert_eq!(dom.inner_html(&root), "loaded");
        assert_eq!(app.phase(), Phase::Idle);
    }

    #[test]
    fn phase_stays_rendering_while_an_older_pass_is_suspended() {
        let (dom, root, store) = app();
        let (sender, receiver) = oneshot::channel::<Component<NodeId>>();
        let receiver = RefCell::new(Some(receiver));
        let builder = dom.clone();
        let app = init(
            dom.clone(),
            &store,
            AppConfig::new("#app")
                .route("/", move || {
                    let receiver = receiver.borrow_mut().take();
                    Ok(Component::deferred(async move {
                        match receiver {
                            Some(receiver) => Ok(receiver.await?),
                            None => Ok(Component::Empty),
                        }
                    }))
                })
                .route("/b", move || {
                    Ok(Component::Node(build(&builder, "p", Props::new(), "b")?))
                }),
        )
        .unwrap();

        dom.set_hash("#/b");
        assert_eq!(dom.inner_html(&root), "<p>b</p>");
        assert_eq!(app.phase(), Phase::Rendering);

        sender.send(Component::Node(dom.create_text_node("a"))).unwrap();
        dom.run_until_stalled();
        assert_eq!(app.phase(), Phase::Idle);
        assert_eq!(dom.inner_html(&root), "a");
    }

    #[test]
    fn stale_passes_can_be_discarded() {
        let (dom, root, store) = app();
        let (sender, receiver) = oneshot::channel::<Component<NodeId>>();
        let receiver = RefCell::new(Some(receiver));
        let builder = dom.clone();
        let app = init(
            dom.clone(),
            &store,
            AppConfig::new("#app")
                .route("/", move || {
                    let receiver = receiver.borrow_mut().take();
                    Ok(Component::deferred(async move {
                        match receiver {
                            Some(receiver) => Ok(receiver.await?),
                            None => Ok(Component::Empty),
                        }
                    }))
                })
                .route("/other", move || {
                    Ok(Component::Node(build(&builder, "b", Props::new(), "other")?))
                })
                .options(RenderOptions {
                    discard_stale: true,
                    ..RenderOptions::default()
                }),
        )
        .unwrap();

        dom.set_hash("#/other");
        assert_eq!(dom.inner_html(&root), "<b>other</b>");

        sender.send(Component::Node(dom.create_text_node("slow"))).unwrap();
        dom.run_until_stalled();
        assert_eq!(dom.inner_html(&root), "<b>other</b>");
        assert_eq!(app.generation(), 2);
        assert_eq!(app.pass_count(), 1);
    }
}
