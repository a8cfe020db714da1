//! Callbacks run around every render pass.

use core::fmt;
use std::rc::Rc;

use crate::error::RenderError;

/// Hooks registered through [`AppConfig`](crate::AppConfig).
///
/// `before_render` hooks run after a route was selected and before the root
/// is cleared, `after_render` hooks after the pass finished mounting (or
/// mounting its fallback). `on_error` hooks receive every failure, including
/// passes with no route.
#[derive(Clone, Default)]
pub struct Hooks {
    before: Vec<Rc<dyn Fn()>>,
    after: Vec<Rc<dyn Fn()>>,
    error: Vec<Rc<dyn Fn(&RenderError)>>,
}

impl Hooks {
    pub(crate) fn push_before(&mut self, hook: Rc<dyn Fn()>) {
        self.before.push(hook);
    }

    pub(crate) fn push_after(&mut self, hook: Rc<dyn Fn()>) {
        self.after.push(hook);
    }

    pub(crate) fn push_error(&mut self, hook: Rc<dyn Fn(&RenderError)>) {
        self.error.push(hook);
    }

    pub(crate) fn run_before(&self) {
        for hook in &self.before {
            hook();
        }
    }

    pub(crate) fn run_after(&self) {
        for hook in &self.after {
            hook();
        }
    }

    pub(crate) fn run_error(&self, error: &RenderError) {
        for hook in &self.error {
            hook(error);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_render", &self.before.len())
            .field("after_render", &self.after.len())
            .field("on_error", &self.error.len())
            .finish()
    }
}
