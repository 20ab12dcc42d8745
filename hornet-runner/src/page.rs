//! Benchmark Page
//!
//! The hooks a benchmark exposes inside its execution context. Every hook
//! is optional; the suite adapter checks presence before calling.

use crate::signal::Deferred;
use serde_json::Value;
use std::fmt;

type ArgHook = Box<dyn FnMut(&Value)>;
type AsyncHook = Box<dyn FnMut(Deferred, &Value)>;
type PlainHook = Box<dyn FnMut()>;

/// Hooks of one loaded benchmark
#[derive(Default)]
pub struct BenchmarkPage {
    set_up: Option<ArgHook>,
    test: Option<ArgHook>,
    test_async: Option<AsyncHook>,
    tear_down: Option<ArgHook>,
    reset_math_random: Option<PlainHook>,
}

impl BenchmarkPage {
    /// Page with no hooks
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the run argument before each timed invocation
    pub fn with_set_up(mut self, hook: impl FnMut(&Value) + 'static) -> Self {
        self.set_up = Some(Box::new(hook));
        self
    }

    /// Synchronous timed body
    pub fn with_test(mut self, hook: impl FnMut(&Value) + 'static) -> Self {
        self.test = Some(Box::new(hook));
        self
    }

    /// Deferred timed body; must resolve the handle exactly once
    pub fn with_test_async(mut self, hook: impl FnMut(Deferred, &Value) + 'static) -> Self {
        self.test_async = Some(Box::new(hook));
        self
    }

    /// Called with the run argument after each timed invocation
    pub fn with_tear_down(mut self, hook: impl FnMut(&Value) + 'static) -> Self {
        self.tear_down = Some(Box::new(hook));
        self
    }

    /// Reseeds the page's random source; called right after `set_up`
    pub fn with_reset_math_random(mut self, hook: impl FnMut() + 'static) -> Self {
        self.reset_math_random = Some(Box::new(hook));
        self
    }

    /// Whether a synchronous test is defined
    pub fn has_test(&self) -> bool {
        self.test.is_some()
    }

    /// Whether a deferred test is defined
    pub fn has_test_async(&self) -> bool {
        self.test_async.is_some()
    }

    /// Call `set_up` if present
    pub fn call_set_up(&mut self, argument: &Value) {
        if let Some(hook) = self.set_up.as_mut() {
            hook(argument);
        }
    }

    /// Call `reset_math_random` if present
    pub fn call_reset_math_random(&mut self) {
        if let Some(hook) = self.reset_math_random.as_mut() {
            hook();
        }
    }

    /// Call `test`. Returns `false` if the page has none.
    pub fn call_test(&mut self, argument: &Value) -> bool {
        match self.test.as_mut() {
            Some(hook) => {
                hook(argument);
                true
            }
            None => false,
        }
    }

    /// Call `test_async`. Returns the unused handle if the page has none.
    pub fn call_test_async(&mut self, deferred: Deferred, argument: &Value) -> Option<Deferred> {
        match self.test_async.as_mut() {
            Some(hook) => {
                hook(deferred, argument);
                None
            }
            None => Some(deferred),
        }
    }

    /// Call `tear_down` if present
    pub fn call_tear_down(&mut self, argument: &Value) {
        if let Some(hook) = self.tear_down.as_mut() {
            hook(argument);
        }
    }
}

impl fmt::Debug for BenchmarkPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkPage")
            .field("set_up", &self.set_up.is_some())
            .field("test", &self.test.is_some())
            .field("test_async", &self.test_async.is_some())
            .field("tear_down", &self.tear_down.is_some())
            .field("reset_math_random", &self.reset_math_random.is_some())
            .finish()
    }
}
