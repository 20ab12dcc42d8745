//! Execution Contexts
//!
//! A benchmark runs inside an isolated context opened by a
//! [`ContextLauncher`]. The orchestrator owns at most one context at a
//! time and closes it before asking for the next.
//!
//! [`InProcessLauncher`] hosts pages registered in this process and is
//! what tests and embedding binaries use.

use crate::page::BenchmarkPage;
use crate::signal::SignalSender;
use fxhash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::debug;

/// The context could not be created
#[derive(Debug, Clone, Error)]
#[error("Execution context for '{path}' was blocked")]
pub struct ContextBlocked {
    /// Identifying path that was requested
    pub path: String,
}

/// Space available for placing a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenArea {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Available width
    pub width: i32,
    /// Available height
    pub height: i32,
}

impl Default for ScreenArea {
    fn default() -> Self {
        Self {
            left: 0,
            top: 0,
            width: 1920,
            height: 1080,
        }
    }
}

/// Placement of a context's viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Viewport width
    pub width: u32,
    /// Viewport height
    pub height: u32,
}

impl WindowGeometry {
    /// Viewport with its bottom-right corner on the screen's bottom-right.
    ///
    /// Overshooting a small screen is allowed; the platform moves the
    /// window back on screen.
    pub fn bottom_right(screen: ScreenArea, width: u32, height: u32) -> Self {
        Self {
            left: screen.left + screen.width - width as i32,
            top: screen.top + screen.height - height as i32,
            width,
            height,
        }
    }
}

/// What the orchestrator asks a launcher to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRequest {
    /// Benchmark id
    pub benchmark_id: String,
    /// Identifying path of the benchmark page
    pub path: String,
    /// Path with the query marker appended
    pub url: String,
    /// Where to put the viewport
    pub geometry: WindowGeometry,
}

impl ContextRequest {
    /// Build a request for `path`, appending `?<marker>`
    pub fn new(benchmark_id: &str, path: &str, marker: &str, geometry: WindowGeometry) -> Self {
        Self {
            benchmark_id: benchmark_id.to_string(),
            path: path.to_string(),
            url: format!("{path}?{marker}"),
            geometry,
        }
    }
}

/// A live isolated context hosting one benchmark page
pub trait ExecutionContext {
    /// The page's hooks
    fn page(&mut self) -> &mut BenchmarkPage;

    /// Whether the context is still usable
    fn is_open(&self) -> bool {
        true
    }

    /// Release the context
    fn close(&mut self);
}

/// Opens isolated execution contexts
pub trait ContextLauncher {
    /// Screen space a context may occupy
    fn screen(&self) -> ScreenArea {
        ScreenArea::default()
    }

    /// Open a context for `request`.
    ///
    /// The context reports through `signals`: `loaded()` once its hooks can
    /// be called, `abort()` if the benchmark fails on its own.
    fn open(
        &mut self,
        request: &ContextRequest,
        signals: SignalSender,
    ) -> Result<Box<dyn ExecutionContext>, ContextBlocked>;
}

type PageFactory = Box<dyn Fn() -> BenchmarkPage>;

/// Counters shared between an [`InProcessLauncher`] and its contexts
#[derive(Debug, Clone, Default)]
pub struct ContextStats {
    opened: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl ContextStats {
    /// Contexts opened so far
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Contexts currently open
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Most contexts ever open at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn on_open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(live, Ordering::SeqCst);
    }

    fn on_close(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Launcher hosting pages built in this process.
///
/// A path with no registered page counts as blocked.
#[derive(Default)]
pub struct InProcessLauncher {
    pages: FxHashMap<String, PageFactory>,
    stalled: FxHashSet<String>,
    screen: ScreenArea,
    stats: ContextStats,
}

impl InProcessLauncher {
    /// Launcher with no pages
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the page served at `path`
    pub fn register(&mut self, path: impl Into<String>, factory: impl Fn() -> BenchmarkPage + 'static) {
        self.pages.insert(path.into(), Box::new(factory));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_page(
        mut self,
        path: impl Into<String>,
        factory: impl Fn() -> BenchmarkPage + 'static,
    ) -> Self {
        self.register(path, factory);
        self
    }

    /// Serve `path` from a context that never reports "loaded"
    pub fn with_stalled_page(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.stalled.insert(path.clone());
        self.register(path, BenchmarkPage::new);
        self
    }

    /// Screen area reported to the orchestrator
    pub fn with_screen(mut self, screen: ScreenArea) -> Self {
        self.screen = screen;
        self
    }

    /// Shared open/close counters
    pub fn stats(&self) -> ContextStats {
        self.stats.clone()
    }
}

impl ContextLauncher for InProcessLauncher {
    fn screen(&self) -> ScreenArea {
        self.screen
    }

    fn open(
        &mut self,
        request: &ContextRequest,
        signals: SignalSender,
    ) -> Result<Box<dyn ExecutionContext>, ContextBlocked> {
        let factory = self.pages.get(&request.path).ok_or_else(|| ContextBlocked {
            path: request.path.clone(),
        })?;

        debug!("opening in-process context for {}", request.url);
        let context = InProcessContext {
            page: factory(),
            stats: self.stats.clone(),
            closed: false,
        };
        self.stats.on_open();

        if !self.stalled.contains(&request.path) {
            signals.loaded();
        }
        Ok(Box::new(context))
    }
}

struct InProcessContext {
    page: BenchmarkPage,
    stats: ContextStats,
    closed: bool,
}

impl ExecutionContext for InProcessContext {
    fn page(&mut self) -> &mut BenchmarkPage {
        &mut self.page
    }

    fn is_open(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.stats.on_close();
        }
    }
}

impl Drop for InProcessContext {
    fn drop(&mut self) {
        self.close();
    }
}
