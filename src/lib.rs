//! # page_saver
//!
//! Captures a rendered page -- computed styles and raster images included --
//! as a single self-contained HTML file and persists it locally.
//!
//! ## Overview
//!
//! A trigger hands the live page ([`PageSource`]) to a background worker.
//! The worker takes a detached [`DocumentSnapshot`], aggregates every
//! applicable CSS rule into one `<style>` element (re-fetching sheets whose
//! rules are access-blocked), replaces every image source with an embedded
//! `data:` URL, and dispatches the percent-encoded result with a sanitized
//! filename to a [`Dispatcher`] (local filesystem by default, or your own
//! implementation).
//!
//! Resource failures degrade gracefully: a stylesheet or image that cannot
//! be fetched is skipped or left referencing its original address, and never
//! aborts the save.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use page_saver::{PageSaverBuilder, FsDispatcher, PageSource, StyleSheetRef};
//!
//! # async fn example() {
//! let handle = PageSaverBuilder::new(FsDispatcher::new("/tmp/saves")).build();
//!
//! let page = PageSource::new(
//!     "https://example.com/article",
//!     "My Article",
//!     "<html><head><title>My Article</title></head><body>...</body></html>",
//! )
//! .with_stylesheet(StyleSheetRef::blocked("https://cdn.example.com/site.css"));
//!
//! let outcome = handle.trigger(page).await;
//! println!("{outcome:?}");
//!
//! // On shutdown, drain in-flight saves:
//! handle.shutdown().await;
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fetch;
pub mod filename;
pub mod handle;
pub mod images;
pub mod page;
pub mod snapshot;
pub mod styles;
mod worker;

pub use capture::capture;
pub use config::PageSaverBuilder;
pub use dispatcher::{Dispatcher, FsDispatcher, SaveRequest, unique_filename};
pub use error::{PageSaverError, Result};
pub use fetch::{FetchConfig, FetchedResource, Fetcher, HttpFetcher};
pub use filename::sanitize_filename;
pub use handle::{PageSaverHandle, PageSaverSender, SaveOutcome};
pub use images::inline_images;
pub use page::{PageSource, StyleSheetRef};
pub use snapshot::DocumentSnapshot;
pub use styles::collect_styles;

use std::sync::OnceLock;

// Global state for the optional singleton pattern
static GLOBAL: OnceLock<PageSaverSender> = OnceLock::new();

/// Initialize the global [`PageSaverSender`] singleton.
///
/// Call once at application startup. The returned [`PageSaverHandle`] must
/// be kept alive for the lifetime of the application and
/// [`PageSaverHandle::shutdown`] should be called before exit to drain
/// in-flight saves.
///
/// After calling this, any part of the application can trigger saves through
/// [`global()`].
///
/// # Panics
///
/// Panics if called more than once.
pub fn init<D: Dispatcher, F: Fetcher>(builder: PageSaverBuilder<D, F>) -> PageSaverHandle {
    let handle = builder.build();
    let sender = handle.sender();

    GLOBAL
        .set(sender)
        .unwrap_or_else(|_| panic!("Global PageSaver already initialized"));

    handle
}

/// Retrieve the global [`PageSaverSender`] previously registered with
/// [`init()`].
///
/// Returns `None` if [`init()`] has not been called.
pub fn global() -> Option<&'static PageSaverSender> {
    GLOBAL.get()
}
