//! Dispatch boundary that turns an encoded document into a stored file.
//!
//! The crate ships with one built-in dispatcher, [`FsDispatcher`], which
//! writes to the local filesystem the way the platform download API would.
//! Implement the [`Dispatcher`] trait to hand saves to another mechanism.

mod fs;

pub use fs::FsDispatcher;

use crate::error::Result;

/// The transient message produced by one capture and consumed exactly once
/// by the dispatch boundary.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    /// Percent-encoded UTF-8 HTML payload.
    pub encoded_content: String,
    /// Sanitized base name with `.html` extension, no timestamp yet.
    pub filename: String,
}

/// Trait for the persistence boundary.
///
/// Implementations must be `Send + Sync + 'static` so a dispatcher can be
/// shared across concurrently spawned save operations.
///
/// A successful dispatch returns an opaque identifier for the stored file;
/// failures are returned to the caller as errors and never retried.
///
/// # Implementing a custom dispatcher
///
/// ```rust,no_run
/// use page_saver::{Dispatcher, SaveRequest, Result};
///
/// struct NullDispatcher;
///
/// impl Dispatcher for NullDispatcher {
///     async fn dispatch(&self, request: &SaveRequest) -> Result<String> {
///         Ok(request.filename.clone())
///     }
/// }
/// ```
pub trait Dispatcher: Send + Sync + 'static {
    /// Persist the request's content under its filename, returning an
    /// opaque handle identifying the stored file.
    fn dispatch(&self, request: &SaveRequest) -> impl Future<Output = Result<String>> + Send;
}

/// Prefix a filename with a sortable UTC timestamp token, guaranteeing
/// uniqueness across repeated saves of the same page.
///
/// The token is the RFC 3339 instant with `:` and `.` (unsafe in filenames
/// on some platforms) replaced by `-`, e.g.
/// `2024-07-01T09-15-00-123Z-My_Page.html`.
pub fn unique_filename(filename: &str) -> String {
    let timestamp = chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{timestamp}-{filename}")
}
