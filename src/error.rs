//! Error types for the `page_saver` crate.

/// All errors that can occur while capturing and saving a page.
#[derive(Debug, thiserror::Error)]
pub enum PageSaverError {
    /// A network fetch for a stylesheet or image failed.
    ///
    /// These errors are always handled per resource and never abort a save.
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The dispatch boundary failed to persist the produced document.
    #[error("Dispatch failed: {0}")]
    Dispatch(Box<dyn std::error::Error + Send + Sync>),

    /// The channel to the background worker is closed.
    #[error("Channel closed or full")]
    ChannelClosed,

    /// The trigger targeted a restricted internal browser page.
    #[error("Cannot save internal browser page: {0}")]
    RestrictedPage(String),
}

/// A type alias for `Result<T, PageSaverError>`.
pub type Result<T> = std::result::Result<T, PageSaverError>;
