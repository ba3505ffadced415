//! Builder for configuring and launching the background save worker.

use crate::dispatcher::Dispatcher;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::handle::PageSaverHandle;
use crate::worker::{self, Trigger};

/// Builder for configuring and starting a [`PageSaverHandle`].
///
/// Provides a fluent API for setting the dispatcher, the network fetcher,
/// and the trigger channel capacity.
///
/// # Example
///
/// ```rust,no_run
/// use page_saver::{PageSaverBuilder, FsDispatcher, FetchConfig, HttpFetcher};
///
/// # async fn example() {
/// let handle = PageSaverBuilder::new(FsDispatcher::new("/tmp/saves"))
///     .fetcher(HttpFetcher::with_config(FetchConfig {
///         max_resource_size: Some(10 * 1024 * 1024),
///         ..FetchConfig::default()
///     }))
///     .channel_buffer(64)
///     .build();
/// # }
/// ```
pub struct PageSaverBuilder<D: Dispatcher, F: Fetcher = HttpFetcher> {
    dispatcher: D,
    fetcher: F,
    channel_buffer: usize,
}

impl<D: Dispatcher> PageSaverBuilder<D, HttpFetcher> {
    /// Create a new builder with the given dispatch boundary and sensible
    /// defaults: an [`HttpFetcher`] with default configuration and a trigger
    /// buffer of 32.
    pub fn new(dispatcher: D) -> Self {
        Self {
            dispatcher,
            fetcher: HttpFetcher::new(),
            channel_buffer: 32,
        }
    }
}

impl<D: Dispatcher, F: Fetcher> PageSaverBuilder<D, F> {
    /// Replace the network fetcher used for stylesheets and images.
    pub fn fetcher<F2: Fetcher>(self, fetcher: F2) -> PageSaverBuilder<D, F2> {
        PageSaverBuilder {
            dispatcher: self.dispatcher,
            fetcher,
            channel_buffer: self.channel_buffer,
        }
    }

    /// Capacity of the internal mpsc channel between triggers and the worker.
    pub fn channel_buffer(mut self, size: usize) -> Self {
        self.channel_buffer = size;
        self
    }

    /// Consume the builder, spawn the background worker, and return the
    /// [`PageSaverHandle`] used to trigger saves and control the worker
    /// lifecycle.
    pub fn build(self) -> PageSaverHandle {
        let (tx, rx) = tokio::sync::mpsc::channel::<Trigger>(self.channel_buffer);
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let worker_handle =
            tokio::spawn(worker::run(rx, shutdown_rx, self.dispatcher, self.fetcher));

        PageSaverHandle::new(tx, shutdown_tx, worker_handle)
    }
}
