//! Background worker that runs save operations triggered through a handle.
//!
//! This module is internal -- users interact with it indirectly through
//! [`PageSaverHandle`](crate::PageSaverHandle).

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use url::Url;

use crate::capture::capture;
use crate::dispatcher::Dispatcher;
use crate::error::PageSaverError;
use crate::fetch::Fetcher;
use crate::handle::SaveOutcome;
use crate::page::PageSource;

/// Schemes of internal browser pages that must never be captured.
const RESTRICTED_SCHEMES: &[&str] = &["chrome", "chrome-extension", "edge", "about"];

/// One trigger message: the page to save plus the single-reply channel.
pub(crate) struct Trigger {
    pub page: PageSource,
    pub reply: oneshot::Sender<SaveOutcome>,
}

pub(crate) async fn run<D: Dispatcher, F: Fetcher>(
    mut rx: mpsc::Receiver<Trigger>,
    mut shutdown_rx: oneshot::Receiver<()>,
    dispatcher: D,
    fetcher: F,
) {
    let dispatcher = Arc::new(dispatcher);
    let fetcher = Arc::new(fetcher);
    let mut saves: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown_rx => {
                tracing::info!("Shutdown signal received, draining triggers");
                rx.close();
                while let Some(trigger) = rx.recv().await {
                    saves.spawn(handle_trigger(dispatcher.clone(), fetcher.clone(), trigger));
                }
                while saves.join_next().await.is_some() {}
                tracing::info!("Worker shut down");
                return;
            }

            Some(trigger) = rx.recv() => {
                // Every trigger is an independent save operation.
                saves.spawn(handle_trigger(dispatcher.clone(), fetcher.clone(), trigger));
            }

            Some(_) = saves.join_next(), if !saves.is_empty() => {}
        }
    }
}

async fn handle_trigger<D: Dispatcher, F: Fetcher>(
    dispatcher: Arc<D>,
    fetcher: Arc<F>,
    trigger: Trigger,
) {
    let outcome = save_page(&*dispatcher, &*fetcher, &trigger.page).await;
    if trigger.reply.send(outcome).is_err() {
        tracing::debug!("Trigger caller went away before receiving the outcome");
    }
}

async fn save_page<D: Dispatcher, F: Fetcher>(
    dispatcher: &D,
    fetcher: &F,
    page: &PageSource,
) -> SaveOutcome {
    if restricted_scheme(&page.url).is_some() {
        let err = PageSaverError::RestrictedPage(page.url.clone());
        tracing::warn!("{err}");
        return SaveOutcome::Failed {
            error: err.to_string(),
        };
    }

    let request = match capture(page, fetcher).await {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Capture failed for {}: {e}", page.url);
            return SaveOutcome::Failed {
                error: e.to_string(),
            };
        }
    };

    match dispatcher.dispatch(&request).await {
        Ok(id) => {
            tracing::info!("Saved {} as {id}", page.url);
            SaveOutcome::Saved { id }
        }
        Err(e) => {
            tracing::error!("Dispatch failed for {}: {e}", page.url);
            SaveOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Returns the scheme when the address points at a restricted internal
/// browser page. An unparseable address is not restricted; its resource
/// fetches simply fail downstream.
fn restricted_scheme(url: &str) -> Option<&'static str> {
    let parsed = Url::parse(url).ok()?;
    RESTRICTED_SCHEMES
        .iter()
        .find(|scheme| parsed.scheme() == **scheme)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_pages_are_restricted() {
        assert_eq!(restricted_scheme("chrome://settings"), Some("chrome"));
        assert_eq!(restricted_scheme("edge://flags"), Some("edge"));
        assert_eq!(
            restricted_scheme("chrome-extension://abcdef/popup.html"),
            Some("chrome-extension")
        );
        assert_eq!(restricted_scheme("about:blank"), Some("about"));
    }

    #[test]
    fn web_pages_are_not_restricted() {
        assert_eq!(restricted_scheme("https://example.com/"), None);
        assert_eq!(restricted_scheme("http://localhost:8080/x"), None);
        assert_eq!(restricted_scheme("not a url"), None);
    }
}
