//! Filesystem dispatcher, the local equivalent of a browser download.

use std::path::PathBuf;

use crate::dispatcher::{Dispatcher, SaveRequest, unique_filename};
use crate::error::{PageSaverError, Result};

/// Dispatcher that decodes the payload and writes it into a downloads
/// directory, prefixing each filename with a timestamp token so repeated
/// saves never collide. The returned id is the full path of the file.
///
/// # Example
///
/// ```rust,no_run
/// use page_saver::FsDispatcher;
///
/// let dispatcher = FsDispatcher::new("/home/user/Downloads");
/// ```
pub struct FsDispatcher {
    base_dir: PathBuf,
}

impl FsDispatcher {
    /// Create a new `FsDispatcher` rooted at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl Dispatcher for FsDispatcher {
    async fn dispatch(&self, request: &SaveRequest) -> Result<String> {
        let markup = urlencoding::decode(&request.encoded_content)
            .map_err(|e| PageSaverError::Dispatch(Box::new(e)))?;

        let path = self.base_dir.join(unique_filename(&request.filename));

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PageSaverError::Dispatch(Box::new(e)))?;
        }

        tokio::fs::write(&path, markup.as_bytes())
            .await
            .map_err(|e| PageSaverError::Dispatch(Box::new(e)))?;

        tracing::debug!("Wrote {} bytes to {}", markup.len(), path.display());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn dispatch_writes_decoded_markup() {
        let tmp = TempDir::new().unwrap();
        let dispatcher = FsDispatcher::new(tmp.path());

        let request = SaveRequest {
            encoded_content: urlencoding::encode("<!DOCTYPE html>\n<html></html>").into_owned(),
            filename: "page.html".to_string(),
        };
        let id = dispatcher.dispatch(&request).await.unwrap();

        let content = tokio::fs::read_to_string(&id).await.unwrap();
        assert_eq!(content, "<!DOCTYPE html>\n<html></html>");
    }

    #[tokio::test]
    async fn dispatch_prefixes_timestamp_for_uniqueness() {
        let tmp = TempDir::new().unwrap();
        let dispatcher = FsDispatcher::new(tmp.path());

        let request = SaveRequest {
            encoded_content: urlencoding::encode("<html></html>").into_owned(),
            filename: "page.html".to_string(),
        };
        let first = dispatcher.dispatch(&request).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = dispatcher.dispatch(&request).await.unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with("-page.html"));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn dispatch_creates_missing_directories() {
        let tmp = TempDir::new().unwrap();
        let dispatcher = FsDispatcher::new(tmp.path().join("nested/saves"));

        let request = SaveRequest {
            encoded_content: urlencoding::encode("<html></html>").into_owned(),
            filename: "page.html".to_string(),
        };
        let id = dispatcher.dispatch(&request).await.unwrap();

        assert!(PathBuf::from(id).exists());
    }
}
