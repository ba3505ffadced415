//! Replacement of image sources with embedded base64 data URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::join_all;
use url::Url;

use crate::fetch::{FetchedResource, Fetcher, resolve_url};
use crate::snapshot::DocumentSnapshot;

/// Media type assumed when a response declares none.
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Fetch every `<img>` resource in the snapshot and replace its `src` with a
/// self-contained data URL.
///
/// All fetches run concurrently with no ordering guarantee; the function
/// returns only after every per-image attempt has settled. An image with an
/// empty source (or one already using the `data:` scheme) is skipped, and an
/// image whose fetch or conversion fails keeps its original source. Failures
/// are logged and never abort the batch.
pub async fn inline_images<F: Fetcher>(
    snapshot: &mut DocumentSnapshot,
    base_url: Option<&Url>,
    fetcher: &F,
) {
    let targets: Vec<String> = snapshot
        .image_sources()
        .into_iter()
        .filter(|src| {
            if src.starts_with("data:") {
                tracing::debug!("Image already embedded, skipping");
                return false;
            }
            true
        })
        .collect();

    let attempts = targets.into_iter().map(|src| {
        let target = resolve_url(base_url, &src);
        async move {
            match fetcher.fetch(&target).await {
                Ok(resource) => Some((src, to_data_url(&resource))),
                Err(e) => {
                    tracing::warn!("Unable to convert image {target}: {e}");
                    None
                }
            }
        }
    });

    for (src, data_url) in join_all(attempts).await.into_iter().flatten() {
        snapshot.set_image_src(src, data_url);
    }
}

/// Encode a fetched resource as `data:<media-type>;base64,<payload>`.
fn to_data_url(resource: &FetchedResource) -> String {
    let media_type = resource
        .content_type
        .as_deref()
        .unwrap_or(FALLBACK_MEDIA_TYPE);

    let capacity = base64::encoded_len(resource.bytes.len(), true).unwrap_or(0);
    let mut out = String::with_capacity(capacity + media_type.len() + 13);
    out.push_str("data:");
    out.push_str(media_type);
    out.push_str(";base64,");
    STANDARD.encode_string(&resource.bytes, &mut out);
    out
}
