//! Aggregation of every CSS rule affecting the page into one style bundle.

use url::Url;

use crate::fetch::{Fetcher, resolve_url};
use crate::page::StyleSheetRef;
use crate::snapshot::DocumentSnapshot;

/// Gather all CSS affecting the page into a single newline-joined string.
///
/// Attached sheets are processed sequentially in discovery order: readable
/// rule text is taken as-is, and an access-blocked sheet falls back to
/// fetching its declared address and reading the body as raw CSS. A sheet
/// that cannot be recovered either way is logged and skipped -- partial
/// capture is acceptable and no single failure aborts the collection.
///
/// Text from literal `<style>` elements in the snapshot is appended after
/// all sheet-derived fragments. Duplicates are preserved.
pub async fn collect_styles<F: Fetcher>(
    sheets: &[StyleSheetRef],
    snapshot: &DocumentSnapshot,
    base_url: Option<&Url>,
    fetcher: &F,
) -> String {
    let mut fragments: Vec<String> = Vec::new();

    for sheet in sheets {
        if let Some(rules) = &sheet.rules {
            if !rules.is_empty() {
                fragments.push(rules.clone());
            }
            continue;
        }

        let Some(href) = &sheet.href else {
            tracing::warn!("Skipping access-blocked stylesheet with no address");
            continue;
        };

        let target = resolve_url(base_url, href);
        match fetcher.fetch(&target).await {
            Ok(resource) => {
                fragments.push(String::from_utf8_lossy(&resource.bytes).into_owned());
            }
            Err(e) => {
                tracing::warn!("Unable to load stylesheet {target}: {e}");
            }
        }
    }

    for text in snapshot.inline_style_text() {
        fragments.push(text);
    }

    fragments.join("\n")
}
