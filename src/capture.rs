//! Orchestration of one page-capture into a dispatchable save request.

use url::Url;

use crate::dispatcher::SaveRequest;
use crate::fetch::Fetcher;
use crate::filename::sanitize_filename;
use crate::images::inline_images;
use crate::page::PageSource;
use crate::snapshot::DocumentSnapshot;
use crate::styles::collect_styles;

/// Run the full serialization pipeline for one page and produce the
/// [`SaveRequest`] handed to the dispatch boundary.
///
/// The sequence is fixed: snapshot the document, collect and inject the
/// style bundle, inline images against the snapshot (never the live page),
/// serialize with a doctype prefix, derive the filename from the sanitized
/// title, and percent-encode the markup for transfer. Degraded resources
/// never fail the capture; only a catastrophic pipeline failure aborts it.
pub async fn capture<F: Fetcher>(page: &PageSource, fetcher: &F) -> crate::Result<SaveRequest> {
    tracing::debug!(url = %page.url, "Capturing page");
    let mut snapshot = DocumentSnapshot::capture(&page.html);

    let base_url = Url::parse(&page.url).ok();

    let styles = collect_styles(&page.stylesheets, &snapshot, base_url.as_ref(), fetcher).await;
    tracing::debug!("Collected {} bytes of CSS", styles.len());
    snapshot.inject_styles(styles);

    inline_images(&mut snapshot, base_url.as_ref(), fetcher).await;

    let markup = snapshot.serialize();
    tracing::debug!("Serialized {} bytes of markup", markup.len());

    let filename = format!("{}.html", sanitize_filename(&page.title));
    let encoded_content = urlencoding::encode(&markup).into_owned();

    Ok(SaveRequest {
        encoded_content,
        filename,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::PageSaverError;
    use crate::fetch::FetchedResource;
    use crate::page::StyleSheetRef;

    struct StaticFetcher {
        responses: HashMap<String, (Vec<u8>, &'static str)>,
    }

    impl StaticFetcher {
        fn new(responses: Vec<(&str, &[u8], &'static str)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(url, bytes, ct)| (url.to_string(), (bytes.to_vec(), ct)))
                    .collect(),
            }
        }
    }

    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> crate::Result<FetchedResource> {
            match self.responses.get(url) {
                Some((bytes, ct)) => Ok(FetchedResource {
                    bytes: bytes.clone(),
                    content_type: Some(ct.to_string()),
                }),
                None => Err(PageSaverError::Fetch {
                    url: url.to_string(),
                    reason: "not found".to_string(),
                }),
            }
        }
    }

    fn decode(request: &SaveRequest) -> String {
        urlencoding::decode(&request.encoded_content)
            .unwrap()
            .into_owned()
    }

    #[tokio::test]
    async fn end_to_end_capture() {
        let fetcher = StaticFetcher::new(vec![(
            "https://example.com/a.png",
            &[1u8, 2, 3][..],
            "image/png",
        )]);
        let page = PageSource::new(
            "https://example.com/",
            "My Page!!",
            r#"<html><head><title>My Page!!</title></head><body><img src="a.png"></body></html>"#,
        )
        .with_stylesheet(StyleSheetRef::readable("body{color:red}"));

        let request = capture(&page, &fetcher).await.unwrap();

        assert_eq!(request.filename, "My_Page.html");
        let markup = decode(&request);
        assert!(markup.starts_with("<!DOCTYPE html>\n"));
        assert!(markup.contains("<style>body{color:red}</style>"));
        assert!(markup.contains(r#"src="data:image/png;base64,AQID""#));
        assert!(!markup.contains(r#"src="a.png""#));
    }

    #[tokio::test]
    async fn untitled_page_gets_fallback_filename() {
        let fetcher = StaticFetcher::new(vec![]);
        let page = PageSource::new("https://example.com/", "", "<html></html>");

        let request = capture(&page, &fetcher).await.unwrap();

        assert_eq!(request.filename, "webpage.html");
    }

    #[tokio::test]
    async fn payload_is_percent_encoded() {
        let fetcher = StaticFetcher::new(vec![]);
        let page = PageSource::new(
            "https://example.com/",
            "t",
            "<html><body><p>a b</p></body></html>",
        );

        let request = capture(&page, &fetcher).await.unwrap();

        assert!(!request.encoded_content.contains('<'));
        assert!(!request.encoded_content.contains(' '));
        assert!(decode(&request).contains("<p>a b</p>"));
    }

    #[tokio::test]
    async fn degraded_resources_do_not_fail_capture() {
        let fetcher = StaticFetcher::new(vec![]);
        let page = PageSource::new(
            "https://example.com/",
            "partial",
            r#"<html><body><img src="missing.png"></body></html>"#,
        )
        .with_stylesheet(StyleSheetRef::blocked("https://gone.example.com/x.css"));

        let request = capture(&page, &fetcher).await.unwrap();

        let markup = decode(&request);
        assert!(markup.contains(r#"src="missing.png""#));
    }
}
