//! Input representation of the live page handed to the trigger boundary.

/// The live tab at trigger time, as reported by the capture boundary.
///
/// Carries everything the serialization pipeline needs: the page address,
/// the tab title, the rendered markup, and the list of stylesheets attached
/// to the document.
///
/// # Example
///
/// ```
/// use page_saver::{PageSource, StyleSheetRef};
///
/// let page = PageSource::new(
///     "https://example.com/article",
///     "My Article",
///     "<html><head></head><body><p>Hi</p></body></html>",
/// )
/// .with_stylesheet(StyleSheetRef::readable("p{margin:0}"))
/// .with_stylesheet(StyleSheetRef::blocked("https://cdn.example.com/site.css"));
/// assert_eq!(page.stylesheets.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PageSource {
    /// Address of the page; used for the restricted-page policy and for
    /// resolving relative resource references.
    pub url: String,
    /// Tab title; becomes the output filename after sanitization.
    pub title: String,
    /// Rendered markup of the document at trigger time.
    pub html: String,
    /// Stylesheets attached to the document, in discovery order.
    pub stylesheets: Vec<StyleSheetRef>,
}

impl PageSource {
    /// Create a page source with no attached stylesheets.
    pub fn new(url: impl Into<String>, title: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            html: html.into(),
            stylesheets: Vec::new(),
        }
    }

    /// Append an attached stylesheet, preserving discovery order.
    pub fn with_stylesheet(mut self, sheet: StyleSheetRef) -> Self {
        self.stylesheets.push(sheet);
        self
    }
}

/// One stylesheet attached to the document.
///
/// `rules` holds the sheet's rule text when it was readable at capture time
/// (same-origin). For a cross-origin sheet the rule list is access-blocked:
/// `rules` is `None` and the collector falls back to fetching `href`.
#[derive(Debug, Clone)]
pub struct StyleSheetRef {
    /// Declared address of the sheet, if any.
    pub href: Option<String>,
    /// Rule text, present only when the sheet was readable directly.
    pub rules: Option<String>,
}

impl StyleSheetRef {
    /// A sheet whose rules were readable directly.
    pub fn readable(rules: impl Into<String>) -> Self {
        Self {
            href: None,
            rules: Some(rules.into()),
        }
    }

    /// A sheet whose rule list is access-blocked; only its address is known.
    pub fn blocked(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            rules: None,
        }
    }
}
