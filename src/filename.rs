//! Filesystem-safe filename derivation from page titles.

use std::sync::OnceLock;

use regex::Regex;

/// Name used when sanitization leaves nothing usable.
const FALLBACK: &str = "webpage";

fn illegal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("static pattern"))
}

fn runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_{2,}").expect("static pattern"))
}

fn edges() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[._-]+|[._-]+$").expect("static pattern"))
}

/// Normalize an arbitrary string into a safe filesystem base name.
///
/// Every character outside `[A-Za-z0-9._-]` becomes `_`, runs of underscores
/// collapse to one, and leading/trailing `.`/`_`/`-` are stripped. An empty
/// result (including empty or all-illegal input) yields `"webpage"`.
///
/// Pure and total; applying it twice gives the same result as once.
///
/// # Example
///
/// ```
/// use page_saver::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Page!!"), "My_Page");
/// assert_eq!(sanitize_filename("???"), "webpage");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let replaced = illegal().replace_all(name, "_");
    let collapsed = runs().replace_all(&replaced, "_");
    let trimmed = edges().replace_all(&collapsed, "");

    if trimmed.is_empty() {
        FALLBACK.to_string()
    } else {
        trimmed.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_title_unchanged() {
        assert_eq!(sanitize_filename("report-2024.v1"), "report-2024.v1");
    }

    #[test]
    fn spaces_and_punctuation_become_single_underscores() {
        assert_eq!(sanitize_filename("My Page!!"), "My_Page");
        assert_eq!(sanitize_filename("a  &  b"), "a_b");
    }

    #[test]
    fn edge_characters_stripped() {
        assert_eq!(sanitize_filename("...draft..."), "draft");
        assert_eq!(sanitize_filename("__x__"), "x");
        assert_eq!(sanitize_filename("-_.mixed.-_"), "mixed");
    }

    #[test]
    fn empty_and_all_illegal_fall_back() {
        assert_eq!(sanitize_filename(""), "webpage");
        assert_eq!(sanitize_filename("???"), "webpage");
        assert_eq!(sanitize_filename("///\\\\"), "webpage");
        // Only strippable characters also collapse to nothing
        assert_eq!(sanitize_filename("._-"), "webpage");
    }

    #[test]
    fn unicode_replaced() {
        assert_eq!(sanitize_filename("页面 标题"), "webpage");
        assert_eq!(sanitize_filename("café menu"), "caf_menu");
    }

    #[test]
    fn idempotent() {
        for input in ["My Page!!", "...draft...", "???", "ok-name", "a  b  c"] {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn output_alphabet_and_shape() {
        let checker = Regex::new(r"^[A-Za-z0-9._-]*$").unwrap();
        for input in ["weird $$$ title", "__a__b__", "<script>", "ünïcödé!"] {
            let out = sanitize_filename(input);
            assert!(checker.is_match(&out), "bad chars in {out:?}");
            assert!(!out.contains("__"), "double underscore in {out:?}");
            assert!(!out.starts_with(['.', '_', '-']), "bad leading char in {out:?}");
            assert!(!out.ends_with(['.', '_', '-']), "bad trailing char in {out:?}");
        }
    }
}
