//! Cleanup pass for extracted chapter text.
//!
//! The source pages embed ad markup and reader-UI boilerplate inside the
//! content containers; these survive text extraction and have to be stripped
//! by pattern before the length check runs.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

/// Markup and boilerplate stripped from extracted content, matched
/// case-insensitively across newlines.
const UNWANTED_PATTERNS: &[&str] = &[
    r"Remember the mobile version:.*",
    r"<script[^>]*>.*?</script>",
    r"<ins[^>]*>.*?</ins>",
    r"adsbygoogle.*?push\(\{\}\);",
    r"adsbygoogle",
    r"pagead2\.googlesyndication\.com.*",
    r"googlesyndication",
    r#"data-ad-[^=]*="[^"]*""#,
    r#"crossorigin="anonymous""#,
    r#"async="""#,
    r"Report.*?bad translation",
    r"Select text and click.*Report.*",
    r"Words:\d+.*?Update:\d+/\d+/\d+.*?\d+:\d+:\d+",
];

fn unwanted() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        UNWANTED_PATTERNS
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .dot_matches_new_line(true)
                    .case_insensitive(true)
                    .build()
                    .expect("static sanitize pattern must compile")
            })
            .collect()
    })
}

fn blank_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n\s*\n+").expect("static pattern"))
}

fn horizontal_ws() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").expect("static pattern"))
}

/// Strip ad/script fragments and collapse whitespace.
///
/// Runs of three or more blank-separated lines collapse to exactly one blank
/// line; runs of horizontal whitespace collapse to a single space. The
/// result is trimmed.
pub fn sanitize(content: &str) -> String {
    let mut cleaned = content.to_string();
    for pattern in unwanted() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    let cleaned = blank_runs().replace_all(&cleaned, "\n\n");
    let cleaned = horizontal_ws().replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}
