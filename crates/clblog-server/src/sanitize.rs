//! Strip HTML tags from user-supplied text before it is stored.

use once_cell::sync::Lazy;
use regex::Regex;

// A tag opens with a letter, `/` or `!`; quoted attribute values may hold `>`.
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<[A-Za-z/!](?:"[^"]*"|'[^']*'|[^'">])*>"#).expect("valid tag regex")
});

pub fn strip_tags(input: &str) -> String {
    TAG_RE.replace_all(input, "").into_owned()
}
