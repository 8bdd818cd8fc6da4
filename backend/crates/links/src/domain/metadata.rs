//! Page Metadata Extraction
//!
//! Pulls the `<title>`, `<meta name="description">` and
//! `<meta property="og:image">` values out of an HTML document with regexes.
//! No scripts run and no DOM is built.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::FetchError;

static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:html|head|body|title|meta)\b").expect("valid regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([\s\S]*?)</title>").expect("valid regex"));
/// Quoted attribute values may contain `>`; a stray quote falls back to the
/// first `>`
static META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b(?:[^>"']|"[^"]*"|'[^']*'|["'])*>"#).expect("valid regex")
});
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]{1,6})|#([0-9]{1,7})|(amp|lt|gt|quot|apos|nbsp));")
        .expect("valid regex")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid regex")
});

/// Presentation metadata scraped from a page; absent values are empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub image: String,
}

/// Extract metadata from an HTML document
///
/// The first matching tag of each kind wins. A body with no HTML markup at
/// all is a [`FetchError::ParseFailure`].
pub fn extract_metadata(html: &str) -> Result<Metadata, FetchError> {
    if !MARKUP_RE.is_match(html) {
        return Err(FetchError::ParseFailure);
    }

    let title = TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
        .unwrap_or_default();

    let mut description = None;
    let mut image = None;
    for tag in META_RE.find_iter(html) {
        let attrs = parse_attributes(tag.as_str());
        let Some(content) = attrs.get("content") else {
            continue;
        };

        let is = |key: &str, value: &str| {
            attrs
                .get(key)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(value))
        };
        if description.is_none() && is("name", "description") {
            description = Some(decode_entities(content));
        } else if image.is_none() && is("property", "og:image") {
            image = Some(decode_entities(content));
        }

        if description.is_some() && image.is_some() {
            break;
        }
    }

    Ok(Metadata {
        title,
        description: description.unwrap_or_default(),
        image: image.unwrap_or_default(),
    })
}

/// Attribute names lowercased; the first occurrence of a name wins
fn parse_attributes(tag: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for caps in ATTR_RE.captures_iter(tag) {
        let name = caps[1].to_ascii_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        attrs.entry(name).or_insert_with(|| value.to_string());
    }
    attrs
}

/// Single pass, so a decoded `&` never starts another reference
fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse().ok().and_then(char::from_u32)
            } else {
                match caps.get(3).map(|m| m.as_str()) {
                    Some("amp") => Some('&'),
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    Some("nbsp") => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
