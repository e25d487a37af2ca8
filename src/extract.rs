use crate::config::SOURCE_EXTENSION;
use crate::models::{RawReference, ReferenceKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Wikilinks (`[[Target#Anchor|Label]]`) and inline links (`[Label](target "Title")`)
/// in a single pass so references come out in text order. A wikilink label runs to
/// the first closing `]]` and may itself contain brackets. Inline targets may hold
/// one level of parentheses for a `(title)`.
static REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[\[(?P<wiki>[^\[\]|#\n]+)(?:[|#][^\n]*?)?\]\]|\[[^\[\]\n]*\]\((?P<inline>(?:[^()\n]|\([^()\n]*\))*)\)",
    )
    .unwrap()
});

static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// Lazily scans `text` for references, left to right. Image embeds (`![[..]]`,
/// `![..](..)`) are skipped, as are inline links that point outside the vault
/// or have nothing left once anchors and queries are removed.
pub fn extract_references(text: &str) -> impl Iterator<Item = RawReference<'_>> + '_ {
    REFERENCE_REGEX.captures_iter(text).filter_map(move |caps| {
        let whole = caps.get(0)?;
        if text[..whole.start()].ends_with('!') {
            return None;
        }

        if let Some(wiki) = caps.name("wiki") {
            let target = wiki.as_str().trim();
            if target.is_empty() {
                return None;
            }
            return Some(RawReference {
                kind: ReferenceKind::Wikilink,
                raw_target: wiki.as_str(),
                target: Cow::Borrowed(target),
            });
        }

        let inline = caps.name("inline")?;
        clean_inline_target(inline.as_str()).map(|target| RawReference {
            kind: ReferenceKind::InlineLink,
            raw_target: inline.as_str(),
            target,
        })
    })
}

/// Reduces an inline link destination to a vault path, or `None` if it is
/// external or empty.
pub fn clean_inline_target(raw: &str) -> Option<Cow<'_, str>> {
    let trimmed = raw.trim();
    let path = match trimmed.strip_prefix('<') {
        Some(rest) => rest.find('>').map(|end| &rest[..end]).unwrap_or(rest),
        None => strip_link_title(trimmed),
    };

    let decoded = urlencoding::decode(path).unwrap_or(Cow::Borrowed(path));
    let target = map_cow(decoded, |s| {
        let end = s.find(['#', '?']).unwrap_or(s.len());
        s[..end].trim()
    });

    if target.is_empty() || SCHEME_REGEX.is_match(&target) {
        return None;
    }

    let target = map_cow(target, |s| {
        let s = s.strip_prefix('/').unwrap_or(s);
        s.strip_suffix(SOURCE_EXTENSION).unwrap_or(s)
    });
    if target.is_empty() {
        return None;
    }
    Some(target)
}

/// Removes a trailing `"title"`, `'title'` or `(title)` that is separated from
/// the path by whitespace. Spaces inside the path itself are kept.
fn strip_link_title(dest: &str) -> &str {
    let open = match dest.chars().last() {
        Some('"') => '"',
        Some('\'') => '\'',
        Some(')') => '(',
        _ => return dest,
    };

    let body = &dest[..dest.len() - 1];
    match body.rfind(open) {
        Some(pos) if pos > 0 && body[..pos].ends_with(char::is_whitespace) => {
            body[..pos].trim_end()
        }
        _ => dest,
    }
}

fn map_cow<'a>(value: Cow<'a, str>, f: impl for<'x> FnOnce(&'x str) -> &'x str) -> Cow<'a, str> {
    match value {
        Cow::Borrowed(s) => Cow::Borrowed(f(s)),
        Cow::Owned(s) => Cow::Owned(f(&s).to_string()),
    }
}
