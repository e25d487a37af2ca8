use std::borrow::Cow;

/// Dense registration-order identifier of a page; doubles as its node index.
pub type PageId = u32;

/// One page as handed over by the document collection.
#[derive(Debug, Clone)]
pub struct PageSource {
    /// Location relative to the docs root, `/`-separated, extension included
    pub src_path: String,
    pub title: String,
    pub url: String,
    pub is_index: bool,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub id: PageId,
    pub path_key: String,
    pub src_path: String,
    pub title: String,
    pub url: String,
    pub is_index: bool,
    pub connection_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Wikilink,
    InlineLink,
}

/// A reference found in page text. `raw_target` is the text as written inside
/// the link syntax; `target` is what resolution works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference<'a> {
    pub kind: ReferenceKind,
    pub raw_target: &'a str,
    pub target: Cow<'a, str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: PageId,
    pub target: PageId,
}
