//! Directive scanner - finds `if[...]` tokens in dialogue text.
//!
//! Two forms are recognized:
//! - gate form `<marker>if[<payload>]`
//! - template form `<marker>if[<payload>]{"<replacement>"}`
//!
//! The payload ends at the first `]`, the replacement at the first `"}`.
//! Neither spans lines.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::scope::ScopeKind;

static GATE_PATTERNS: LazyLock<[Regex; 4]> =
    LazyLock::new(|| ScopeKind::ALL.map(|kind| compile(kind, r"if\[([^\]\n]*)\]")));

static TEMPLATE_PATTERNS: LazyLock<[Regex; 4]> =
    LazyLock::new(|| ScopeKind::ALL.map(|kind| compile(kind, r#"if\[([^\]\n]*)\]\{"(.*?)"\}"#)));

static ANY_GATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[!#$&]if\[[^\]\n]*\]").expect("directive pattern is valid"));

fn compile(kind: ScopeKind, body: &str) -> Regex {
    let marker = regex::escape(&kind.marker().to_string());
    Regex::new(&format!("{marker}{body}")).expect("directive pattern is valid")
}

fn index(kind: ScopeKind) -> usize {
    match kind {
        ScopeKind::Global => 0,
        ScopeKind::Table => 1,
        ScopeKind::Conspirator => 2,
        ScopeKind::Target => 3,
    }
}

/// One directive occurrence in a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveMatch<'t> {
    pub scope: ScopeKind,
    /// Byte offset of the marker character.
    pub start: usize,
    /// Byte length of the whole directive span.
    pub len: usize,
    /// The full directive text, marker included.
    pub raw: &'t str,
    /// Text between `[` and `]`.
    pub payload: &'t str,
    /// Text between `{"` and `"}` (template form only).
    pub replacement: Option<&'t str>,
}

impl<'t> DirectiveMatch<'t> {
    fn from_captures(scope: ScopeKind, captures: &Captures<'t>) -> Option<Self> {
        let whole = captures.get(0)?;
        Some(Self {
            scope,
            start: whole.start(),
            len: whole.len(),
            raw: whole.as_str(),
            payload: captures.get(1)?.as_str(),
            replacement: captures.get(2).map(|m| m.as_str()),
        })
    }

    /// Byte offset just past the directive.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// All gate-form directives of one scope, in text order.
pub fn gate_directives(text: &str, kind: ScopeKind) -> impl Iterator<Item = DirectiveMatch<'_>> {
    GATE_PATTERNS[index(kind)]
        .captures_iter(text)
        .filter_map(move |captures| DirectiveMatch::from_captures(kind, &captures))
}

/// All template-form directives of one scope, in text order.
pub fn template_directives(
    text: &str,
    kind: ScopeKind,
) -> impl Iterator<Item = DirectiveMatch<'_>> {
    TEMPLATE_PATTERNS[index(kind)]
        .captures_iter(text)
        .filter_map(move |captures| DirectiveMatch::from_captures(kind, &captures))
}

/// The first template-form directive of one scope starting at or after `from`.
pub fn first_template_directive(
    text: &str,
    kind: ScopeKind,
    from: usize,
) -> Option<DirectiveMatch<'_>> {
    TEMPLATE_PATTERNS[index(kind)]
        .captures_at(text, from)
        .and_then(|captures| DirectiveMatch::from_captures(kind, &captures))
}

/// Whether the text contains any directive at all.
pub fn contains_directive(text: &str) -> bool {
    ANY_GATE.is_match(text)
}

/// Remove every gate-form span without evaluating it.
pub fn strip_gate_directives(text: &str) -> Cow<'_, str> {
    ANY_GATE.replace_all(text, "")
}
