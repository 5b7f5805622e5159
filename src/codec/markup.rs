//! Markup scanner
//!
//! Splits HTML-like text into tag and text tokens with byte spans into the
//! source. This understands just enough markup to locate a table, its
//! sections, rows and cells; it does not build a general document tree.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// Comments, doctypes, processing instructions, start and end tags.
const TAG_PATTERN: &str = r"(?s)<!--.*?-->|<![^>]*>|<\?[^>]*>|<(/?)([A-Za-z][A-Za-z0-9:-]*)(?:\s[^>]*)?/?>";

fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| Regex::new(TAG_PATTERN).expect("tag pattern is a valid regex"))
}

/// Kind of markup token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Opening tag; name is lowercased
    StartTag(String),
    /// Closing tag; name is lowercased
    EndTag(String),
    /// Character data between tags
    Text,
    /// Comment, doctype or processing instruction
    Other,
}

/// A token and its byte span in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn is_start(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::StartTag(n) if n == name)
    }

    pub fn is_end(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::EndTag(n) if n == name)
    }
}

/// Elements whose content is raw text and must not be scanned for tags.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Tokenizes the whole source.
///
/// Text between tags becomes `Text` tokens. The contents of `<script>` and
/// `<style>` elements are emitted as a single `Text` token.
pub fn scan(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < src.len() {
        let Some(found) = tag_regex().captures_at(src, pos) else {
            break;
        };
        let Some(whole) = found.get(0) else {
            break;
        };

        if whole.start() > pos {
            tokens.push(Token {
                kind: TokenKind::Text,
                span: pos..whole.start(),
            });
        }

        let kind = match found.get(2) {
            Some(name) => {
                let name = name.as_str().to_ascii_lowercase();
                let closing = found.get(1).is_some_and(|slash| !slash.as_str().is_empty());
                if closing {
                    TokenKind::EndTag(name)
                } else {
                    TokenKind::StartTag(name)
                }
            }
            None => TokenKind::Other,
        };

        pos = whole.end();
        let raw_element = match &kind {
            TokenKind::StartTag(name) if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => {
                Some(name.clone())
            }
            _ => None,
        };
        tokens.push(Token {
            kind,
            span: whole.range(),
        });

        if let Some(name) = raw_element {
            let content_end = find_closing_tag(src, pos, &name).unwrap_or(src.len());
            if content_end > pos {
                tokens.push(Token {
                    kind: TokenKind::Text,
                    span: pos..content_end,
                });
            }
            pos = content_end;
        }
    }

    if pos < src.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            span: pos..src.len(),
        });
    }

    tokens
}

/// Byte offset of the next `</name` at or after `from`, ASCII case-insensitive.
fn find_closing_tag(src: &str, from: usize, name: &str) -> Option<usize> {
    let needle = format!("</{}", name);
    let haystack = src.get(from..)?.to_ascii_lowercase();
    haystack.find(&needle).map(|offset| from + offset)
}

/// Index of the end tag matching the start tag at `open`, honoring nesting.
pub fn matching_end(tokens: &[Token], open: usize, name: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token.is_start(name) {
            depth += 1;
        } else if token.is_end(name) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// Removes every `<name>...</name>` element from a fragment.
///
/// An unclosed element is removed up to the end of the fragment.
pub fn strip_elements(fragment: &str, name: &str) -> String {
    let tokens = scan(fragment);
    let mut output = String::with_capacity(fragment.len());
    let mut copied_to = 0;
    let mut index = 0;

    while index < tokens.len() {
        if tokens[index].is_start(name) {
            let start = tokens[index].span.start;
            let (end, resume) = match matching_end(&tokens, index, name) {
                Some(close) => (tokens[close].span.end, close + 1),
                None => (fragment.len(), tokens.len()),
            };
            output.push_str(&fragment[copied_to..start]);
            copied_to = end;
            index = resume;
        } else {
            index += 1;
        }
    }

    output.push_str(&fragment[copied_to..]);
    output
}

/// Decodes the character references that appear in table cells.
///
/// Unknown references are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        output.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|semi| *semi <= 12)
            .and_then(|semi| decode_reference(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                output.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                output.push('&');
                rest = &tail[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

fn decode_reference(reference: &str) -> Option<char> {
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{A0}'),
        _ => {
            let numeric = reference.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Escapes text for use as element content.
pub fn escape_text(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
    output
}

/// Trims and collapses internal whitespace runs (including NBSP) to one space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
