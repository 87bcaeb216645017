//! Text-level preprocessing that runs before scanning.
//!
//!   1. identifier substitution from the `ReplacementTable`
//!   2. comment / directive stripping (string literals pass through)
//!   3. whitespace normalisation
//!
//! Massaging never fails; odd input just produces odd text for the parser.

use crate::config::ReplacementTable;
use regex::Regex;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::LazyLock;

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ ]{2,}").unwrap());

pub struct Massager<'a> {
    table: &'a ReplacementTable,
    /// `gl_Position` always becomes this, whatever the table says.
    position_output: &'a str,
}

impl<'a> Massager<'a> {
    pub fn new(table: &'a ReplacementTable, position_output: &'a str) -> Self {
        Self {
            table,
            position_output,
        }
    }

    pub fn massage(&self, text: &str) -> String {
        let replaced = self.replace_identifiers(text);
        let stripped = strip_comments(&replaced);
        normalize_whitespace(&stripped)
    }

    /// Swap every identifier that is a table key. Identifiers are maximal
    /// runs of `[A-Za-z0-9_]`, so `vec2Count` stays intact.
    pub fn replace_identifiers(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(is_ident_char) {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let len = tail.find(|c| !is_ident_char(c)).unwrap_or(tail.len());
            let ident = &tail[..len];
            let replacement = match ident {
                "gl_Position" => self.position_output,
                _ => self.table.get(ident).unwrap_or(ident),
            };
            out.push_str(replacement);
            rest = &tail[len..];
        }
        out.push_str(rest);
        out
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Remove `/* */` comments and `#` directive lines, turn `//` comments into
/// a bare newline. String literals (`"…"` and `@"…"`) are copied verbatim.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                skip_block_comment(&mut chars);
            }
            '/' if chars.peek() == Some(&'/') => {
                skip_line(&mut chars);
                out.push('\n');
            }
            '#' => skip_line(&mut chars),
            '"' if string_closes(&chars) => copy_string(&mut chars, &mut out),
            '@' if chars.peek() == Some(&'"') => {
                out.push('@');
                copy_verbatim(&mut chars, &mut out);
            }
            c => out.push(c),
        }
    }
    out
}

fn skip_block_comment(chars: &mut Peekable<Chars>) {
    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'/') {
            chars.next();
            return;
        }
    }
}

/// Consume up to and including the next `\n`.
fn skip_line(chars: &mut Peekable<Chars>) {
    for c in chars.by_ref() {
        if c == '\n' {
            return;
        }
    }
}

/// Whether the `"` just consumed is closed before the end of its line.
fn string_closes(chars: &Peekable<Chars>) -> bool {
    let mut ahead = chars.clone();
    while let Some(c) = ahead.next() {
        match c {
            '"' => return true,
            '\n' => return false,
            '\\' => {
                if ahead.peek() != Some(&'\n') {
                    ahead.next();
                }
            }
            _ => {}
        }
    }
    false
}

/// Opening `"` already consumed and known to be closed on this line.
fn copy_string(chars: &mut Peekable<Chars>, out: &mut String) {
    out.push('"');
    while let Some(c) = chars.next() {
        out.push(c);
        match c {
            '"' => return,
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            _ => {}
        }
    }
}

/// `@"…"` with `""` as the embedded quote; the `@` is already written.
fn copy_verbatim(chars: &mut Peekable<Chars>, out: &mut String) {
    while chars.peek() == Some(&'"') {
        out.push('"');
        chars.next();
        for c in chars.by_ref() {
            out.push(c);
            if c == '"' {
                break;
            }
        }
    }
}

/// Newlines become spaces, tabs two spaces, then space runs collapse to one.
pub fn normalize_whitespace(text: &str) -> String {
    let flat = text
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('\t', "  ");
    SPACE_RUNS.replace_all(&flat, " ").into_owned()
}
