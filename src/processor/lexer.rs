//! Very small delimiter-driven scanner for massaged shader text.
//!
//! A token is whatever sits in front of the next delimiter. The delimiter
//! itself is never consumed by the call that finds it; the following call
//! sees it at offset 0 and returns it as a one-character token.
//
//  Delimiters:
//
//      ' '  '*'  '<'  '>'  '-'  '+'  '/'  '%'
//      '('  ')'  '{'  '}'  ','  ';'  '['  ']'
//
//  Anything else (identifiers, numbers, `=`, `.`, …) is glued together
//  until the next delimiter.

use super::body;
use crate::error::TranslateError;

pub const DELIMITERS: &[char] = &[
    ' ', '*', '<', '>', '-', '+', '/', '%', '(', ')', '{', '}', ',', ';', '[', ']',
];

/// Split one token off the front of `input`.
///
/// Returns `(token, rest)`. The token is empty only when nothing but
/// whitespace is left.
pub fn next_token(input: &str) -> (&str, &str) {
    let content = input.trim_start();
    if content.is_empty() {
        return ("", content);
    }

    let end = match content.find(DELIMITERS) {
        // a delimiter at the very front becomes its own token
        Some(0) => content.chars().next().map_or(1, char::len_utf8),
        Some(i) => i,
        None => content.len(),
    };
    content.split_at(end)
}

/// Cursor over the massaged source, shared by the parser and the raw-text
/// extractors.
#[derive(Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, rest: src }
    }

    /// Byte offset of the cursor into the scanned text.
    pub fn offset(&self) -> usize {
        self.src.len() - self.rest.len()
    }

    pub fn next_token(&mut self) -> &'a str {
        let (token, rest) = next_token(self.rest);
        self.rest = rest;
        token
    }

    /// Consume the next token and check it is the single character `expected`.
    pub fn expect(&mut self, expected: char) -> Result<(), TranslateError> {
        let offset = self.offset();
        let token = self.next_token();
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c == expected => Ok(()),
            _ => Err(TranslateError::MismatchedDelimiter {
                expected,
                found: describe(token),
                offset,
            }),
        }
    }

    /// Raw text up to the next `)`; the cursor ends past the `)`.
    pub fn take_parameters(&mut self) -> Result<&'a str, TranslateError> {
        let start = self.rest.trim_start();
        let offset = self.src.len() - start.len();
        let (params, rest) = body::extract_parameters(start)
            .ok_or(TranslateError::UnterminatedParameterList { offset })?;
        self.rest = rest;
        Ok(params)
    }

    /// Raw body text of a block whose `{` was already consumed; the cursor
    /// ends past the matching `}`.
    pub fn take_body(&mut self) -> Result<&'a str, TranslateError> {
        let offset = self.offset();
        let (block, rest) = body::extract_body(self.rest)
            .ok_or(TranslateError::UnterminatedBlock { offset })?;
        self.rest = rest;
        Ok(block)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            "" => None,
            token => Some(token),
        }
    }
}

/// Human-readable form of a token for error messages.
pub fn describe(token: &str) -> String {
    if token.is_empty() {
        "end of input".to_string()
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenisation() {
        let test_cases = vec![
            (
                "attribute float4 pos;",
                vec!["attribute", "float4", "pos", ";"],
            ),
            (
                "void main(){ v_position = u_mvp * pos; }",
                vec![
                    "void", "main", "(", ")", "{", "v_position", "=", "u_mvp", "*", "pos",
                    ";", "}",
                ],
            ),
            (
                "float2 a[4];x.y=-1",
                vec!["float2", "a", "[", "4", "]", ";", "x.y=", "-", "1"],
            ),
        ];

        for (src, expected) in test_cases {
            let tokens: Vec<_> = Scanner::new(src).collect();
            assert_eq!(tokens, expected, "source: {src}");
        }
    }

    #[test]
    fn test_leading_delimiter_always_progresses() {
        for src in ["(", "{x", ";;", "**", "  )", "-1"] {
            let (token, rest) = next_token(src);
            assert!(!token.is_empty(), "no token for {src:?}");
            assert!(rest.len() < src.len(), "no progress on {src:?}");
        }
    }

    #[test]
    fn test_every_call_shortens_input() {
        let mut rest = "  uniform sampler2D tex;void f(float a){return a*2.0;}";
        while !rest.trim_start().is_empty() {
            let before = rest.len();
            let (_, next) = next_token(rest);
            assert!(next.len() < before);
            rest = next;
        }
    }

    #[test]
    fn test_end_of_input() {
        assert_eq!(next_token(""), ("", ""));
        assert_eq!(next_token("   "), ("", ""));
        assert_eq!(next_token("tail"), ("tail", ""));
    }

    #[test]
    fn test_delimiter_not_consumed() {
        let (token, rest) = next_token("main(");
        assert_eq!(token, "main");
        assert_eq!(rest, "(");
    }

    #[test]
    fn test_expect_and_offsets() {
        let mut scanner = Scanner::new("f ( x");
        assert_eq!(scanner.next_token(), "f");
        assert_eq!(scanner.expect('('), Ok(()));
        assert_eq!(
            scanner.expect('{'),
            Err(TranslateError::MismatchedDelimiter {
                expected: '{',
                found: "x".into(),
                offset: 3,
            })
        );
        assert_eq!(scanner.offset(), 5);
        assert_eq!(
            scanner.expect(';'),
            Err(TranslateError::MismatchedDelimiter {
                expected: ';',
                found: "end of input".into(),
                offset: 5,
            })
        );
    }
}
