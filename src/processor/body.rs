//! Raw-text extraction for function signatures and bodies.
//!
//! Neither helper looks at what is inside the text it returns; bodies are
//! carried through to the generator verbatim.

/// Text up to the first `)` plus the remainder after it.
///
/// Parameter lists never nest parentheses, so the first `)` closes the list.
pub fn extract_parameters(input: &str) -> Option<(&str, &str)> {
    let close = input.find(')')?;
    Some((&input[..close], &input[close + 1..]))
}

/// Split `input` at the `}` balancing an already-consumed `{`.
///
/// Returns the body (without the closing brace) and the remainder after
/// it, or `None` when the braces never balance.
pub fn extract_body(input: &str) -> Option<(&str, &str)> {
    let mut depth = 1usize;
    let mut scan = 0usize;

    loop {
        let close = scan + input[scan..].find('}')?;
        let open = input[scan..].find('{').map(|i| scan + i);

        match open {
            Some(open) if open < close => {
                depth += 1;
                scan = open + 1;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some((&input[..close], &input[close + 1..]));
                }
                scan = close + 1;
            }
        }
    }
}
