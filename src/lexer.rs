//! Lexer primitives: whitespace skipping, single-character matching,
//! keyword/delimiter peeking, and name scanning with backslash-escape
//! handling. These are plain cursor-advancing functions rather than a
//! combinator pipeline, since the parser needs an exact byte offset at
//! every point for error reporting.

/// Advance `pos` past any run of ASCII whitespace.
pub fn skip_ws(text: &str, pos: &mut usize) {
    while text[*pos..].starts_with(|c: char| c.is_whitespace()) {
        *pos += next_char_len(text, *pos);
    }
}

fn next_char_len(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map(char::len_utf8).unwrap_or(1)
}

/// The character at `pos`, if any.
pub fn peek_char(text: &str, pos: usize) -> Option<char> {
    text[pos..].chars().next()
}

/// If the byte at `pos` is `c`, consume it and return true.
pub fn match_char(text: &str, pos: &mut usize, c: char) -> bool {
    if peek_char(text, *pos) == Some(c) {
        *pos += c.len_utf8();
        true
    } else {
        false
    }
}

/// If `text[*pos..]` starts with the literal `tag`, consume it and return
/// true.
pub fn match_str(text: &str, pos: &mut usize, tag: &str) -> bool {
    if text[*pos..].starts_with(tag) {
        *pos += tag.len();
        true
    } else {
        false
    }
}

/// True iff `text[*pos..]` starts with `tag` (without consuming).
pub fn peek_str(text: &str, pos: usize, tag: &str) -> bool {
    text[pos..].starts_with(tag)
}

/// True iff the entire remaining byte at `pos` is an ASCII digit.
pub fn peek_digit(text: &str, pos: usize) -> bool {
    matches!(peek_char(text, pos), Some(c) if c.is_ascii_digit())
}

/// Scan a run of ASCII digits (`Number := [0-9]+`). Returns the consumed
/// text; the caller is responsible for range/parse validation.
pub fn scan_digits<'a>(text: &'a str, pos: &mut usize) -> &'a str {
    let start = *pos;
    while peek_digit(text, *pos) {
        *pos += 1;
    }
    &text[start..*pos]
}

/// Scan a run of ASCII letters only — used for function-call identifiers,
/// per the grammar's lookahead rule (`[A-Za-z]+` followed by optional
/// whitespace and `(`).
pub fn scan_alpha<'a>(text: &'a str, pos: &mut usize) -> &'a str {
    let start = *pos;
    while matches!(peek_char(text, *pos), Some(c) if c.is_ascii_alphabetic()) {
        *pos += 1;
    }
    &text[start..*pos]
}

/// Scan a `Name`: one or more characters not in
/// `{'/', '[', ']', '=', whitespace}`; a backslash escapes the following
/// character, including it literally regardless of what it is. Returns the
/// unescaped name, or `None` if nothing could be scanned (an empty name is
/// illegal, ENAME).
pub fn scan_name(text: &str, pos: &mut usize) -> Option<String> {
    let mut out = String::new();
    loop {
        match peek_char(text, *pos) {
            Some('\\') => {
                *pos += 1;
                match peek_char(text, *pos) {
                    Some(c) => {
                        out.push(c);
                        *pos += c.len_utf8();
                    }
                    None => break,
                }
            }
            Some(c) if is_name_terminator(c) => break,
            Some(c) => {
                out.push(c);
                *pos += c.len_utf8();
            }
            None => break,
        }
    }
    if out.is_empty() { None } else { Some(out) }
}

fn is_name_terminator(c: char) -> bool {
    c == '/' || c == '[' || c == ']' || c == '=' || c.is_whitespace()
}

/// True iff `pos` is at end of input or sits on a name terminator — used to
/// recognize the `.`/`..` step abbreviations, which are only special when
/// followed immediately by a step boundary (`./foo` is the shorthand; `.foo`
/// is a literal name starting with a dot).
pub fn at_boundary(text: &str, pos: usize) -> bool {
    peek_char(text, pos).is_none_or(is_name_terminator)
}
