// Copyright (c) 2017 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Byte-oriented scanning primitives shared by every dialect's tree builder. Operates on
//! `&[u8]` rather than `&str` so indices stay stable even though the grammar is
//! ASCII-only by construction (identifiers, numbers and punctuation are all single-byte;
//! string contents are passed through verbatim).

pub fn is_word_char(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

pub fn is_number_char(c: u8) -> bool {
    c.is_ascii_digit()
}

pub fn is_whitespace(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

pub fn is_newline_char(c: u8) -> bool {
    c == b'\r' || c == b'\n'
}

pub fn is_identifier_char(c: u8) -> bool {
    is_word_char(c) || is_number_char(c)
}

pub fn all_word_char(s: &str) -> bool {
    s.bytes().all(is_word_char)
}

pub fn all_number_char(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_number_char)
}

pub fn all_identifier_char(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_identifier_char)
}

/// Strips `/* ... */` blocks (truncating at an unterminated block comment) and then
/// `// ...` line comments (leaving the terminating newline intact).
pub fn remove_comments(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            match src[i + 2..].find("*/") {
                Some(rel) => {
                    i = i + 2 + rel + 2;
                }
                None => {
                    i = bytes.len();
                }
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    let without_blocks = String::from_utf8(out).expect("input was valid utf8 and we only removed ascii ranges");

    let bytes = without_blocks.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'/') {
            match without_blocks[i..].find('\n') {
                Some(rel) => {
                    i += rel;
                }
                None => {
                    i = bytes.len();
                }
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).expect("input was valid utf8 and we only removed ascii ranges")
}

pub fn tab_to_space(src: &str) -> String {
    src.replace('\t', " ")
}

/// One linear pass validating that every `{`/`}` is balanced and non-overlapping-backwards.
/// Returns the line of the first mismatch, if any. Nesting is permitted: a block body may
/// itself contain braces.
pub fn validate_braces(s: &str) -> Result<(), u64> {
    validate_bracket_pair(s, b'{', b'}', false)
}

/// Like [`validate_braces`], but for `(`/`)` pairs, and additionally rejects nesting: a
/// second `(` before its enclosing one closes (e.g. `f((x))`) fails at the opening `(`,
/// rather than being left for the call-argument grammar to reject downstream.
pub fn validate_parens(s: &str) -> Result<(), u64> {
    validate_bracket_pair(s, b'(', b')', true)
}

/// Bracket characters inside a `"..."` literal don't count — a string argument like
/// `f("a(b)")` is balanced even though its contents aren't. Quotes never span a line (same
/// rule as [`Scanner::read_quoted_string`]), so an unterminated quote just ends at the
/// newline rather than swallowing the rest of the source.
fn validate_bracket_pair(s: &str, open: u8, close: u8, forbid_nesting: bool) -> Result<(), u64> {
    let mut depth: i64 = 0;
    let mut line: u64 = 1;
    let mut in_string = false;
    for c in s.bytes() {
        if is_newline_char(c) {
            line += 1;
            in_string = false;
        } else if c == b'"' {
            in_string = !in_string;
        } else if in_string {
            continue;
        } else if c == open {
            depth += 1;
            if forbid_nesting && depth > 1 {
                return Err(line);
            }
        } else if c == close {
            depth -= 1;
            if depth < 0 {
                return Err(line);
            }
        }
    }
    if depth != 0 {
        return Err(line);
    }
    Ok(())
}

/// A cursor-based scanner over a source buffer, used by the tree builders. Distinct from
/// the bare `Skip*`/`Read*` primitives above (which mirror the original's "index already on
/// the first character of the run" convention): this one supports the zero-or-more skips a
/// recursive-descent grammar needs.
pub struct Scanner<'a> {
    pub src: &'a str,
    bytes: &'a [u8],
    pub pos: usize,
    pub line: u64,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::new_at_line(src, 1)
    }

    /// Like [`Scanner::new`], but starting line counting from `line` instead of 1 — used
    /// when `src` is a suffix of a larger file (the diff body after its first, path, line
    /// has been peeled off) and diagnostics should still report the original file's lines.
    pub fn new_at_line(src: &'a str, line: u64) -> Self {
        Scanner {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line,
        }
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    pub fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        if is_newline_char(c) {
            self.line += 1;
        }
        self.pos += 1;
        Some(c)
    }

    pub fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if is_whitespace(c) || is_newline_char(c)) {
            self.advance();
        }
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    pub fn consume_str(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            for _ in 0..s.len() {
                self.advance();
            }
            true
        } else {
            false
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek() == Some(c as u8) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn read_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.advance();
        }
        &self.src[start..self.pos]
    }

    pub fn read_identifier(&mut self) -> Option<&'a str> {
        if !matches!(self.peek(), Some(c) if is_word_char(c)) {
            return None;
        }
        Some(self.read_while(is_identifier_char))
    }

    /// Reads from the current position (which must be `open`) through the matching `close`,
    /// honouring nesting, and returns the content strictly between the outermost pair.
    pub fn read_balanced(&mut self, open: char, close: char) -> Option<&'a str> {
        if self.peek() != Some(open as u8) {
            return None;
        }
        self.advance();
        let start = self.pos;
        let mut depth = 1i32;
        loop {
            let c = self.advance()?;
            if c == open as u8 {
                depth += 1;
            } else if c == close as u8 {
                depth -= 1;
                if depth == 0 {
                    return Some(&self.src[start..self.pos - 1]);
                }
            }
        }
    }

    /// Reads a `"`-delimited string (including the quotes) starting at the current
    /// position, failing if it would span a newline.
    pub fn read_quoted_string(&mut self) -> Option<&'a str> {
        if self.peek() != Some(b'"') {
            return None;
        }
        let start = self.pos;
        self.advance();
        loop {
            match self.peek() {
                None => return None,
                Some(b'"') => {
                    self.advance();
                    return Some(&self.src[start..self.pos]);
                }
                Some(c) if is_newline_char(c) => return None,
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_braces_rejects_unbalanced() {
        assert!(validate_braces("{ { } ").is_err());
        assert!(validate_braces("{ { } }").is_ok());
        assert!(validate_braces("} {").is_err());
    }

    #[test]
    fn validate_parens_accepts_balanced_non_nested() {
        assert!(validate_parens("(x) (y)").is_ok());
        assert!(validate_parens("()").is_ok());
    }

    #[test]
    fn validate_parens_rejects_nesting() {
        let err = validate_parens("f((x))").unwrap_err();
        assert_eq!(err, 1);
    }

    #[test]
    fn validate_parens_ignores_brackets_inside_quoted_strings() {
        assert!(validate_parens("f(\"a(b)\")").is_ok());
        assert!(validate_braces("f(\"a{b}\")").is_ok());
    }

    #[test]
    fn validate_parens_rejects_unbalanced() {
        assert!(validate_parens("(x").is_err());
        assert!(validate_parens(")(").is_err());
    }

    #[test]
    fn remove_comments_strips_block_and_line() {
        let src = "a /* x\ny */ b // trailing\nc";
        assert_eq!(remove_comments(src), "a  b \nc");
    }

    #[test]
    fn remove_comments_truncates_unterminated_block() {
        assert_eq!(remove_comments("a /* never closes"), "a ");
    }

    #[test]
    fn scanner_reads_balanced_braces() {
        let mut sc = Scanner::new("{ a { b } c }rest");
        let inner = sc.read_balanced('{', '}').unwrap();
        assert_eq!(inner, " a { b } c ");
        assert!(sc.starts_with("rest"));
    }

    #[test]
    fn scanner_read_quoted_string_rejects_multiline() {
        let mut sc = Scanner::new("\"a\nb\"");
        assert!(sc.read_quoted_string().is_none());
    }
}
