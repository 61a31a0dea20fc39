// src/parser.rs

/// A piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// `raw` is the full `${...}` text, `path` the untrimmed capture.
    Placeholder { raw: &'a str, path: &'a str },
}

/// Cursor over template text. Recognises `${path}` where `path` is one or
/// more characters other than `}`; anything else is literal text.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Split the whole input into text runs and placeholders, in order.
    pub fn placeholders(mut self) -> Vec<Segment<'a>> {
        let mut out = Vec::new();
        let mut text_start = self.i;
        while !self.eof() {
            let start = self.i;
            if let Some(path) = self.try_placeholder() {
                if text_start < start {
                    out.push(Segment::Text(&self.s[text_start..start]));
                }
                out.push(Segment::Placeholder {
                    raw: &self.s[start..self.i],
                    path,
                });
                text_start = self.i;
                continue;
            }
            self.advance();
        }
        if text_start < self.s.len() {
            out.push(Segment::Text(&self.s[text_start..]));
        }
        out
    }

    // On success the cursor sits after the closing brace; otherwise it is untouched.
    fn try_placeholder(&mut self) -> Option<&'a str> {
        if !self.peek_str("${") {
            return None;
        }
        let start = self.i;
        self.i += 2;
        match self.capture_until('}') {
            Some(path) if !path.is_empty() => {
                self.i += 1;
                Some(path)
            }
            _ => {
                self.i = start;
                None
            }
        }
    }

    pub fn capture_until(&mut self, end: char) -> Option<&'a str> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == end {
                return Some(&self.s[start..self.i]);
            }
            self.i += c.len_utf8();
        }
        self.i = start;
        None
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.i += c.len_utf8();
        }
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}
