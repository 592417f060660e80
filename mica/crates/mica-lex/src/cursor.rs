/// A byte-position cursor over source text, tracking line/column for span
/// reporting.
///
/// mica identifiers, keywords, and operators are ASCII-only (see the source
/// encoding note in the crate docs), so the cursor indexes by byte offset
/// rather than by `char`. There is no need to pay for UTF-8 boundary
/// decoding on every step the way a general-purpose character cursor would.
/// String literal *bodies* may still contain arbitrary UTF-8 bytes; the
/// cursor does not care, since it only ever compares single bytes against
/// ASCII punctuation.
pub struct Cursor<'a> {
    source: &'a [u8],
    /// Byte offset of `ch`.
    position: usize,
    /// Byte offset of the character after `ch`.
    read_position: usize,
    /// Current byte, or `0` at end of input.
    ch: u8,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut cursor = Self {
            source: source.as_bytes(),
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
            column: 0,
        };
        cursor.advance();
        cursor
    }

    /// The byte under the cursor, or `0` at end of input.
    pub fn current(&self) -> u8 {
        self.ch
    }

    /// The byte one past the cursor, or `0` at end of input.
    pub fn peek(&self) -> u8 {
        self.byte_at(self.read_position)
    }

    fn byte_at(&self, pos: usize) -> u8 {
        self.source.get(pos).copied().unwrap_or(0)
    }

    /// Consumes the current byte and moves the cursor to the next one.
    pub fn advance(&mut self) {
        if self.ch == b'\n' {
            self.line += 1;
            self.column = 0;
        } else if self.position < self.source.len() {
            self.column += 1;
        }
        self.ch = self.byte_at(self.read_position);
        self.position = self.read_position;
        self.read_position += 1;
    }

    pub fn is_at_end(&self) -> bool {
        self.ch == 0
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column.max(1)
    }

    /// The source text between two byte offsets. Panics if the range does
    /// not land on a char boundary, which cannot happen for the ASCII
    /// delimiters callers slice between (identifiers, digit runs, the
    /// quotes around a string).
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        std::str::from_utf8(&self.source[start..end]).expect("slice crosses a char boundary")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_byte_by_byte() {
        let mut c = Cursor::new("ab");
        assert_eq!(c.current(), b'a');
        c.advance();
        assert_eq!(c.current(), b'b');
        c.advance();
        assert!(c.is_at_end());
    }

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let mut c = Cursor::new("ab\ncd");
        assert_eq!((c.line(), c.column()), (1, 1));
        c.advance(); // now on 'b'
        assert_eq!((c.line(), c.column()), (1, 2));
        c.advance(); // now on '\n'
        assert_eq!((c.line(), c.column()), (1, 3));
        c.advance(); // now on 'c', first column of line 2
        assert_eq!((c.line(), c.column()), (2, 1));
        c.advance(); // now on 'd'
        assert_eq!((c.line(), c.column()), (2, 2));
    }

    #[test]
    fn peek_does_not_consume() {
        let c = Cursor::new("xy");
        assert_eq!(c.current(), b'x');
        assert_eq!(c.peek(), b'y');
        assert_eq!(c.current(), b'x');
    }

    #[test]
    fn slices_between_offsets() {
        let c = Cursor::new("let x");
        assert_eq!(c.slice(0, 3), "let");
    }
}
