/// A byte range in the source text, plus the 1-based line/column of its
/// start, for pointing diagnostics at source text.
///
/// mica evaluates one source unit at a time (a REPL line or a single file),
/// so unlike a multi-file compiler's span there is no `FileId` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: u32, end: u32, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// A span covering nothing in particular, used for synthesized nodes
    /// that have no direct source origin.
    pub fn dummy() -> Self {
        Self::default()
    }

    pub fn to(self, other: Span) -> Span {
        Span::new(
            self.start.min(other.start),
            self.end.max(other.end),
            self.line,
            self.column,
        )
    }
}
