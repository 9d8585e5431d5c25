use std::fmt;

/// A half-open range `[start, end)` of character offsets into a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    pub fn with_length(start: usize, length: usize) -> Self {
        Self {
            start,
            end: start + length,
        }
    }

    /// Bounding span of two spans. A child that sits before `start` (a
    /// synthesized token) never makes the span inverted.
    pub fn cover(first: Span, last: Span) -> Self {
        Self {
            start: first.start,
            end: last.end.max(first.start),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLine {
    pub start: usize,
    pub length: usize,
    pub length_including_line_break: usize,
}

impl TextLine {
    pub fn span(&self) -> Span {
        Span::with_length(self.start, self.length)
    }
}

/// Immutable source text addressed by character offset.
#[derive(Debug, Clone)]
pub struct SourceText {
    chars: Vec<char>,
    lines: Vec<TextLine>,
}

impl SourceText {
    pub fn from(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let lines = parse_lines(&chars);
        Self { chars, lines }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`, or `'\0'` past the end.
    pub fn char_at(&self, index: usize) -> char {
        self.chars.get(index).copied().unwrap_or('\0')
    }

    pub fn slice(&self, span: Span) -> String {
        let end = span.end.min(self.chars.len());
        let start = span.start.min(end);
        self.chars[start..end].iter().collect()
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Index of the line containing `position`.
    pub fn line_index(&self, position: usize) -> usize {
        let mut lower = 0usize;
        let mut upper = self.lines.len();

        while lower < upper {
            let index = lower + (upper - lower) / 2;
            let start = self.lines[index].start;

            if start == position {
                return index;
            } else if start > position {
                upper = index;
            } else {
                lower = index + 1;
            }
        }

        lower.saturating_sub(1)
    }

    /// One-based line and column of `position`.
    pub fn line_column(&self, position: usize) -> (usize, usize) {
        let index = self.line_index(position);
        let line = self.lines[index];
        (index + 1, position.saturating_sub(line.start) + 1)
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text: String = self.chars.iter().collect();
        write!(f, "{}", text)
    }
}

fn parse_lines(chars: &[char]) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut position = 0;
    let mut line_start = 0;

    while position < chars.len() {
        let width = line_break_width(chars, position);
        if width == 0 {
            position += 1;
        } else {
            lines.push(TextLine {
                start: line_start,
                length: position - line_start,
                length_including_line_break: position - line_start + width,
            });
            position += width;
            line_start = position;
        }
    }

    lines.push(TextLine {
        start: line_start,
        length: position - line_start,
        length_including_line_break: position - line_start,
    });
    lines
}

fn line_break_width(chars: &[char], position: usize) -> usize {
    let c = chars[position];
    let next = chars.get(position + 1).copied().unwrap_or('\0');
    match (c, next) {
        ('\r', '\n') => 2,
        ('\r', _) | ('\n', _) => 1,
        _ => 0,
    }
}
