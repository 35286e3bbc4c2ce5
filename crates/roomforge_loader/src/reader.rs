//! Line-oriented reader shared by the `.rm1` and `.rm2` parsers.

use roomforge_core::{Grid, MirrorOps};

use crate::ParseError;

/// Walks the lines of a file, keeping the 1-based number of the last line read.
pub(crate) struct LineReader<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> LineReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
        }
    }

    /// Number of the last line read, 0 before the first.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn next_line(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        self.line += 1;
        self.lines
            .next()
            .ok_or(ParseError::UnexpectedEof {
                line: self.line,
                expected,
            })
    }

    pub fn next_int(&mut self, what: &'static str) -> Result<i64, ParseError> {
        let raw = self.next_line(what)?;
        raw.trim().parse().map_err(|_| ParseError::InvalidNumber {
            line: self.line,
            what,
            found: raw.to_string(),
        })
    }

    /// A strictly positive dimension.
    pub fn next_size(&mut self, what: &'static str) -> Result<u32, ParseError> {
        let line = self.line + 1;
        let value = self.next_int(what)?;
        u32::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .ok_or(ParseError::InvalidNumber {
                line,
                what,
                found: value.to_string(),
            })
    }

    /// The mirror flag line. An empty line means no variants.
    pub fn next_flags(&mut self) -> Result<MirrorOps, ParseError> {
        Ok(MirrorOps::parse(self.next_line("mirror flags")?))
    }

    /// `height` rows, each cut down to its first `width` symbols.
    pub fn next_grid(&mut self, width: u32, height: u32) -> Result<Grid, ParseError> {
        let mut rows = Vec::with_capacity(height as usize);
        for _ in 0..height {
            let raw = self.next_line("template row")?;
            let row: String = raw.chars().take(width as usize).collect();
            let found = row.chars().count();
            if found < width as usize {
                return Err(ParseError::ShortRow {
                    line: self.line,
                    found,
                    expected: width as usize,
                });
            }
            rows.push(row);
        }
        Grid::from_rows(&rows).ok_or(ParseError::ShortRow {
            line: self.line,
            found: 0,
            expected: width as usize,
        })
    }

    /// Check the leading format number.
    pub fn expect_format(&mut self, expected: i64) -> Result<(), ParseError> {
        let found = self.next_int("format number")?;
        if found != expected {
            return Err(ParseError::UnsupportedFormat { found, expected });
        }
        Ok(())
    }
}
