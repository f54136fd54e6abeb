//! Text color table (palette) parsing.
//!
//! Palettes are line oriented `Keyword: value` files:
//!
//! ```text
//! ; comment
//! Product: BR
//! Units: dBZ
//! Color: 5 0 236 236 1 160 246
//! SolidColor4: 65 255 0 255 255
//! RF: 119 0 125
//! ```
//!
//! `Color` steps blend toward their optional end color, or toward the next
//! step's color when none is given. `SolidColor` lines parse the same way.

use std::io::{BufRead, Read};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use serde::Serialize;
use tracing::debug;

use crate::error::{ColorTableError, ColorTableResult};
use crate::gradient::Rgba;
use crate::lut::interpolate;

/// Default upper bound on a single line, excluding its terminator.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

/// Applied to palette levels when a velocity palette is written in knots.
pub const KNOTS_TO_METERS_PER_SECOND: f32 = 0.514_444_7;

const MAX_LABEL_CHARS: usize = 15;

/// Tunables for [`parse_color_table_with_options`].
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub max_line_length: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// One anchor of a color table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Step {
    /// Physical level at which this step starts.
    pub value: f32,
    pub color: Rgba,
    /// Gradient end color. Without it the step blends toward the next one.
    pub color_end: Option<Rgba>,
}

/// A parsed color table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorTable {
    pub product: String,
    pub units: String,
    pub range_folded_color: Option<Rgba>,
    /// Sorted ascending by `value`.
    pub color_steps: Vec<Step>,
    pub scale: Option<f32>,
    pub offset: Option<f32>,
    pub step: Option<f32>,
    pub unit_conversion_factor: f32,
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            product: String::new(),
            units: String::new(),
            range_folded_color: None,
            color_steps: Vec::new(),
            scale: None,
            offset: None,
            step: None,
            unit_conversion_factor: 1.0,
        }
    }
}

impl ColorTable {
    /// Load a color table from a file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> ColorTableResult<Self> {
        let file = std::fs::File::open(path)?;
        parse_color_table(std::io::BufReader::new(file))
    }

    /// Color at physical `level`, quantized to bytes.
    pub fn color_for(&self, level: f32) -> Rgba {
        Rgba::from_normalized(interpolate(self, level))
    }

    /// Lowest and highest step values, if any steps exist.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        let first = self.color_steps.first()?;
        let last = self.color_steps.last()?;
        Some((first.value, last.value))
    }
}

impl FromStr for ColorTable {
    type Err = ColorTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color_table(s.as_bytes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Statement {
    Product,
    Units,
    Scale,
    Offset,
    Step,
    RangeFolded,
    Color,
    Color4,
    SolidColor,
    SolidColor4,
}

impl Statement {
    fn from_keyword(keyword: &str) -> Option<Self> {
        const KEYWORDS: [(&str, Statement); 10] = [
            ("Product", Statement::Product),
            ("Units", Statement::Units),
            ("Scale", Statement::Scale),
            ("Offset", Statement::Offset),
            ("Step", Statement::Step),
            ("RF", Statement::RangeFolded),
            ("Color", Statement::Color),
            ("Color4", Statement::Color4),
            ("SolidColor", Statement::SolidColor),
            ("SolidColor4", Statement::SolidColor4),
        ];
        KEYWORDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
            .map(|&(_, statement)| statement)
    }
}

/// Parse a color table with default options.
pub fn parse_color_table<R: BufRead>(reader: R) -> ColorTableResult<ColorTable> {
    parse_color_table_with_options(reader, ParseOptions::default())
}

/// Parse a color table. Any error aborts the whole parse.
pub fn parse_color_table_with_options<R: BufRead>(
    mut reader: R,
    options: ParseOptions,
) -> ColorTableResult<ColorTable> {
    let mut table = ColorTable::default();
    let mut raw = Vec::with_capacity(options.max_line_length.min(4096) + 2);
    let mut line_number = 0;

    while read_line(&mut reader, &mut raw, options.max_line_length, line_number + 1)? {
        line_number += 1;
        let text = String::from_utf8_lossy(&raw);
        let line = text.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        parse_statement(&mut table, line, line_number)?;
    }

    table
        .color_steps
        .sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal));

    if table.product.eq_ignore_ascii_case("BV") && table.units.eq_ignore_ascii_case("KT") {
        table.unit_conversion_factor = KNOTS_TO_METERS_PER_SECOND;
    }

    debug!(
        product = %table.product,
        units = %table.units,
        steps = table.color_steps.len(),
        lines = line_number,
        "Parsed color table"
    );

    Ok(table)
}

/// Read one line into `buf` without its LF or CRLF terminator.
///
/// Returns `false` at end of input. Lines longer than `max_len` fail without
/// buffering more than `max_len + 2` bytes.
fn read_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_len: usize,
    line_number: usize,
) -> ColorTableResult<bool> {
    buf.clear();
    let limit = max_len.saturating_add(2) as u64;
    let n = reader.by_ref().take(limit).read_until(b'\n', buf)?;
    if n == 0 {
        return Ok(false);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    if buf.len() > max_len {
        return Err(ColorTableError::LineTooLong {
            line: line_number,
            max: max_len,
        });
    }
    Ok(true)
}

fn parse_statement(table: &mut ColorTable, line: &str, line_number: usize) -> ColorTableResult<()> {
    let (keyword, value) = line
        .split_once(':')
        .ok_or(ColorTableError::MalformedStatement { line: line_number })?;
    let keyword = keyword.trim();
    let value = value.trim();

    let statement =
        Statement::from_keyword(keyword).ok_or_else(|| ColorTableError::UnknownStatementType {
            line: line_number,
            keyword: keyword.to_string(),
        })?;

    let mut tokens = Tokens {
        inner: value.split_whitespace().peekable(),
        line: line_number,
    };

    match statement {
        Statement::Product => table.product = label(value),
        Statement::Units => table.units = label(value),
        Statement::Scale => table.scale = Some(tokens.next_f32()?),
        Statement::Offset => table.offset = Some(tokens.next_f32()?),
        Statement::Step => table.step = Some(tokens.next_f32()?),
        Statement::RangeFolded => table.range_folded_color = Some(tokens.next_rgb()?),
        Statement::Color | Statement::SolidColor => {
            let value = tokens.next_f32()?;
            let color = tokens.next_rgb()?;
            let color_end = if tokens.has_more() {
                Some(tokens.next_rgb()?)
            } else {
                None
            };
            table.color_steps.push(Step {
                value,
                color,
                color_end,
            });
        }
        Statement::Color4 | Statement::SolidColor4 => {
            let value = tokens.next_f32()?;
            let color = tokens.next_rgba()?;
            let color_end = if tokens.has_more() {
                Some(tokens.next_rgba()?)
            } else {
                None
            };
            table.color_steps.push(Step {
                value,
                color,
                color_end,
            });
        }
    }
    Ok(())
}

fn label(value: &str) -> String {
    value.chars().take(MAX_LABEL_CHARS).collect()
}

/// Whitespace tokenizer that reports errors against a line number.
struct Tokens<'a> {
    inner: std::iter::Peekable<SplitWhitespace<'a>>,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn has_more(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    fn next_token(&mut self) -> ColorTableResult<&'a str> {
        self.inner
            .next()
            .ok_or(ColorTableError::MissingToken { line: self.line })
    }

    fn next_f32(&mut self) -> ColorTableResult<f32> {
        let token = self.next_token()?;
        token.parse().map_err(|_| self.invalid(token))
    }

    fn next_channel(&mut self) -> ColorTableResult<u8> {
        let token = self.next_token()?;
        token.parse().map_err(|_| self.invalid(token))
    }

    fn next_rgb(&mut self) -> ColorTableResult<Rgba> {
        Ok(Rgba::opaque(
            self.next_channel()?,
            self.next_channel()?,
            self.next_channel()?,
        ))
    }

    fn next_rgba(&mut self) -> ColorTableResult<Rgba> {
        Ok(Rgba::new(
            self.next_channel()?,
            self.next_channel()?,
            self.next_channel()?,
            self.next_channel()?,
        ))
    }

    fn invalid(&self, token: &str) -> ColorTableError {
        ColorTableError::InvalidNumericToken {
            line: self.line,
            token: token.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ColorTableResult<ColorTable> {
        text.parse()
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let table = parse("product: BR\nUNITS: dBZ\ncolor4: 10 1 2 3 4\n").unwrap();
        assert_eq!(table.product, "BR");
        assert_eq!(table.units, "dBZ");
        assert_eq!(table.color_steps[0].color, Rgba::new(1, 2, 3, 4));
    }

    #[test]
    fn test_labels_truncated() {
        let table = parse("Product: ABCDEFGHIJKLMNOPQRSTUVWXYZ\n").unwrap();
        assert_eq!(table.product, "ABCDEFGHIJKLMNO");
    }

    #[test]
    fn test_scalars() {
        let table = parse("Scale: 2.5\nOffset: -10\nStep: 5\n").unwrap();
        assert_eq!(table.scale, Some(2.5));
        assert_eq!(table.offset, Some(-10.0));
        assert_eq!(table.step, Some(5.0));
    }

    #[test]
    fn test_collapsed_separators_and_tabs() {
        let table = parse("Color:   10 \t 255    0   0\n").unwrap();
        assert_eq!(table.color_steps[0].color, Rgba::opaque(255, 0, 0));
    }

    #[test]
    fn test_missing_colon() {
        assert!(matches!(
            parse("Product BR\n"),
            Err(ColorTableError::MalformedStatement { line: 1 })
        ));
    }

    #[test]
    fn test_partial_end_color_is_missing_token() {
        assert!(matches!(
            parse("Color: 10 1 2 3 4 5\n"),
            Err(ColorTableError::MissingToken { line: 1 })
        ));
    }

    #[test]
    fn test_channel_out_of_range() {
        match parse("RF: 300 0 0\n") {
            Err(ColorTableError::InvalidNumericToken { line, token }) => {
                assert_eq!(line, 1);
                assert_eq!(token, "300");
            }
            other => panic!("expected InvalidNumericToken, got {:?}", other),
        }
    }

    #[test]
    fn test_line_numbers_count_comments() {
        assert!(matches!(
            parse("; one\n# two\n\nBogus: 1\n"),
            Err(ColorTableError::UnknownStatementType { line: 4, .. })
        ));
    }

    #[test]
    fn test_value_range() {
        let table = parse("Color: 20 0 0 0\nColor: -5 0 0 0\n").unwrap();
        assert_eq!(table.value_range(), Some((-5.0, 20.0)));
        assert_eq!(ColorTable::default().value_range(), None);
    }
}
