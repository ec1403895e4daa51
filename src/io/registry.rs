//! Point file formats, looked up by file extension.
//!
//! The registry maps an extension to a [`PointParser`]. Anything without a
//! registered parser is rejected with an "unsupported format" error instead
//! of silently loading nothing.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::AppError;
use crate::io::points::{ParsedPoints, parse_csv, parse_txt};

/// A parser for one point file format.
pub trait PointParser {
    /// Short format name used in logs.
    fn name(&self) -> &'static str;

    /// Lowercase extensions (without the dot) this parser handles.
    fn extensions(&self) -> &'static [&'static str];

    fn parse(&self, input: &str) -> ParsedPoints;
}

/// Whitespace-separated `dose survival` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxtParser;

impl PointParser for TxtParser {
    fn name(&self) -> &'static str {
        "txt"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["txt"]
    }

    fn parse(&self, input: &str) -> ParsedPoints {
        parse_txt(input)
    }
}

/// Comma-delimited rows with decimal-comma support.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl PointParser for CsvParser {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["csv"]
    }

    fn parse(&self, input: &str) -> ParsedPoints {
        parse_csv(input)
    }
}

pub struct FormatRegistry {
    parsers: Vec<Box<dyn PointParser>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(TxtParser);
        registry.register(CsvParser);
        registry
    }
}

impl FormatRegistry {
    pub fn empty() -> Self {
        Self { parsers: Vec::new() }
    }

    /// Register a parser. Later registrations win for a shared extension.
    pub fn register(&mut self, parser: impl PointParser + 'static) {
        self.parsers.insert(0, Box::new(parser));
    }

    /// Find the parser for `path`'s extension (case-insensitive).
    pub fn parser_for(&self, path: &Path) -> Result<&dyn PointParser, AppError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| AppError::unsupported_format(path))?;

        self.parsers
            .iter()
            .find(|p| p.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .map(|p| &**p)
            .ok_or_else(|| AppError::unsupported_format(path))
    }

    /// Read and parse a point file.
    ///
    /// Malformed rows are skipped (see [`ParsedPoints::row_errors`]); only an
    /// unsupported extension or an unreadable file is an error.
    pub fn load(&self, path: &Path) -> Result<ParsedPoints, AppError> {
        let parser = self.parser_for(path)?;
        let input = fs::read_to_string(path).map_err(|e| {
            AppError::new(2, format!("Failed to read point file '{}': {e}", path.display()))
        })?;

        let parsed = parser.parse(&input);
        info!(
            path = %path.display(),
            format = parser.name(),
            points = parsed.points.len(),
            skipped = parsed.row_errors.len(),
            "loaded point file"
        );
        Ok(parsed)
    }
}
