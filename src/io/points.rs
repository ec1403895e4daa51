//! Point file parsing.
//!
//! Both formats hold one `(dose, survival)` observation per line/row.
//! Parsing never fails as a whole: a line that does not yield exactly two
//! floats is recorded as a [`RowError`], logged, and skipped.

use tracing::warn;

use crate::domain::DosePoints;

/// A line/row that was skipped during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line number.
    pub line: usize,
    pub content: String,
    pub message: String,
}

/// Parse output: the points that parsed plus the rows that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPoints {
    pub points: DosePoints,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl ParsedPoints {
    fn accept(&mut self, dose: f64, survival: f64) {
        self.rows_read += 1;
        self.points.push(dose, survival);
    }

    fn reject(&mut self, line: usize, content: impl Into<String>, message: impl Into<String>) {
        let err = RowError {
            line,
            content: content.into(),
            message: message.into(),
        };
        warn!(line = err.line, content = %err.content, "wrong input: {}", err.message);
        self.rows_read += 1;
        self.row_errors.push(err);
    }
}

/// Parse whitespace-separated `dose survival` lines.
pub fn parse_txt(input: &str) -> ParsedPoints {
    let mut out = ParsedPoints::default();

    for (idx, line) in input.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match parse_pair(&fields, |s| s.to_string()) {
            Ok((dose, survival)) => out.accept(dose, survival),
            Err(message) => out.reject(idx + 1, line, message),
        }
    }

    out
}

/// Parse comma-delimited `dose,survival` rows.
///
/// Fields may be quoted, and a comma inside a field is read as a decimal
/// separator: `"1,5","0,002"` parses to `(1.5, 0.002)`.
pub fn parse_csv(input: &str) -> ParsedPoints {
    let mut out = ParsedPoints::default();

    // The csv reader drops empty lines silently; report them like any other bad row.
    for (idx, line) in input.lines().enumerate() {
        if line.is_empty() {
            out.reject(idx + 1, "[]", "expected 2 values, got 0");
        }
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .quote(b'"')
        .from_reader(input.as_bytes());

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
                out.reject(line, "", format!("CSV parse error: {e}"));
                continue;
            }
        };

        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        let fields: Vec<&str> = record.iter().collect();
        match parse_pair(&fields, |s| s.replace(',', ".")) {
            Ok((dose, survival)) => out.accept(dose, survival),
            Err(message) => out.reject(line, format!("{fields:?}"), message),
        }
    }

    out.row_errors.sort_by_key(|e| e.line);
    out
}

fn parse_pair(fields: &[&str], normalize: impl Fn(&str) -> String) -> Result<(f64, f64), String> {
    let &[dose, survival] = fields else {
        return Err(format!("expected 2 values, got {}", fields.len()));
    };
    Ok((parse_f64(&normalize(dose))?, parse_f64(&normalize(survival))?))
}

fn parse_f64(s: &str) -> Result<f64, String> {
    let s = s.trim();
    s.parse::<f64>()
        .map_err(|e| format!("invalid number '{s}': {e}"))
}
