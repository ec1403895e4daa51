//! Parameter inputs: a slider position paired with an editable text field.
//!
//! The text is what the model reads. Moving the slider rewrites the text as
//! `position / float_shift`. Committing text validates it first:
//!
//! - accepted only if, after removing at most one `.`, the rest is ASCII digits
//! - rejected text is reset to `"0"`
//! - accepted text moves the slider to `trunc(value * float_shift)`, clamped to the
//!   slider range; if that changes the position the text is rewritten from it,
//!   otherwise the typed text is kept as-is

use crate::config::SliderRange;

/// Text shown after a rejected edit.
pub const RESET_TEXT: &str = "0";

/// Whether `text` is a plain non-negative decimal (`"12"`, `"0.5"`, `"3."`, `".5"`).
pub fn is_valid_number_text(text: &str) -> bool {
    let stripped = text.replacen('.', "", 1);
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

/// Parse parameter text, `None` when it fails [`is_valid_number_text`].
pub fn parse_param_text(text: &str) -> Option<f64> {
    if !is_valid_number_text(text) {
        return None;
    }
    text.parse().ok()
}

/// Display text for a slider position.
pub fn position_to_text(position: i64, float_shift: f64) -> String {
    format!("{}", position as f64 / float_shift)
}

/// Outcome of committing a text edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommit {
    /// Text was valid; the slider may have moved.
    Accepted,
    /// Text was invalid and was reset to [`RESET_TEXT`].
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamField {
    position: i64,
    text: String,
    range: SliderRange,
    float_shift: f64,
}

impl ParamField {
    pub fn new(position: i64, range: SliderRange, float_shift: f64) -> Self {
        let position = range.clamp(position);
        Self {
            position,
            text: position_to_text(position, float_shift),
            range,
            float_shift,
        }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn range(&self) -> SliderRange {
        self.range
    }

    /// Numeric value of the current text.
    ///
    /// Text is only ever slider-generated, validated, or reset, so it parses.
    pub fn value(&self) -> f64 {
        self.text.parse().unwrap_or(0.0)
    }

    /// Move the slider; the text follows.
    pub fn set_position(&mut self, position: i64) {
        self.position = self.range.clamp(position);
        self.text = position_to_text(self.position, self.float_shift);
    }

    /// Set an exact value; the slider moves to the nearest position below it.
    pub fn set_value(&mut self, value: f64) {
        self.text = format!("{value}");
        self.position = self.range.clamp((value * self.float_shift).trunc() as i64);
    }

    pub fn step(&mut self, delta: i64) {
        self.set_position(self.position.saturating_add(delta));
    }

    /// Commit an edited text value.
    pub fn commit_text(&mut self, text: &str) -> TextCommit {
        if !is_valid_number_text(text) {
            self.text = RESET_TEXT.to_string();
            return TextCommit::Reset;
        }

        self.text = text.to_string();
        let scaled = (self.value() * self.float_shift).trunc() as i64;
        let position = self.range.clamp(scaled);
        if position != self.position {
            self.set_position(position);
        }
        TextCommit::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: SliderRange = SliderRange { min: 0, max: 1000 };

    #[test]
    fn number_text_rules() {
        for ok in ["0", "12", "0.5", "3.", ".5", "007"] {
            assert!(is_valid_number_text(ok), "{ok}");
        }
        for bad in ["", ".", "-1", "1.2.3", "1e3", " 1", "abc", "1,5", "+2", "١"] {
            assert!(!is_valid_number_text(bad), "{bad}");
        }
    }

    #[test]
    fn parse_param_text_follows_validation() {
        assert_eq!(parse_param_text("2.5"), Some(2.5));
        assert_eq!(parse_param_text(".5"), Some(0.5));
        assert_eq!(parse_param_text("-1"), None);
        assert_eq!(parse_param_text("1e3"), None);
    }

    #[test]
    fn set_value_keeps_exact_text() {
        let mut field = ParamField::new(30, RANGE, 100.0);
        field.set_value(25.0);
        assert_eq!(field.text(), "25");
        assert_eq!(field.value(), 25.0);
        assert_eq!(field.position(), 1000);
    }

    #[test]
    fn slider_drives_text() {
        let mut field = ParamField::new(30, RANGE, 100.0);
        assert_eq!(field.text(), "0.3");
        field.step(5);
        assert_eq!(field.position(), 35);
        assert_eq!(field.text(), "0.35");
        field.set_position(0);
        assert_eq!(field.text(), "0");
        assert_eq!(field.value(), 0.0);
    }

    #[test]
    fn invalid_text_resets_to_zero() {
        let mut field = ParamField::new(30, RANGE, 100.0);
        assert_eq!(field.commit_text("-1"), TextCommit::Reset);
        assert_eq!(field.text(), "0");
        assert_eq!(field.value(), 0.0);
        assert_eq!(field.position(), 30);
    }

    #[test]
    fn valid_text_moves_slider() {
        let mut field = ParamField::new(30, RANGE, 100.0);
        assert_eq!(field.commit_text("2.5"), TextCommit::Accepted);
        assert_eq!(field.position(), 250);
        assert_eq!(field.text(), "2.5");
        assert_eq!(field.value(), 2.5);
    }

    #[test]
    fn sub_step_text_is_kept_when_slider_does_not_move() {
        let mut field = ParamField::new(30, RANGE, 100.0);
        field.commit_text("0.305");
        assert_eq!(field.position(), 30);
        assert_eq!(field.text(), "0.305");
        assert!((field.value() - 0.305).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_text_is_clamped() {
        let mut field = ParamField::new(30, RANGE, 100.0);
        field.commit_text("50");
        assert_eq!(field.position(), 1000);
        assert_eq!(field.text(), "10");
    }

    #[test]
    fn steps_stay_in_range() {
        let mut field = ParamField::new(0, RANGE, 100.0);
        field.step(-1);
        assert_eq!(field.position(), 0);
        field.set_position(5000);
        assert_eq!(field.position(), 1000);
    }
}
