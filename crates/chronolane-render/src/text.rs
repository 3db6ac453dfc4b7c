use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { font_size: 14.0 }
    }
}

impl TextStyle {
    pub fn sized(font_size: f64) -> Self {
        Self { font_size }
    }
}

/// Extent of a text block; `height` covers every line, so `measure("")` is one line tall.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-free measurer: display columns times a per-column factor.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn line_height(&self, font_size: f64) -> f64 {
        let factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };
        font_size.max(1.0) * factor
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };

        let lines: Vec<&str> = text.split('\n').collect();
        let font_size = style.font_size.max(1.0);
        let max_cols = lines.iter().map(|l| l.width()).max().unwrap_or(0);

        TextMetrics {
            width: max_cols as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * self.line_height(font_size),
        }
    }
}

/// Greedy word wrap to `max_width`. Words wider than a line get a line of their own.
pub fn wrap_lines(
    text: &str,
    max_width: f64,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut cur = String::new();
        for word in paragraph.split_whitespace() {
            if cur.is_empty() {
                cur.push_str(word);
                continue;
            }
            let candidate = format!("{cur} {word}");
            if measurer.measure(&candidate, style).width > max_width {
                lines.push(std::mem::take(&mut cur));
                cur.push_str(word);
            } else {
                cur = candidate;
            }
        }
        lines.push(cur);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Keeps at most `max_lines` lines; when lines are dropped the last kept line is shortened until
/// it fits `max_width` with a trailing ellipsis.
pub fn clamp_lines(
    mut lines: Vec<String>,
    max_lines: usize,
    max_width: f64,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = ellipsize(last, max_width, style, measurer);
    }
    lines
}

/// `text` followed by `…`, dropping trailing characters until the result fits `max_width`.
pub fn ellipsize(text: &str, max_width: f64, style: &TextStyle, measurer: &dyn TextMeasurer) -> String {
    let mut kept: Vec<char> = text.trim_end().chars().collect();
    loop {
        let candidate = format!("{}…", kept.iter().collect::<String>().trim_end());
        if kept.is_empty() || measurer.measure(&candidate, style).width <= max_width {
            return candidate;
        }
        kept.pop();
    }
}
