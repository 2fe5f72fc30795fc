//! Styled text surface
//!
//! Renderers write styled runs and hyperlinks at an explicit 2D cursor
//! that they advance themselves; the canvas only grows to fit what was
//! written.

use super::style::TextStyle;

/// Cursor position on the canvas (column, row)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

/// A styled run of text placed at a column
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub x: usize,
    pub style: TextStyle,
    pub text: String,
}

/// One canvas row
#[derive(Debug, Clone, Default)]
pub struct Line {
    runs: Vec<StyledRun>,
}

impl Line {
    /// Runs on this row, in emission order
    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }
}

/// A registered hyperlink
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub x: usize,
    pub y: usize,
    pub label: String,
    pub target: String,
}

/// The text surface renderers draw on
#[derive(Debug, Clone, Default)]
pub struct TextCanvas {
    lines: Vec<Line>,
    links: Vec<Link>,
    /// Write position; advanced explicitly by renderers
    pub cursor: Cursor,
    link_style: TextStyle,
}

impl TextCanvas {
    /// Create an empty canvas
    pub fn new() -> Self {
        Self {
            link_style: TextStyle {
                underline: true,
                ..TextStyle::default()
            },
            ..Self::default()
        }
    }

    /// Emit a styled run at the cursor, advancing the column
    ///
    /// Embedded newlines advance the row and reset the column, as they
    /// would on a terminal.
    pub fn emit_text(&mut self, style: &TextStyle, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut segments = text.split('\n');
        if let Some(first) = segments.next() {
            self.emit_segment(style, first);
        }
        for segment in segments {
            self.cursor.y += 1;
            self.cursor.x = 0;
            self.emit_segment(style, segment);
        }
    }

    fn emit_segment(&mut self, style: &TextStyle, segment: &str) {
        if segment.is_empty() {
            return;
        }
        let cursor = self.cursor;
        self.line_mut(cursor.y).runs.push(StyledRun {
            x: cursor.x,
            style: style.clone(),
            text: segment.to_string(),
        });
        self.cursor.x += segment.chars().count();
    }

    /// Register a hyperlink at the cursor and emit its label
    pub fn emit_link(&mut self, label: &str, target: &str) {
        self.links.push(Link {
            x: self.cursor.x,
            y: self.cursor.y,
            label: label.to_string(),
            target: target.to_string(),
        });
        let style = self.link_style.clone();
        self.emit_text(&style, label);
    }

    fn line_mut(&mut self, y: usize) -> &mut Line {
        if self.lines.len() <= y {
            self.lines.resize_with(y + 1, Line::default);
        }
        &mut self.lines[y]
    }

    /// Canvas rows, top to bottom
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Registered hyperlinks, in emission order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Number of rows written to
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// True if nothing was ever emitted
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.links.is_empty()
    }

    /// Plain-text projection of one row, columns padded with spaces
    pub fn line_text(&self, y: usize) -> String {
        let mut out = String::new();
        let mut column = 0;
        let Some(line) = self.lines.get(y) else {
            return out;
        };
        let mut runs: Vec<&StyledRun> = line.runs.iter().collect();
        runs.sort_by_key(|run| run.x);
        for run in runs {
            while column < run.x {
                out.push(' ');
                column += 1;
            }
            out.push_str(&run.text);
            column += run.text.chars().count();
        }
        out
    }

    /// Plain-text projection of the whole canvas
    pub fn to_text(&self) -> String {
        (0..self.lines.len())
            .map(|y| self.line_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
