/// Line-addressed view of a text document.
///
/// Lines are split on `'\n'` only, so joining them back with `'\n'` reproduces the
/// original bytes exactly: carriage returns stay attached to their line and a
/// trailing newline shows up as a final empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        // WHY: a document always has at least one (possibly empty) line
        if lines.is_empty() {
            return Self { lines: vec![String::new()] };
        }
        Self { lines }
    }

    /// Number of lines, counting a trailing empty line after a final newline
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 1-indexed line access
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    /// 1-indexed mutable line access
    pub fn line_mut(&mut self, number: usize) -> Option<&mut String> {
        number.checked_sub(1).and_then(move |idx| self.lines.get_mut(idx))
    }

    pub fn contains_line(&self, number: usize) -> bool {
        number >= 1 && number <= self.lines.len()
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}
