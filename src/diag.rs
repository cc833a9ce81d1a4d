use std::fmt;

/// Where the tree being rendered came from. Only used to enrich error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagContext {
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl DiagContext {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// `file:line`, or `None` when nothing is known.
    pub fn location(&self) -> Option<String> {
        if self.file.is_none() && self.line.is_none() {
            return None;
        }
        Some(self.to_string())
    }
}

impl fmt::Display for DiagContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}", file, line),
            (Some(file), None) => write!(f, "{}", file),
            (None, Some(line)) => write!(f, "line {}", line),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}
