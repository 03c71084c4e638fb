use std::fmt;

/// Newline separated status lines shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayText(String);

impl DisplayText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn push_line(&mut self, line: &str) {
        if !self.0.is_empty() {
            self.0.push('\n');
        }
        self.0.push_str(line);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Published after every change to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub generation: u64,
    pub text: DisplayText,
    pub visible: bool,
    pub pending: usize,
}

impl DisplaySnapshot {
    pub fn is_settled(&self) -> bool {
        self.pending == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_line_separates_with_newline() {
        let mut text = DisplayText::default();
        text.push_line("apple - 95.0%");
        text.push_line("healthy - 88.0%");
        assert_eq!(text.as_str(), "apple - 95.0%\nhealthy - 88.0%");
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_clear_resets_text() {
        let mut text = DisplayText::new("choose or take a photo");
        text.clear();
        assert!(text.is_empty());
        text.push_line("carrot - 92.0%");
        assert_eq!(text.as_str(), "carrot - 92.0%");
    }
}
