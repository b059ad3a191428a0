//! HCL 文本工具

/// Escape text for use inside an HCL quoted string.
///
/// Template sequences are doubled so values are never interpolated.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

/// `value` as an HCL string literal.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

/// Record value as an HCL string literal.
///
/// Character-string values (TXT, SPF) lose one surrounding pair of quotes;
/// the provider adds it back, so inner quoting round-trips.
pub fn quote_value(value: &str, text: bool) -> String {
    let inner = if text {
        value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value)
    } else {
        value
    };
    quote(inner)
}

/// Line buffer with two-space indentation.
#[derive(Debug, Default)]
pub struct Lines {
    lines: Vec<String>,
}

impl Lines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, depth: usize, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", "  ".repeat(depth), text.as_ref()));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Joined text, ending with exactly one newline.
    pub fn finish(mut self) -> String {
        while self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}
