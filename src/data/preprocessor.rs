// ============================================================
// Layer 4 - Text Preprocessor
// ============================================================
// Normalises hand-supplied candidate lists before they are
// compared. Pasted or file-based lists carry stray formatting
// that would otherwise count as characters in the chrF n-gram
// tables:
//   - Non-breaking spaces (U+00A0)
//   - Zero-width spaces (U+200B) and byte order marks
//   - Tabs, carriage returns and line breaks
//   - Runs of spaces
//
// Every candidate is a single line after cleaning.

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one candidate into a single trimmed line with
    /// single spaces between words.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true;

        for c in text.chars() {
            let c = match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() || c.is_whitespace() => ' ',
                c => c,
            };
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.truncate(out.trim_end().len());
        out
    }

    /// Split a newline-separated candidate list, cleaning each
    /// line and dropping the ones left empty.
    pub fn split_candidates(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(|line| self.clean(line))
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
