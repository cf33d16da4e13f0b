use crate::constants::LINE_ENDING;
use std::fmt;

/// A reply sent on the control connection.
///
/// Multi-line replies keep their lines in `text`, separated by `\n`. The
/// first line is sent as `"<code>-<line>"`, the last one as `"<code> <line>"`
/// and everything in between verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u16,
    pub text: String,
    pub multiline: bool,
}

impl Reply {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
            multiline: false,
        }
    }

    pub fn multiline<I, S>(code: u16, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = lines
            .into_iter()
            .map(|line| line.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            code,
            text,
            multiline: true,
        }
    }

    /// Wire form of the reply, line endings included.
    pub fn to_wire(&self) -> String {
        let lines: Vec<&str> = self.text.split('\n').collect();
        if !self.multiline || lines.len() < 2 {
            return format!("{} {}{}", self.code, self.text, LINE_ENDING);
        }

        let last = lines.len() - 1;
        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("{}-{}", self.code, line));
            } else if i == last {
                out.push_str(&format!("{} {}", self.code, line));
            } else {
                out.push_str(line);
            }
            out.push_str(LINE_ENDING);
        }
        out
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire().trim_end())
    }
}
