use std::fmt;

use crate::export_map::{ExportEntry, ExportForm};

pub fn js_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A single forwarding statement for one resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStatement {
    pub name: String,
    pub from: String,
    pub form: ExportForm,
}

impl ExportStatement {
    pub fn from_entry(entry: &ExportEntry) -> Self {
        Self {
            name: entry.exported_name.clone(),
            from: entry.origin_path.clone(),
            form: entry.form(),
        }
    }
}

impl fmt::Display for ExportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = js_quote(&self.from);
        match &self.form {
            ExportForm::Namespace => write!(f, "export * as {} from {}", self.name, from),
            ExportForm::Default => {
                write!(f, "export {{ default as {} }} from {}", self.name, from)
            }
            ExportForm::Named => write!(f, "export {{ {} }} from {}", self.name, from),
            ExportForm::Renamed { local } => {
                write!(f, "export {{ {} as {} }} from {}", local, self.name, from)
            }
        }
    }
}

/// A re-export-all statement targeting a parametrized sub-request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardForward {
    pub target: String,
}

impl fmt::Display for WildcardForward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "export * from {}", js_quote(&self.target))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    pub prefix: String,
    pub direct_exports: Vec<ExportStatement>,
    pub wildcard_forwards: Vec<WildcardForward>,
}

impl ResolutionResult {
    pub fn render(&self) -> String {
        let mut out = self.prefix.clone();
        for stmt in &self.direct_exports {
            out.push('\n');
            out.push_str(&stmt.to_string());
        }
        for fwd in &self.wildcard_forwards {
            out.push('\n');
            out.push_str(&fwd.to_string());
        }
        out
    }
}
