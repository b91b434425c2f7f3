use colored::Colorize;

use flowcheck_common::{Diagnostic, DiagnosticCategory};

/// Renders diagnostics for the terminal.
///
/// Positions are byte offsets into the original source; the serialized
/// program carries no text to map them to lines.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = self.format_location(&diagnostic.file, diagnostic.start, diagnostic.length);
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        for related in &diagnostic.related_information {
            output.push_str("\n  ");
            output.push_str(&self.format_location(&related.file, related.start, related.length));
            output.push_str(": ");
            output.push_str(&related.message_text);
        }
        output
    }

    fn format_location(&self, file: &str, start: u32, length: u32) -> String {
        let file = if file.is_empty() { "<input>" } else { file };
        let location = if length == 0 {
            format!("{file}@{start}")
        } else {
            format!("{file}@{start}..{}", start.saturating_add(length))
        };
        if self.color {
            location.cyan().to_string()
        } else {
            location
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("FC{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

#[cfg(test)]
#[path = "../tests/reporter.rs"]
mod tests;
