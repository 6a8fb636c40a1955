//! ANSI color support for terminal output

use crate::diagnostics::Severity;

/// ANSI color codes
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GREEN: &str = "\x1b[32m";
}

/// Determine if color should be used based on mode and environment
pub fn should_use_color(mode: &str) -> bool {
    match mode {
        "always" => true,
        "never" => false,
        _ => {
            // Diagnostics go to stderr
            atty::is(atty::Stream::Stderr) && std::env::var("NO_COLOR").is_err()
        }
    }
}

pub(crate) fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => ansi::RED,
        Severity::Warning => ansi::YELLOW,
        Severity::Info => ansi::CYAN,
    }
}

/// Wrap `text` in `color` when enabled
pub(crate) fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}{}", ansi::BOLD, color, text, ansi::RESET)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_modes() {
        assert!(should_use_color("always"));
        assert!(!should_use_color("never"));
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("error", ansi::RED, false), "error");
        assert_eq!(paint("error", ansi::RED, true), "\x1b[1m\x1b[31merror\x1b[0m");
    }
}
