//! Terminal colors for command output.

use colored::{Color, Colorize};
use std::io::IsTerminal;

/// Colorizer that can be passed around to output code.
///
/// A disabled painter returns its input unchanged. `NO_COLOR` is honored by
/// `colored` itself.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enabled when stdout is a terminal.
    pub fn auto() -> Self {
        Self::new(std::io::stdout().is_terminal())
    }

    /// Enabled when stderr is a terminal.
    pub fn auto_stderr() -> Self {
        Self::new(std::io::stderr().is_terminal())
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn blue(&self, s: &str) -> String {
        self.paint(s, Color::Blue)
    }

    pub fn red(&self, s: &str) -> String {
        self.paint(s, Color::Red)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.paint(s, Color::Yellow)
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(s, Color::Green)
    }

    pub fn white(&self, s: &str) -> String {
        self.paint(s, Color::White)
    }

    pub fn cyan(&self, s: &str) -> String {
        self.paint(s, Color::Cyan)
    }

    pub fn magenta(&self, s: &str) -> String {
        self.paint(s, Color::Magenta)
    }

    pub fn bold(&self, s: &str) -> String {
        if self.enabled {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint(&self, s: &str, color: Color) -> String {
        if self.enabled {
            s.color(color).to_string()
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_painter_is_plain() {
        let p = Painter::new(false);
        assert_eq!(p.red("error"), "error");
        assert_eq!(p.cyan("path"), "path");
        assert_eq!(p.bold("x"), "x");
        assert!(!p.enabled());
    }

    #[test]
    fn enabled_painter_emits_escapes() {
        colored::control::set_override(true);
        let p = Painter::new(true);
        let red = p.red("error");
        assert!(red.contains("error"));
        assert!(red.starts_with("\x1b["));
        assert_ne!(p.green("ok"), p.blue("ok"));
    }
}
