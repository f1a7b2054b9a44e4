//! Console printer with spectral ANSI colors.

use serde::{Deserialize, Serialize};

/// Colors available for printed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterColor {
    Teal,
    Blue,
    Purple,
    Green,
    Gray,
    Bold,
    Dim,
    BoldGreen,
}

impl PrinterColor {
    /// ANSI escape code for this color.
    fn ansi_code(&self) -> &'static str {
        match self {
            Self::Teal => "\x1b[96m",
            Self::Blue => "\x1b[94m",
            Self::Purple => "\x1b[95m",
            Self::Green => "\x1b[92m",
            Self::Gray => "\x1b[90m",
            Self::Bold => "\x1b[1m",
            Self::Dim => "\x1b[2m",
            Self::BoldGreen => "\x1b[1;92m",
        }
    }
}

/// ANSI reset code.
const RESET: &str = "\x1b[0m";

/// Cycle used for multi-line banners.
pub const BANNER_CYCLE: [PrinterColor; 5] = [
    PrinterColor::Teal,
    PrinterColor::Blue,
    PrinterColor::Purple,
    PrinterColor::Green,
    PrinterColor::Teal,
];

/// Printer for console output. With `plain` set, colors are suppressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    pub plain: bool,
}

impl Printer {
    pub fn new(plain: bool) -> Self {
        Self { plain }
    }

    /// Wrap `content` in the color's escape codes.
    pub fn paint(&self, content: &str, color: PrinterColor) -> String {
        if self.plain {
            content.to_string()
        } else {
            format!("{}{}{}", color.ansi_code(), content, RESET)
        }
    }

    /// Print a message with the specified color.
    pub fn print(&self, content: &str, color: PrinterColor) {
        println!("{}", self.paint(content, color));
    }

    /// Print each line of `banner`, cycling through [`BANNER_CYCLE`].
    pub fn print_banner(&self, banner: &str) {
        for (i, line) in banner.lines().enumerate() {
            self.print(line, BANNER_CYCLE[i % BANNER_CYCLE.len()]);
        }
    }
}

/// Ten-cell bar for a value in `[0, 1]`; out-of-range values are clamped
/// for display only.
pub fn bar(value: f64) -> String {
    let filled = (value.clamp(0.0, 1.0) * 10.0) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
