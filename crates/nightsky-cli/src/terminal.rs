//! Terminal styling and small formatting helpers for text output.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for emphasis (location and star names).
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary elements.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for coordinates.
    pub const CYAN: &str = "\x1b[36m";
    /// Orange (256-color) for sunset.
    pub const ORANGE: &str = "\x1b[38;5;208m";
    /// Yellow for sunrise.
    pub const YELLOW: &str = "\x1b[33m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub orange: &'static str,
    pub yellow: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            orange: colors::ORANGE,
            yellow: colors::YELLOW,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            cyan: "",
            orange: "",
            yellow: "",
        }
    }

    /// Palette based on terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format a duration as `"<h>h <mm>m"`.
///
/// ```
/// # use nightsky_cli::terminal::format_hours_minutes;
/// assert_eq!(format_hours_minutes(chrono::Duration::minutes(845)), "14h 05m");
/// ```
#[must_use]
pub fn format_hours_minutes(duration: chrono::Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Format right ascension in degrees as `HHhMMmSS.Ss`.
#[must_use]
pub fn format_ra_hms(ra_deg: f64) -> String {
    const TENTHS_PER_DAY: u64 = 24 * 3600 * 10;
    // Round in tenths of a second before splitting into fields.
    let tenths = ((ra_deg.rem_euclid(360.0) / 15.0) * 36_000.0).round() as u64 % TENTHS_PER_DAY;
    let hours = tenths / 36_000;
    let minutes = (tenths % 36_000) / 600;
    let seconds = tenths % 600;
    format!(
        "{:02}h{:02}m{:02}.{}s",
        hours,
        minutes,
        seconds / 10,
        seconds % 10
    )
}
