//! ANSI SGR tables, coloring and width helpers

use regex::Regex;
use std::fmt;
use std::io::IsTerminal;
use std::str::FromStr;
use std::sync::LazyLock;

const CSI: &str = "\x1b[";

static SGR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid regex"));

static ESCAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:[@-Z\x5C-\x5F]|\[[0-?]*[ -/]*[@-~])").expect("valid regex")
});

/// SGR escape for code `n`, e.g. `ansi_code(31)` == `"\x1b[31m"`.
pub fn ansi_code(n: u8) -> String {
    format!("{}{}m", CSI, n)
}

/// Normalize a user-facing color name: `"light blue"` -> `"LIGHT_BLUE"`.
fn normalize(name: &str) -> String {
    name.trim().to_uppercase().replace([' ', '-'], "_")
}

macro_rules! sgr_table {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:expr, $label:expr;)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Upper snake case name, e.g. `LIGHT_BLUE`.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn escape(self) -> String {
                ansi_code(self.code())
            }
        }

        impl FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = normalize(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == key)
                    .ok_or_else(|| crate::error::Error::invalid(format!(
                        "unknown {}: '{}'",
                        stringify!($name).to_lowercase(),
                        s
                    )))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.escape())
            }
        }
    };
}

sgr_table! {
    /// Foreground colors
    Fg {
        Black = 30, "BLACK";
        Red = 31, "RED";
        Green = 32, "GREEN";
        Yellow = 33, "YELLOW";
        Blue = 34, "BLUE";
        Magenta = 35, "MAGENTA";
        Cyan = 36, "CYAN";
        White = 37, "WHITE";
        Gray = 90, "GRAY";
        LightRed = 91, "LIGHT_RED";
        LightGreen = 92, "LIGHT_GREEN";
        LightYellow = 93, "LIGHT_YELLOW";
        LightBlue = 94, "LIGHT_BLUE";
        LightMagenta = 95, "LIGHT_MAGENTA";
        LightCyan = 96, "LIGHT_CYAN";
        LightWhite = 97, "LIGHT_WHITE";
        Bold = 1, "BOLD";
    }
}

sgr_table! {
    /// Background colors
    Bg {
        Black = 40, "BLACK";
        Red = 41, "RED";
        Green = 42, "GREEN";
        Yellow = 43, "YELLOW";
        Blue = 44, "BLUE";
        Magenta = 45, "MAGENTA";
        Cyan = 46, "CYAN";
        White = 47, "WHITE";
        Gray = 100, "GRAY";
        LightRed = 101, "LIGHT_RED";
        LightGreen = 102, "LIGHT_GREEN";
        LightYellow = 103, "LIGHT_YELLOW";
        LightBlue = 104, "LIGHT_BLUE";
        LightMagenta = 105, "LIGHT_MAGENTA";
        LightCyan = 106, "LIGHT_CYAN";
        LightWhite = 107, "LIGHT_WHITE";
    }
}

sgr_table! {
    /// Text styles
    Style {
        Reset = 0, "RESET";
        Bold = 1, "BOLD";
        Dim = 2, "DIM";
        Italic = 3, "ITALIC";
        Underline = 4, "UNDERLINE";
        Blink = 5, "BLINK";
    }
}

/// Whether [`colored`] emits escape codes. Colors are on when `NO_COLOR`
/// is unset or empty and stdout is a terminal.
pub fn color_enabled() -> bool {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    !no_color && std::io::stdout().is_terminal()
}

/// Color `text` for terminal output.
///
/// Names are looked up case-insensitively in [`Fg`], [`Bg`] and [`Style`];
/// an unknown name is inserted as-is, so raw escape sequences work too.
/// Returns `text` untouched when [`color_enabled`] is false.
pub fn colored(text: &str, color: Option<&str>, background: Option<&str>, style: Option<&str>) -> String {
    if !color_enabled() {
        return text.to_string();
    }
    paint(text, color, background, style)
}

/// Same as [`colored`] but always emits escape codes.
pub fn paint(text: &str, color: Option<&str>, background: Option<&str>, style: Option<&str>) -> String {
    format!(
        "{}{}{}{}{}",
        lookup::<Fg>(color),
        lookup::<Bg>(background),
        lookup::<Style>(style),
        text,
        Style::Reset
    )
}

/// Reusable color, background and style names for [`with_style`].
///
/// ```
/// use stdl::st::{TextStyle, with_style};
///
/// let warning = TextStyle::new().color("yellow").style("bold");
/// println!("{}", with_style("careful", &warning));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub color: Option<String>,
    pub background: Option<String>,
    pub style: Option<String>,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, name: &str) -> Self {
        self.color = Some(name.to_string());
        self
    }

    pub fn background(mut self, name: &str) -> Self {
        self.background = Some(name.to_string());
        self
    }

    pub fn style(mut self, name: &str) -> Self {
        self.style = Some(name.to_string());
        self
    }

    /// Apply the style, always emitting escape codes.
    pub fn paint(&self, text: &str) -> String {
        paint(
            text,
            self.color.as_deref(),
            self.background.as_deref(),
            self.style.as_deref(),
        )
    }
}

/// [`colored`] with the names taken from a [`TextStyle`].
pub fn with_style(text: &str, style: &TextStyle) -> String {
    colored(
        text,
        style.color.as_deref(),
        style.background.as_deref(),
        style.style.as_deref(),
    )
}

fn lookup<T: FromStr + fmt::Display>(value: Option<&str>) -> String {
    match value {
        None | Some("") => String::new(),
        Some(v) => v.parse::<T>().map(|t| t.to_string()).unwrap_or_else(|_| v.to_string()),
    }
}

/// OSC 8 hyperlink. Falls back to the bare URI when stdout is not a terminal.
pub fn terminal_link(uri: &str, label: Option<&str>) -> String {
    if !std::io::stdout().is_terminal() {
        return uri.to_string();
    }
    colored(&osc8(uri, label.unwrap_or(uri)), Some("white"), None, None)
}

pub(crate) fn osc8(uri: &str, label: &str) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, label)
}

/// Character count ignoring SGR sequences.
pub fn ansi_len(s: &str) -> usize {
    let codes: usize = SGR_RE.find_iter(s).map(|m| m.as_str().chars().count()).sum();
    s.chars().count() - codes
}

/// Left-justify to `width` visible characters.
pub fn ansi_ljust(s: &str, width: usize, fill: char) -> String {
    let pad = width.saturating_sub(ansi_len(s));
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(fill, pad));
    out
}

/// Right-justify to `width` visible characters.
pub fn ansi_rjust(s: &str, width: usize, fill: char) -> String {
    let pad = width.saturating_sub(ansi_len(s));
    let mut out: String = std::iter::repeat_n(fill, pad).collect();
    out.push_str(s);
    out
}

/// Remove all ANSI escape sequences.
pub fn ansi_strip(s: &str) -> String {
    ESCAPE_RE.replace_all(s, "").into_owned()
}
