//! String helpers: ANSI colors, char filters, case conversion, wrapping

mod ansi;
mod case;
mod filter;
mod wrap;

pub use ansi::{
    Bg, Fg, Style, TextStyle, ansi_code, ansi_len, ansi_ljust, ansi_rjust, ansi_strip,
    color_enabled, colored, paint, terminal_link, with_style,
};
pub use case::{camel_case, kebab_case, snake_case};
pub use filter::{filter_ascii, filter_filename, filter_filepath, keep, remove};
pub use wrap::wrapped;
