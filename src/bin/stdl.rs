//! stdl CLI - a few helpers from the library on the command line
//!
//! Usage:
//!   stdl colors                       Show the ANSI color tables
//!   stdl files <dir> [-e .rs]         List files under a directory
//!   stdl size <value>                 Convert between bytes and readable sizes
//!   stdl hms <value>                  Convert between seconds and HH:MM:SS
//!   stdl case <style> <text>          Convert identifier case

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use stdl::fs::{ListOptions, bytes_readable, dir_size, get_files_in, readable_size_to_bytes};
use stdl::log::LogConfig;
use stdl::st::{Bg, Fg, Style, TextStyle, camel_case, colored, kebab_case, snake_case, with_style};

#[derive(Parser)]
#[command(name = "stdl")]
#[command(about = "Small utilities from the stdl library")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level or filter directives (overrides RUST_LOG)
    #[arg(long, global = true, env = "STDL_LOG")]
    log_level: Option<String>,

    /// Logging config file (.toml or .yaml)
    #[arg(long, global = true)]
    log_config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every foreground, background and style code
    Colors,

    /// List files in a directory, breadth first
    Files {
        dir: PathBuf,

        /// Keep only these extensions (repeatable)
        #[arg(short, long = "ext")]
        exts: Vec<String>,

        /// Only the top level
        #[arg(long)]
        no_recursive: bool,

        /// Print paths relative to the current directory
        #[arg(long)]
        relative: bool,
    },

    /// Convert "1.5 MB" to bytes, a byte count to readable form, or report a directory size
    Size {
        value: String,

        /// Use 1000 instead of 1024 per unit when parsing
        #[arg(long)]
        si: bool,
    },

    /// Convert "01:02:03" to seconds or seconds to HH:MM:SS
    Hms {
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Include milliseconds
        #[arg(long)]
        ms: bool,
    },

    /// Convert identifier case
    Case {
        #[arg(value_enum)]
        style: CaseStyle,
        text: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CaseStyle {
    Snake,
    Camel,
    Kebab,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Colors => show_colors(),

        Commands::Files {
            dir,
            exts,
            no_recursive,
            relative,
        } => {
            let exts: Vec<&str> = exts.iter().map(String::as_str).collect();
            let opts = ListOptions {
                exts: &exts,
                recursive: !no_recursive,
                absolute: !relative,
            };
            let files = get_files_in(&dir, &opts)
                .with_context(|| format!("Failed to list {}", dir.display()))?;
            for file in &files {
                println!("{}", file.display());
            }
            tracing::debug!(count = files.len(), "listed files");
        }

        Commands::Size { value, si } => {
            let path = PathBuf::from(&value);
            if path.is_dir() {
                let total = dir_size(&path)?;
                let raw = colored(&total.to_string(), None, None, Some("dim"));
                println!("{} {}", bytes_readable(total), raw);
            } else if let Ok(bytes) = value.trim().parse::<u64>() {
                println!("{}", bytes_readable(bytes));
            } else {
                let kb = if si { 1000 } else { 1024 };
                println!("{}", readable_size_to_bytes(&value, kb)?);
            }
        }

        Commands::Hms { value, ms } => {
            if value.contains(':') {
                println!("{}", stdl::dt::hms_to_seconds(&value, ms)?);
            } else {
                let secs: f64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Not a number of seconds: {}", value))?;
                println!("{}", stdl::dt::seconds_to_hms(secs, ms));
            }
        }

        Commands::Case { style, text } => {
            let out = match style {
                CaseStyle::Snake => snake_case(&text),
                CaseStyle::Camel => camel_case(&text),
                CaseStyle::Kebab => kebab_case(&text),
            };
            println!("{}", out);
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut config = match &cli.log_config {
        Some(path) => LogConfig::from_path(path)
            .with_context(|| format!("Failed to read log config {}", path.display()))?,
        None => LogConfig::with_level("warn"),
    };
    if cli.log_level.is_some() {
        config.level = cli.log_level.clone();
    }
    stdl::log::init(&config)?;
    Ok(())
}

fn show_colors() {
    let header = TextStyle::new().style("bold");
    println!("{}", with_style("Foreground", &header));
    for fg in Fg::ALL {
        println!("  {:>3}  {}", fg.code(), colored(fg.name(), Some(fg.name()), None, None));
    }
    println!("{}", with_style("Background", &header));
    for bg in Bg::ALL {
        println!("  {:>3}  {}", bg.code(), colored(bg.name(), None, Some(bg.name()), None));
    }
    println!("{}", with_style("Style", &header));
    for st in Style::ALL.iter().filter(|s| **s != Style::Reset) {
        println!("  {:>3}  {}", st.code(), colored(st.name(), None, None, Some(st.name())));
    }
}
