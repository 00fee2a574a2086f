//! Extended standard library helpers
//!
//! A flat collection of small utilities that sit next to `std`:
//!
//! - [`lazy`] - lazily imported modules: handles that build a module on first access
//! - [`fs`] - path strings, directory listing, sizes, serde file I/O, subprocesses
//! - [`st`] - ANSI colors, character filters, case conversion, wrapping
//! - [`dt`] - date/time formatting and parsing, ranges, `HH:MM:SS`, timers
//! - [`lst`] - chunking, splitting and sublist helpers for slices
//! - [`timing`] - timed calls and retries
//! - [`net`] - file download with a size limit
//! - [`log`] - `tracing` subscriber setup from a config file
//!
//! # Lazy imports
//!
//! ```
//! use stdl::lazy::{Importer, Namespace};
//!
//! let importer = Importer::with_builtins();
//! let mut ns = Namespace::new(importer.clone());
//! ns.import_lazy("stdl.st", Some(&["kebab_case"]), None, true)?;
//!
//! let kebab: fn(&str) -> String = ns.value("kebab_case")?;
//! assert_eq!(kebab("HTTPServer"), "http-server");
//! assert_eq!(importer.timings().len(), 1);
//! # Ok::<(), stdl::Error>(())
//! ```

pub mod dt;
pub mod error;
pub mod fs;
pub mod lazy;
pub mod log;
pub mod lst;
pub mod net;
pub mod st;
pub mod timing;

pub use error::{Error, Result};
