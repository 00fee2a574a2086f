//! The crate's own helpers exposed as importable modules.
//!
//! Attributes are plain function pointers; fetch them with the exact
//! signature, e.g. `ns.value::<fn(&str) -> String>("snake_case")`.

use super::importer::Importer;
use super::module::Module;
use crate::error::Result;
use crate::{dt, fs, st};

type StrFn = fn(&str) -> String;
type PredFn = fn(&str) -> bool;

pub(super) fn register(importer: &Importer) {
    importer
        .register("stdl.path", || Ok(path_module()))
        .register("stdl.st", || Ok(st_module()))
        .register("stdl.dt", || Ok(dt_module()))
        .register("stdl.fs", || Ok(fs_module()));
}

fn path_module() -> Module {
    Module::new("stdl.path")
        .with_attr("join", fs::join_path as fn(&str, &str) -> String)
        .with_attr("abspath", fs::abspath as StrFn)
        .with_attr("basename", fs::basename as StrFn)
        .with_attr("dirname", fs::dirname as StrFn)
        .with_attr("split", fs::split_path as fn(&str) -> (String, String))
        .with_attr("extension", fs::extension as StrFn)
        .with_attr("stem", fs::stem as StrFn)
        .with_attr("exists", fs::exists as PredFn)
        .with_attr("is_file", fs::is_file as PredFn)
        .with_attr("is_dir", fs::is_dir as PredFn)
        .with_attr("is_link", fs::is_link as PredFn)
}

fn st_module() -> Module {
    Module::new("stdl.st")
        .with_attr("snake_case", st::snake_case as StrFn)
        .with_attr("camel_case", st::camel_case as StrFn)
        .with_attr("kebab_case", st::kebab_case as StrFn)
        .with_attr("ansi_strip", st::ansi_strip as StrFn)
        .with_attr("ansi_len", st::ansi_len as fn(&str) -> usize)
        .with_attr("remove", st::remove as fn(&str, &str, &str) -> String)
        .with_attr("keep", st::keep as fn(&str, &str, &str) -> String)
        .with_attr("filter_ascii", st::filter_ascii as fn(&str, &str) -> String)
        .with_attr("wrapped", st::wrapped as fn(&str, usize, &str) -> String)
}

fn dt_module() -> Module {
    Module::new("stdl.dt")
        .with_attr("seconds_to_hms", dt::seconds_to_hms as fn(f64, bool) -> String)
        .with_attr("hms_to_seconds", dt::hms_to_seconds as fn(&str, bool) -> Result<f64>)
        .with_attr(
            "parse_datetime",
            dt::parse_datetime as fn(&str) -> Result<chrono::NaiveDateTime>,
        )
}

fn fs_module() -> Module {
    Module::new("stdl.fs")
        .with_attr("bytes_readable", fs::bytes_readable as fn(u64) -> String)
        .with_attr(
            "readable_size_to_bytes",
            fs::readable_size_to_bytes as fn(&str, u64) -> Result<u64>,
        )
        .with_attr("safe_filename", fs::safe_filename as StrFn)
        .with_attr("safe_filepath", fs::safe_filepath as StrFn)
        .with_attr("exec_cmd", fs::exec_cmd as fn(&str) -> Result<fs::CompletedCommand>)
}
