//! Filesystem helpers
//!
//! Path string manipulation, directory listing, size formatting, serde file
//! I/O and subprocess execution.

mod cmd;
mod guard;
mod names;
mod paths;
mod serde_io;
mod size;
mod walk;

pub use cmd::{CompletedCommand, exec_args, exec_cmd, read_piped};
pub use guard::{ensure_paths_dont_exist, ensure_paths_exist, is_wsl};
pub use names::{rand_filename, safe_filename, safe_filepath};
pub use paths::{
    abspath, basename, dirname, exists, extension, home_dir, is_dir, is_file, is_link, join_path,
    split_path, stem,
};
pub use serde_io::{json_append, json_dump, json_load, toml_dump, toml_load, yaml_dump, yaml_load};
pub use size::{bytes_readable, dir_size, readable_size_to_bytes};
pub use walk::{
    EXT_AUDIO, EXT_IMAGE, EXT_VIDEO, ListOptions, get_dirs_in, get_files_in, glob_files, mkdir,
    mkdirs, move_files,
};
