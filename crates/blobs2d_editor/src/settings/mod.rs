//! Configuration file lookup
//!
//! `blobs2d.json` in the working directory wins over the per-user
//! `config.json` in the platform config directory. Fields missing from the
//! file keep the values of the preset the binary started with.

mod file;

pub use file::{candidate_paths, config_dir, load_config, resolve_from};
