//! BSpec archive handling.
//!
//! An archive is a directory tree with `manifest.json` at its root and
//! `documents/`, `assets/` and `computed/` sections below it. Packed, the
//! same tree travels as a gzip-compressed tar stream with the `.bspec`
//! extension. Both forms decode to the same [`Archive`].

pub mod archive;
pub mod codec;
pub mod manifest;
pub mod skeleton;

pub use archive::{read_directory, validate_source_directory, Archive};
pub use codec::{extract, extract_from_reader, open, pack, pack_file, read, PackSummary, EXTENSION};
pub use manifest::{ConformanceLevel, IndustryProfile, Manifest, UnknownVariant, MANIFEST_FILE};
pub use skeleton::{init_project, InitOptions};
