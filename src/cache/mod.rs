//! Build cache records
//!
//! The cache is a single hash file per project next to its install
//! destination. The lifecycle around a rebuild is:
//!
//! | Step | Record |
//! |------|--------|
//! | Fresh check | read, compared with the current hash |
//! | Rebuild starts | deleted |
//! | Rebuild succeeds | rewritten with the new hash |
//!
//! A crash between the last two steps leaves no record, so the next run
//! rebuilds instead of trusting a half-finished install.

mod hash_file;

pub use hash_file::{HashCache, HASH_FILE_EXTENSION};
