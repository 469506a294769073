//! This crate implements an external sort for arbitrarily large streams of
//! text lines under a fixed memory budget.
//!
//! Input read from a file or from standard input is accumulated into bounded
//! in-memory chunks. Each full chunk is sorted and spilled to a temporary run
//! file, and once the input is exhausted the run files are combined by a
//! streaming k-way merge, so memory residency never exceeds one chunk plus
//! one buffered line per run file. The comparison key is either the whole
//! line or a single whitespace-delimited field, optionally compared as a
//! number, in ascending or descending order, with optional key-based
//! deduplication - a restricted form of the POSIX sort utility.
//!
//! # Examples
//! ```no_run
//! use std::path::PathBuf;
//! use text_stream_sort::sort::Sort;
//!
//! // sort a large file to stdout using at most ~100 MB of record memory
//! fn sort_file(input: PathBuf) -> Result<(), anyhow::Error> {
//!     let mut sort = Sort::new();
//!     sort.with_input(input);
//!     sort.with_chunk_size_mb(100);
//!     sort.sort()
//! }
//! ```

pub(crate) mod chunk;
pub(crate) mod config;
pub(crate) mod key;
pub(crate) mod line_record;
pub(crate) mod run_file;

pub mod error;
pub mod order;
pub mod sort;
