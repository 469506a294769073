use std::cmp::max;
use std::collections::BinaryHeap;
use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use rlimit::{getrlimit, setrlimit, Resource};
use tempfile::NamedTempFile;

use crate::chunk::ChunkBuffer;
use crate::config::Config;
use crate::error::SortError;
use crate::line_record::LineRecord;
use crate::order::Order;
use crate::run_file::RunFile;

/// Sort an arbitrarily large stream of text lines under a fixed memory
/// budget.
///
/// Input is accumulated into bounded chunks; each full chunk is sorted in
/// memory and spilled to a run file in the staging directory, and the run
/// files are combined by a streaming k-way merge into the output. All
/// phases derive and compare keys identically, so the merged output is the
/// same total order an unbounded in-memory sort would produce.
///
/// # Examples
/// ```no_run
/// use std::path::PathBuf;
/// use text_stream_sort::order::Order;
/// use text_stream_sort::sort::Sort;
///
/// // sort a file to stdout by its second column, largest value first
/// fn sort_by_count(input: PathBuf) -> Result<(), anyhow::Error> {
///     let mut sort = Sort::new();
///     sort.with_input(input);
///     sort.with_key_field(2);
///     sort.with_numeric(true);
///     sort.with_order(Order::Desc);
///     sort.sort()
/// }
/// ```
pub struct Sort {
    input: Option<PathBuf>,
    key_field: usize,
    numeric: bool,
    unique: bool,
    order: Order,
    tmp: PathBuf,
    chunk_size_bytes: u64,
}

impl Sort {
    /// Create a default Sort definition.
    ///
    /// * input is read from standard input unless a file is configured
    /// * the complete line is the comparison key
    /// * keys compare lexicographically by byte value in ascending order
    /// * duplicates are kept
    /// * run files are staged in the system temp dir - std::env::temp_dir()
    /// * input is accumulated in chunks of 1 MiB
    pub fn new() -> Sort {
        Sort {
            input: None,
            key_field: 0,
            numeric: false,
            unique: false,
            order: Order::Asc,
            tmp: std::env::temp_dir(),
            chunk_size_bytes: 1 << 20,
        }
    }

    /// Read input from `input` instead of standard input.
    pub fn with_input(&mut self, input: PathBuf) {
        self.input = Some(input);
    }

    /// Compare by the 1-based whitespace-delimited field `key_field` instead
    /// of the whole line. Lines with fewer fields get an empty key. A value
    /// of 0 restores whole-line comparison.
    pub fn with_key_field(&mut self, key_field: usize) {
        self.key_field = key_field;
    }

    /// Compare keys as base 10 floating point numbers. Records whose key
    /// does not parse keep their string key and sort after all numeric
    /// records (before them in descending order).
    pub fn with_numeric(&mut self, numeric: bool) {
        self.numeric = numeric;
    }

    /// Keep only the first record of every run of key-equal records, both
    /// within each chunk and globally across the merge.
    pub fn with_unique(&mut self, unique: bool) {
        self.unique = unique;
    }

    /// Set [Order]. The default is ascending.
    pub fn with_order(&mut self, order: Order) {
        self.order = order;
    }

    /// Set directory for run files. By default use std::env::temp_dir().
    /// It is recommended for large inputs to use a dedicated directory on
    /// the same file system as the output target.
    pub fn with_tmp_dir(&mut self, tmp: PathBuf) {
        self.tmp = tmp;
    }

    /// Accumulate up to 'chunk_size_bytes' of records in memory before
    /// spilling a sorted run file.
    pub fn with_chunk_size_bytes(&mut self, chunk_size_bytes: u64) {
        self.chunk_size_bytes = chunk_size_bytes;
    }

    /// Accumulate up to 'chunk_size_mb' MB of records in memory before
    /// spilling a sorted run file.
    pub fn with_chunk_size_mb(&mut self, chunk_size_mb: u64) {
        self.chunk_size_bytes = chunk_size_mb * 1_000_000;
    }

    /// Sort the configured input to standard output.
    pub fn sort(&self) -> Result<(), anyhow::Error> {
        let stdout = std::io::stdout();
        self.sort_into(stdout.lock())
    }

    /// Sort the configured input into `out`.
    pub fn sort_into<W: Write>(&self, out: W) -> Result<(), anyhow::Error> {
        let config = self.create_config();
        match &self.input {
            Some(path) => {
                let file = File::open(path).map_err(|source| SortError::InputNotFound {
                    path: path.clone(),
                    source,
                })?;
                Self::internal_sort(BufReader::new(file), &config, out)
            }
            None => {
                let stdin = std::io::stdin();
                Self::internal_sort(stdin.lock(), &config, out)
            }
        }
    }

    fn create_config(&self) -> Config {
        Config::new(
            self.tmp.clone(),
            "sort-".to_string(),
            ".run".to_string(),
            self.key_field,
            self.numeric,
            self.unique,
            self.order.clone(),
            self.chunk_size_bytes,
        )
    }

    fn internal_sort<R: BufRead, W: Write>(
        mut reader: R,
        config: &Config,
        out: W,
    ) -> Result<(), anyhow::Error> {
        log::info!("Start external sort");
        fs::create_dir_all(config.tmp()).map_err(|source| SortError::StagingDirCreate {
            path: config.tmp().clone(),
            source,
        })?;

        let mut writer = BufWriter::new(out);
        let mut chunk = ChunkBuffer::new(config.chunk_size_bytes());
        // run files unlink when the handles drop, on error paths as well
        let mut run_files: Vec<NamedTempFile> = Vec::new();

        let mut line = String::new();
        while reader.read_line(&mut line)? != 0 {
            if line.ends_with('\n') {
                line.pop();
            }
            chunk.push(LineRecord::new(line, config));
            if chunk.is_full() {
                run_files.push(chunk.spill(config)?);
            }
            line = String::new();
        }

        if !chunk.is_empty() {
            run_files.push(chunk.spill(config)?);
        }

        match run_files.len() {
            0 => {}
            1 => Self::copy_run_file(run_files[0].path(), &mut writer)?,
            _ => Self::merge_run_files(&run_files, config, &mut writer)?,
        }
        writer.flush()?;
        log::info!("Finish external sort, {} run files", run_files.len());
        Ok(())
    }

    /// A single run file is already fully sorted and deduplicated; stream
    /// its bytes to the output without going through the merge queue.
    fn copy_run_file<W: Write>(path: &Path, writer: &mut W) -> Result<(), anyhow::Error> {
        let file = File::open(path).with_context(|| format!("run file: {}", path.display()))?;
        let mut reader = BufReader::new(file);
        std::io::copy(&mut reader, writer)?;
        Ok(())
    }

    fn merge_run_files<W: Write>(
        run_files: &[NamedTempFile],
        config: &Config,
        writer: &mut W,
    ) -> Result<(), anyhow::Error> {
        let (current_soft, current_hard) = Self::get_rlimits()?;
        let new_soft = max(run_files.len() as u64 + 64, current_soft).min(current_hard);
        log::info!(
            "Merging {} sorted run files, rlimit NOFILE soft: {} -> {}",
            run_files.len(),
            current_soft,
            new_soft
        );
        Self::set_rlimits(new_soft, current_hard)?;

        let mut sources: BinaryHeap<RunFile> = BinaryHeap::with_capacity(run_files.len());
        for (index, run_file) in run_files.iter().enumerate() {
            let source = RunFile::new(run_file.path(), index, config)?;
            if !source.is_exhausted() {
                sources.push(source);
            }
        }

        let mut last_emitted: Option<LineRecord> = None;
        while let Some(mut source) = sources.pop() {
            if let Some(record) = source.advance()? {
                let duplicate = config.unique()
                    && last_emitted
                        .as_ref()
                        .map_or(false, |last| last.key_equal(&record));
                if !duplicate {
                    writer.write_all(record.line().as_bytes())?;
                    writer.write_all(b"\n")?;
                    last_emitted = Some(record);
                }
            }
            if !source.is_exhausted() {
                sources.push(source);
            }
        }

        log::info!("Finished merging sorted run files");
        Self::set_rlimits(current_soft, current_hard)?;
        Ok(())
    }

    fn get_rlimits() -> Result<(u64, u64), anyhow::Error> {
        getrlimit(Resource::NOFILE).with_context(|| "getrlimit")
    }

    fn set_rlimits(soft: u64, hard: u64) -> Result<(), anyhow::Error> {
        setrlimit(Resource::NOFILE, soft, hard)
            .with_context(|| format!("set rlimit NOFILE, soft: {}, hard: {}", soft, hard))?;
        Ok(())
    }
}

impl Default for Sort {
    fn default() -> Sort {
        Sort::new()
    }
}
