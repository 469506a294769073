use std::io::{BufWriter, Write};

use tempfile::{Builder, NamedTempFile};

use crate::config::Config;
use crate::error::SortError;
use crate::line_record::LineRecord;

/// In-memory accumulator for the chunk currently being read.
///
/// Records accumulate until their estimated resident size reaches the
/// configured byte budget, at which point the orchestrator spills the chunk
/// to a run file and the buffer starts over empty.
pub(crate) struct ChunkBuffer {
    records: Vec<LineRecord>,
    bytes: u64,
    limit: u64,
}

impl ChunkBuffer {
    pub(crate) fn new(limit: u64) -> ChunkBuffer {
        ChunkBuffer {
            records: Vec::new(),
            bytes: 0,
            limit,
        }
    }

    pub(crate) fn push(&mut self, record: LineRecord) {
        self.bytes += record.approximate_size();
        self.records.push(record);
    }

    pub(crate) fn is_full(&self) -> bool {
        self.bytes >= self.limit
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sort the chunk, collapse key-equal neighbours when unique output is
    /// requested, and persist the survivors as a newline-terminated run
    /// file in the staging directory. The buffer is empty afterwards.
    pub(crate) fn spill(&mut self, config: &Config) -> Result<NamedTempFile, anyhow::Error> {
        self.records.sort();
        if config.unique() {
            self.records.dedup_by(|a, b| a.key_equal(b));
        }

        let run_file = Builder::new()
            .prefix(config.tmp_prefix())
            .suffix(config.tmp_suffix())
            .tempfile_in(config.tmp())
            .map_err(|source| SortError::RunFileCreate {
                path: config.tmp().clone(),
                source,
            })?;

        let lines = self.records.len();
        let mut writer = BufWriter::new(run_file.as_file());
        for record in self.records.drain(..) {
            writer.write_all(record.line().as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        drop(writer);

        self.bytes = 0;
        log::info!("Spilled sorted chunk, {} lines", lines);
        Ok(run_file)
    }
}
