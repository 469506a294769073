use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::Config;
use crate::line_record::LineRecord;

/// One open run file during the merge phase: a buffered reader together
/// with the record at its head and the stable index of the source.
///
/// Keys are re-extracted for every line read back from disk, with the same
/// configuration the spill phase used, so both phases order records
/// identically. The index breaks ties between sources holding equal head
/// records, which keeps the merge deterministic; dropping the value closes
/// the underlying file.
#[derive(Debug)]
pub(crate) struct RunFile {
    path: PathBuf,
    reader: BufReader<File>,
    head: Option<LineRecord>,
    index: usize,
    config: Config,
}

impl RunFile {
    pub(crate) fn new(path: &Path, index: usize, config: &Config) -> Result<RunFile, anyhow::Error> {
        let file = File::open(path).with_context(|| format!("run file: {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let head = Self::read_record(&mut reader, config)
            .with_context(|| format!("run file: {}", path.display()))?;
        Ok(RunFile {
            path: path.to_path_buf(),
            reader,
            head,
            index,
            config: config.clone(),
        })
    }

    fn read_record(
        reader: &mut BufReader<File>,
        config: &Config,
    ) -> Result<Option<LineRecord>, anyhow::Error> {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
        }
        Ok(Some(LineRecord::new(line, config)))
    }

    /// Take the head record and refill the slot with the next line from the
    /// file. Returns `None` once the source held no further record.
    pub(crate) fn advance(&mut self) -> Result<Option<LineRecord>, anyhow::Error> {
        let next = Self::read_record(&mut self.reader, &self.config)
            .with_context(|| format!("run file: {}", self.path.display()))?;
        Ok(std::mem::replace(&mut self.head, next))
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.head.is_none()
    }
}

impl Eq for RunFile {}

impl PartialEq<Self> for RunFile {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd<Self> for RunFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RunFile {
    // comparisons are flipped to work with BinaryHeap (Max Heap): the source
    // with the smallest head record, or the lowest index on equal heads,
    // pops first; exhausted sources pop before everything
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.head, &other.head) {
            (None, None) => other.index.cmp(&self.index),
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => b.cmp(a).then_with(|| other.index.cmp(&self.index)),
        }
    }
}
