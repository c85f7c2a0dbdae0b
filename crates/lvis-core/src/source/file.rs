use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};

use super::{BlockSource, SourceError};

pub type FileBlockSource = BlockReader<BufReader<File>>;

/// Fixed-size block reader over any byte stream.
///
/// One owned buffer is reused for every block; callers decode the borrowed
/// block before asking for the next one.
pub struct BlockReader<R> {
    reader: R,
    buffer: Vec<u8>,
    truncated: usize,
    finished: bool,
}

impl<R: Read> BlockReader<R> {
    pub fn new(reader: R, block_len: usize) -> Result<Self, SourceError> {
        if block_len == 0 {
            return Err(SourceError::ZeroBlockLen);
        }
        Ok(Self {
            reader,
            buffer: vec![0; block_len],
            truncated: 0,
            finished: false,
        })
    }

    /// Fill as much of the buffer as the stream allows.
    fn fill(&mut self) -> Result<usize, SourceError> {
        let mut filled = 0;
        while filled < self.buffer.len() {
            match self.reader.read(&mut self.buffer[filled..]) {
                Ok(0) => break,
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(filled)
    }
}

impl FileBlockSource {
    /// Wrap an open file, rewinding it to the first record.
    pub fn from_file(mut file: File, block_len: usize) -> Result<Self, SourceError> {
        file.seek(SeekFrom::Start(0))?;
        Self::new(BufReader::new(file), block_len)
    }
}

impl<R: Read> BlockSource for BlockReader<R> {
    fn block_len(&self) -> usize {
        self.buffer.len()
    }

    fn next_block(&mut self) -> Result<Option<&[u8]>, SourceError> {
        if self.finished {
            return Ok(None);
        }
        let filled = self.fill()?;
        if filled < self.buffer.len() {
            self.finished = true;
            self.truncated = filled;
            return Ok(None);
        }
        Ok(Some(&self.buffer))
    }

    fn truncated_tail(&self) -> usize {
        self.truncated
    }
}
