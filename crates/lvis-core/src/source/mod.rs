mod file;

pub use file::{BlockReader, FileBlockSource};

use thiserror::Error;

/// Sequential source of fixed-size record blocks.
///
/// A source yields whole blocks only. A trailing partial block ends the
/// stream and is reported through [`BlockSource::truncated_tail`].
pub trait BlockSource {
    /// Bytes per block.
    fn block_len(&self) -> usize;

    /// Next full block, or `None` at end of stream.
    fn next_block(&mut self) -> Result<Option<&[u8]>, SourceError>;

    /// Bytes of the partial block that ended the stream, if any.
    fn truncated_tail(&self) -> usize;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record length must be non-zero")]
    ZeroBlockLen,
}
