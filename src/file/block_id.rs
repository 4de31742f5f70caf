use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of a disk block: a file name plus a zero-based block number.
///
/// Negative block numbers are representable so callers can use them as
/// sentinels; the file manager refuses to read or write them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId {
    filename: String,
    blknum: i64,
}

impl BlockId {
    /// Create a block id for the given file and block number.
    pub fn new(filename: impl Into<String>, blknum: i64) -> Self {
        Self {
            filename: filename.into(),
            blknum,
        }
    }

    /// Name of the file this block belongs to.
    pub fn file_name(&self) -> &str {
        &self.filename
    }

    /// Block number within the file.
    pub fn number(&self) -> i64 {
        self.blknum
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[file {}, block {}]", self.filename, self.blknum)
    }
}
