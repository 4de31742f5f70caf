use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Invalid block size: {0}")]
    InvalidBlockSize(usize),

    #[error("Invalid page size: expected {expected}, got {actual}")]
    InvalidPageSize { expected: usize, actual: usize },

    #[error("Invalid block number {number} for file {file}")]
    InvalidBlockNumber { file: String, number: i64 },

    #[error("{op}: offset {offset} plus {len} bytes exceeds page size {size}")]
    OutOfBounds {
        op: &'static str,
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("Value too large: {0} bytes exceeds the 4-byte length prefix")]
    ValueTooLarge(usize),

    #[error("Invalid string data: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

pub type FileResult<T> = Result<T, FileError>;
