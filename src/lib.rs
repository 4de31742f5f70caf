pub mod file;

pub use file::{BlockId, FileError, FileMgr, FileResult, Page, TEMP_FILE_PREFIX};
