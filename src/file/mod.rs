mod block_id;
mod error;
mod file_manager;
mod page;

pub use block_id::BlockId;
pub use error::{FileError, FileResult};
pub use file_manager::FileMgr;
pub use page::Page;

/// Files whose names start with this prefix are scratch space and are
/// deleted when a file manager starts up.
pub const TEMP_FILE_PREFIX: &str = "temp";
