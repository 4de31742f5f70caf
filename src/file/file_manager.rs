use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, info};

use super::TEMP_FILE_PREFIX;
use super::block_id::BlockId;
use super::error::{FileError, FileResult};
use super::page::Page;

/// Handles block-level I/O against the files in a database directory.
///
/// Every operation runs under a single internal mutex, so one manager can
/// be shared across threads behind an `Arc` without external locking.
pub struct FileMgr {
    /// Directory holding every managed file
    db_directory: PathBuf,
    /// Fixed size of every block in bytes
    blocksize: usize,
    /// Whether the directory was created by this manager
    is_new: bool,
    /// Lazily opened file handles, keyed by file name
    open_files: Mutex<HashMap<String, File>>,
}

impl FileMgr {
    /// Create a file manager rooted at the given directory.
    ///
    /// The directory is created if it does not exist. Leftover temporary
    /// files from earlier runs are removed before any file is opened.
    pub fn new<P: AsRef<Path>>(db_directory: P, blocksize: usize) -> FileResult<Self> {
        if blocksize == 0 {
            return Err(FileError::InvalidBlockSize(blocksize));
        }

        let db_directory = db_directory.as_ref().to_path_buf();
        let is_new = !db_directory.exists();
        if is_new {
            fs::create_dir_all(&db_directory)?;
        } else if !db_directory.is_dir() {
            return Err(FileError::NotADirectory(db_directory.display().to_string()));
        }

        // Remove leftover temporary files
        for entry in fs::read_dir(&db_directory)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with(TEMP_FILE_PREFIX) {
                debug!("removing leftover temp file {:?}", entry.path());
                let _ = fs::remove_file(entry.path());
            }
        }

        info!("file manager started in {:?} with block size {}", db_directory, blocksize);
        Ok(Self {
            db_directory,
            blocksize,
            is_new,
            open_files: Mutex::new(HashMap::new()),
        })
    }

    /// True if the database directory did not exist before this manager
    /// created it.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Block size shared by every file under this manager.
    pub fn block_size(&self) -> usize {
        self.blocksize
    }

    /// Number of complete blocks in the specified file.
    ///
    /// The file is created empty if it does not exist yet. A trailing
    /// partial block does not count.
    pub fn length(&self, filename: &str) -> FileResult<i64> {
        let mut files = self.open_files.lock().unwrap();
        let file = self.file_for(&mut files, filename)?;
        let size = file.metadata()?.len();
        Ok((size / self.blocksize as u64) as i64)
    }

    /// Read the contents of the specified block into the given page.
    pub fn read(&self, blk: &BlockId, page: &mut Page) -> FileResult<()> {
        let mut files = self.open_files.lock().unwrap();
        if page.size() != self.blocksize {
            return Err(FileError::InvalidPageSize {
                expected: self.blocksize,
                actual: page.size(),
            });
        }

        let offset = self.offset_of(blk)?;
        let file = self.file_for(&mut files, blk.file_name())?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(page.contents_mut())?;
        debug!("read {}", blk);
        Ok(())
    }

    /// Write the contents of the given page to the specified block and
    /// flush it to disk before returning.
    pub fn write(&self, blk: &BlockId, page: &Page) -> FileResult<()> {
        let mut files = self.open_files.lock().unwrap();
        if page.size() != self.blocksize {
            return Err(FileError::InvalidPageSize {
                expected: self.blocksize,
                actual: page.size(),
            });
        }

        let offset = self.offset_of(blk)?;
        let file = self.file_for(&mut files, blk.file_name())?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(page.contents())?;
        file.sync_data()?;
        debug!("wrote {}", blk);
        Ok(())
    }

    /// Extend the specified file by one zero-filled block, flush it to
    /// disk, and return the new block's id.
    pub fn append(&self, filename: &str) -> FileResult<BlockId> {
        let mut files = self.open_files.lock().unwrap();
        let file = self.file_for(&mut files, filename)?;
        let size = file.metadata()?.len();
        let new_blknum = (size / self.blocksize as u64) as i64;
        let blk = BlockId::new(filename, new_blknum);

        let zeroes = vec![0u8; self.blocksize];
        let offset = self.offset_of(&blk)?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&zeroes)?;
        file.sync_data()?;
        debug!("appended {}", blk);
        Ok(blk)
    }

    /// Flush and drop every cached file handle.
    ///
    /// The manager remains usable; later operations reopen files on demand.
    pub fn close_all(&self) -> FileResult<()> {
        let mut files = self.open_files.lock().unwrap();
        for file in files.values_mut() {
            file.sync_data()?;
        }
        let count = files.len();
        files.clear();
        debug!("closed {} open files", count);
        Ok(())
    }

    /// Return the cached handle for `filename`, opening the file first if
    /// this is its first access. The file is created if it does not exist.
    fn file_for<'a>(
        &self,
        files: &'a mut HashMap<String, File>,
        filename: &str,
    ) -> FileResult<&'a mut File> {
        match files.entry(filename.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.db_directory.join(filename);
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .open(path)?;
                Ok(entry.insert(file))
            }
        }
    }

    /// Byte offset of the given block, rejecting block numbers that cannot
    /// be addressed.
    fn offset_of(&self, blk: &BlockId) -> FileResult<u64> {
        u64::try_from(blk.number())
            .ok()
            .and_then(|n| n.checked_mul(self.blocksize as u64))
            .ok_or_else(|| FileError::InvalidBlockNumber {
                file: blk.file_name().to_string(),
                number: blk.number(),
            })
    }
}
