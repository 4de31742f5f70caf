use super::error::{FileError, FileResult};

/// Bytes per character assumed by `max_length` (US-ASCII accounting).
const BYTES_PER_CHAR: usize = 1;

/// In-memory image of one disk block.
///
/// Values are stored big-endian. Byte arrays and strings are stored as a
/// 4-byte length prefix followed by the payload bytes.
#[derive(Debug, Clone)]
pub struct Page {
    buf: Vec<u8>,
}

impl Page {
    /// Create a zeroed page of the given block size.
    pub fn new(blocksize: usize) -> Self {
        Self {
            buf: vec![0; blocksize],
        }
    }

    /// Create a page that takes ownership of an existing buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { buf: bytes }
    }

    /// Size of the underlying buffer in bytes.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Read a 32-bit integer stored at the given offset.
    pub fn get_int(&self, offset: usize) -> FileResult<i32> {
        self.check_range("get_int", offset, 4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.buf[offset..offset + 4]);
        Ok(i32::from_be_bytes(bytes))
    }

    /// Write a 32-bit integer at the given offset.
    pub fn set_int(&mut self, offset: usize, value: i32) -> FileResult<()> {
        self.check_range("set_int", offset, 4)?;
        self.buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Read a length-prefixed byte array stored at the given offset.
    /// The returned bytes are a copy, not a view into the page.
    pub fn get_bytes(&self, offset: usize) -> FileResult<Vec<u8>> {
        self.check_range("get_bytes", offset, 4)?;
        let mut prefix = [0u8; 4];
        prefix.copy_from_slice(&self.buf[offset..offset + 4]);
        let length = u32::from_be_bytes(prefix) as usize;

        let start = offset + 4;
        self.check_range("get_bytes", start, length)?;
        Ok(self.buf[start..start + length].to_vec())
    }

    /// Write a length-prefixed byte array at the given offset.
    pub fn set_bytes(&mut self, offset: usize, bytes: &[u8]) -> FileResult<()> {
        let length =
            u32::try_from(bytes.len()).map_err(|_| FileError::ValueTooLarge(bytes.len()))?;
        self.check_range("set_bytes", offset, 4)?;
        self.check_range("set_bytes", offset + 4, bytes.len())?;

        self.buf[offset..offset + 4].copy_from_slice(&length.to_be_bytes());
        self.buf[offset + 4..offset + 4 + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Read a length-prefixed string stored at the given offset.
    pub fn get_string(&self, offset: usize) -> FileResult<String> {
        let bytes = self.get_bytes(offset)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Write a length-prefixed string at the given offset.
    pub fn set_string(&mut self, offset: usize, s: &str) -> FileResult<()> {
        self.set_bytes(offset, s.as_bytes())
    }

    /// Maximum number of bytes needed to store a string of `strlen`
    /// characters, including the length prefix.
    pub fn max_length(strlen: usize) -> usize {
        4 + strlen * BYTES_PER_CHAR
    }

    /// Borrow the raw page buffer.
    pub fn contents(&self) -> &[u8] {
        &self.buf
    }

    /// Mutably borrow the raw page buffer.
    pub fn contents_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    fn check_range(&self, op: &'static str, offset: usize, len: usize) -> FileResult<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.buf.len() => Ok(()),
            _ => Err(FileError::OutOfBounds {
                op,
                offset,
                len,
                size: self.buf.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip() {
        let mut page = Page::new(400);
        for &value in &[0, 1, -1, 345, i32::MIN, i32::MAX] {
            page.set_int(80, value).unwrap();
            assert_eq!(page.get_int(80).unwrap(), value);
        }
    }

    #[test]
    fn test_int_is_big_endian() {
        let mut page = Page::new(8);
        page.set_int(0, 0x01020304).unwrap();
        assert_eq!(&page.contents()[0..4], &[0x01, 0x02, 0x03, 0x04]);

        page.set_int(0, -1).unwrap();
        assert_eq!(&page.contents()[0..4], &[0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_int_at_exact_boundary() {
        let mut page = Page::new(8);
        page.set_int(4, 99).unwrap();
        assert_eq!(page.get_int(4).unwrap(), 99);

        let result = page.set_int(5, 99);
        assert!(matches!(result, Err(FileError::OutOfBounds { .. })));
        let result = page.get_int(5);
        assert!(matches!(result, Err(FileError::OutOfBounds { .. })));
    }

    #[test]
    fn test_huge_offset_does_not_wrap() {
        let mut page = Page::new(16);
        let result = page.set_int(usize::MAX, 1);
        assert!(matches!(result, Err(FileError::OutOfBounds { .. })));
        let result = page.get_bytes(usize::MAX - 2);
        assert!(matches!(result, Err(FileError::OutOfBounds { .. })));
    }

    #[test]
    fn test_failed_set_leaves_page_unchanged() {
        let mut page = Page::new(16);
        page.set_int(0, 0x11223344).unwrap();
        page.set_int(12, 0x55667788).unwrap();
        let before = page.contents().to_vec();

        // Payload would fit only partially past the prefix.
        assert!(page.set_bytes(8, &[9; 8]).is_err());
        assert!(page.set_int(13, 1).is_err());
        assert_eq!(page.contents(), &before[..]);
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut page = Page::new(64);
        let data = vec![0u8, 1, 2, 255, 128, 7];
        page.set_bytes(10, &data).unwrap();
        assert_eq!(page.get_bytes(10).unwrap(), data);
    }

    #[test]
    fn test_empty_bytes_round_trip() {
        let mut page = Page::new(8);
        page.set_bytes(4, &[]).unwrap();
        assert_eq!(page.get_bytes(4).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_bytes_layout_has_length_prefix() {
        let mut page = Page::new(16);
        page.set_bytes(2, &[0xAA, 0xBB]).unwrap();
        assert_eq!(&page.contents()[2..8], &[0, 0, 0, 2, 0xAA, 0xBB]);
    }

    #[test]
    fn test_bytes_exact_fit() {
        let mut page = Page::new(10);
        page.set_bytes(0, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(page.get_bytes(0).unwrap(), vec![1, 2, 3, 4, 5, 6]);

        let result = page.set_bytes(0, &[0; 7]);
        assert!(matches!(result, Err(FileError::OutOfBounds { .. })));
    }

    #[test]
    fn test_get_bytes_returns_copy() {
        let mut page = Page::new(16);
        page.set_bytes(0, &[1, 2, 3]).unwrap();
        let mut first = page.get_bytes(0).unwrap();
        first[0] = 99;
        assert_eq!(page.get_bytes(0).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_corrupt_length_prefix_is_rejected() {
        // A prefix claiming more payload than the page holds must not read
        // past the end.
        let mut page = Page::new(12);
        page.set_int(0, 1000).unwrap();
        let result = page.get_bytes(0);
        assert!(matches!(result, Err(FileError::OutOfBounds { .. })));

        page.set_int(0, -1).unwrap();
        let result = page.get_bytes(0);
        assert!(matches!(result, Err(FileError::OutOfBounds { .. })));
    }

    #[test]
    fn test_string_round_trip() {
        let mut page = Page::new(400);
        for s in ["abcdefghijklm", "", "with space & punct!", "ünïcödé"] {
            page.set_string(88, s).unwrap();
            assert_eq!(page.get_string(88).unwrap(), s);
        }
    }

    #[test]
    fn test_string_bytes_are_not_transcoded() {
        let mut page = Page::new(32);
        page.set_string(0, "hi").unwrap();
        assert_eq!(&page.contents()[0..6], &[0, 0, 0, 2, b'h', b'i']);
    }

    #[test]
    fn test_invalid_utf8_is_a_decode_error() {
        let mut page = Page::new(16);
        page.set_bytes(0, &[0xFF, 0xFE]).unwrap();
        let result = page.get_string(0);
        assert!(matches!(result, Err(FileError::InvalidUtf8(_))));
    }

    #[test]
    fn test_max_length() {
        assert_eq!(Page::max_length(0), 4);
        assert_eq!(Page::max_length(13), 17);
        assert_eq!(Page::max_length(400), 404);
    }

    #[test]
    fn test_zero_sized_page() {
        let mut page = Page::new(0);
        assert_eq!(page.size(), 0);
        assert!(page.contents().is_empty());
        assert!(page.get_int(0).is_err());
        assert!(page.set_int(0, 1).is_err());
        assert!(page.get_bytes(0).is_err());
        assert!(page.set_bytes(0, &[]).is_err());
        assert!(page.get_string(0).is_err());
        assert!(page.set_string(0, "").is_err());
    }

    #[test]
    fn test_from_bytes_wraps_buffer() {
        let mut raw = vec![0u8; 8];
        raw[0..4].copy_from_slice(&7i32.to_be_bytes());
        let page = Page::from_bytes(raw);
        assert_eq!(page.size(), 8);
        assert_eq!(page.get_int(0).unwrap(), 7);
    }

    #[test]
    fn test_contents_mut_is_visible_to_typed_reads() {
        let mut page = Page::new(8);
        page.contents_mut()[0..4].copy_from_slice(&41i32.to_be_bytes());
        assert_eq!(page.get_int(0).unwrap(), 41);
    }
}
