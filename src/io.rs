//! Random-access byte sources the header parsers read from.
//!
//! Parsers never hold more than the header structures they need; a
//! source hands out bytes at absolute offsets and knows its own size.

use crate::error::SkipReason;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

pub trait ByteSource {
    /// Reads into `buffer` starting at `offset`. Returns the number of
    /// bytes read, which is less than `buffer.len()` only at end of data.
    fn read_at(&mut self, offset: u64, buffer: &mut [u8]) -> io::Result<usize>;

    /// Total size of the source in bytes.
    fn size(&self) -> u64;

    /// Fills `buffer` completely or fails with [`SkipReason::Truncated`].
    fn read_exact_at(&mut self, offset: u64, buffer: &mut [u8]) -> Result<(), SkipReason> {
        let filled = self.read_up_to(offset, buffer)?;
        if filled < buffer.len() {
            return Err(SkipReason::Truncated {
                offset,
                needed: buffer.len(),
                available: filled,
            });
        }
        Ok(())
    }

    /// Reads as much of `buffer` as the source holds past `offset`.
    fn read_up_to(&mut self, offset: u64, buffer: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buffer.len() {
            match self.read_at(offset + filled as u64, &mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn read_vec_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, SkipReason> {
        let mut buffer = vec![0u8; len];
        self.read_exact_at(offset, &mut buffer)?;
        Ok(buffer)
    }
}

/// A file opened for the duration of one extraction.
pub struct FileSource {
    file: File,
    size: u64,
}

impl FileSource {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }
}

impl ByteSource for FileSource {
    fn read_at(&mut self, offset: u64, buffer: &mut [u8]) -> io::Result<usize> {
        if offset >= self.size {
            return Ok(0);
        }
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read(buffer)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// In-memory source, used for embedded blocks such as EXIF and in tests.
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_at(&mut self, offset: u64, buffer: &mut [u8]) -> io::Result<usize> {
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= self.data.len() {
            return Ok(0);
        }
        let n = buffer.len().min(self.data.len() - start);
        buffer[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
