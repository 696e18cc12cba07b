//! Bounded file copy with a reusable buffer.
//!
//! Every regular file in an archive is copied through [`copy_bounded`]: at
//! most the declared number of bytes is read, and a stream that is shorter
//! or longer than its header claims is rejected.

use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;

use crate::InstallError;
use crate::Result;

/// Buffer size for I/O operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable buffer for copying entry contents.
///
/// One buffer is allocated per extraction and shared by every entry.
///
/// # Examples
///
/// ```
/// use gopher_core::copy::{CopyBuffer, copy_with_buffer};
/// use std::io::Cursor;
///
/// # fn main() -> std::io::Result<()> {
/// let mut buffer = CopyBuffer::new();
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut Cursor::new(b"go1.22.1"), &mut output, &mut buffer)?;
/// assert_eq!(copied, 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zero-initialized copy buffer.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies data from reader to writer using the provided reusable buffer.
///
/// Returns the total number of bytes copied.
///
/// # Errors
///
/// Returns an error if reading or writing fails, or if the byte count would
/// overflow `u64`.
#[inline]
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> io::Result<u64> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        total = total
            .checked_add(bytes_read as u64)
            .ok_or_else(|| io::Error::other("copied byte count overflowed"))?;
    }

    Ok(total)
}

/// Copies exactly `declared` bytes of the entry `name`.
///
/// After the declared length has been copied, one more byte is requested
/// from `reader`. Readers that verify a checksum at end of stream (zip)
/// report corruption on that read.
///
/// # Errors
///
/// - `InstallError::InvalidArchive` if the stream ends before `declared`
///   bytes or continues past them
/// - `InstallError::IoContext` if reading or writing fails
pub fn copy_bounded<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    declared: u64,
    buffer: &mut CopyBuffer,
    name: &Path,
) -> Result<u64> {
    let mut limited = (&mut *reader).take(declared);
    let copied = copy_with_buffer(&mut limited, writer, buffer)
        .map_err(|source| InstallError::io("extract", name, source))?;

    if copied < declared {
        return Err(InstallError::InvalidArchive(format!(
            "entry {} is truncated: declared {declared} bytes, got {copied}",
            name.display()
        )));
    }

    if probe(reader).map_err(|source| InstallError::io("extract", name, source))? {
        return Err(InstallError::InvalidArchive(format!(
            "entry {} is larger than its declared size of {declared} bytes",
            name.display()
        )));
    }

    Ok(copied)
}

/// Returns `true` if `reader` yields at least one more byte.
fn probe<R: Read + ?Sized>(reader: &mut R) -> io::Result<bool> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(n) => return Ok(n > 0),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}
