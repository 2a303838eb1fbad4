//! Old-format ASCII cpio ("odc") encoder.
//!
//! The drop protocol bundles files as a gzip-compressed odc archive. Only
//! regular-file entries with fixed `0644` permissions are ever emitted; no
//! timestamps, ownership, symlinks, or device nodes. The odc header is 76
//! bytes of ASCII octal fields, magic `070707`, and carries no body
//! padding, so entry bodies can be streamed straight through.

use std::io::{self, Write};

/// Header magic for the old ASCII (odc) format.
const MAGIC: &str = "070707";

/// Entry name that terminates an odc archive.
const TRAILER_NAME: &str = "TRAILER!!!";

/// Fixed mode for every emitted entry: regular file, rw-r--r--.
const ENTRY_MODE: u32 = 0o100644;

/// Largest value an 11-digit octal field can carry.
const MAX_FILE_SIZE: u64 = 0o77777777777;

/// Writes an odc stream entry by entry. The header carries the body size,
/// so callers must know each entry's exact length before `begin_entry` and
/// then write exactly that many bytes through the `Write` impl.
pub struct OdcWriter<W: Write> {
    inner: W,
    next_ino: u32,
}

impl<W: Write> OdcWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, next_ino: 1 }
    }

    /// Write the header and name for the next entry. The next `size` bytes
    /// written through this writer form the entry body.
    pub fn begin_entry(&mut self, name: &str, size: u64) -> io::Result<()> {
        if name.contains('\0') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "entry name contains NUL",
            ));
        }
        let ino = self.next_ino;
        self.next_ino = self.next_ino.wrapping_add(1);
        self.write_header(name, ENTRY_MODE, ino, size)
    }

    /// Write the trailer entry and hand back the underlying writer. Must
    /// be called on every exit path so the archive is structurally
    /// complete even after a body failure.
    pub fn finish(mut self) -> io::Result<W> {
        self.write_header(TRAILER_NAME, 0, 0, 0)?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn write_header(&mut self, name: &str, mode: u32, ino: u32, size: u64) -> io::Result<()> {
        if size > MAX_FILE_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("entry `{name}` too large for odc archive"),
            ));
        }
        // 76-byte header: all fields ASCII octal, zero-padded.
        let mut header = String::with_capacity(76 + name.len() + 1);
        header.push_str(MAGIC);
        push_octal(&mut header, 0, 6); // dev
        push_octal(&mut header, u64::from(ino & 0o777777), 6);
        push_octal(&mut header, u64::from(mode), 6);
        push_octal(&mut header, 0, 6); // uid
        push_octal(&mut header, 0, 6); // gid
        push_octal(&mut header, 1, 6); // nlink
        push_octal(&mut header, 0, 6); // rdev
        push_octal(&mut header, 0, 11); // mtime
        push_octal(&mut header, name.len() as u64 + 1, 6); // namesize incl. NUL
        push_octal(&mut header, size, 11);
        self.inner.write_all(header.as_bytes())?;
        self.inner.write_all(name.as_bytes())?;
        self.inner.write_all(&[0])?;
        Ok(())
    }
}

impl<W: Write> Write for OdcWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn push_octal(out: &mut String, value: u64, width: usize) {
    let digits = format!("{value:0width$o}");
    debug_assert_eq!(digits.len(), width);
    out.push_str(&digits);
}
