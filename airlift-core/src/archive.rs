//! Streaming archive packager: ordered content sources in, one
//! gzip-compressed odc cpio stream out.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::cpio::OdcWriter;

/// One named payload to pack. The packager owns the reader only while
/// writing its entry and drops it before the next entry starts, so at
/// most one source is open at a time.
pub struct ContentSource {
    name: String,
    reader: Box<dyn Read>,
    declared_size: Option<u64>,
}

impl ContentSource {
    /// Source whose exact length is known up front; its body is streamed
    /// straight into the archive.
    pub fn known(name: impl Into<String>, size: u64, reader: impl Read + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
            declared_size: Some(size),
        }
    }

    /// Source whose length is unknown until fully read. The odc header
    /// must carry the size before the body, so this path buffers the
    /// whole stream in memory first.
    pub fn unknown(name: impl Into<String>, reader: impl Read + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
            declared_size: None,
        }
    }

    /// Known-size source backed by a regular file; the entry name is the
    /// file name component of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "path has no usable file name")
            })?
            .to_owned();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self::known(name, size, file))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Pack `sources` into `output` in input order.
///
/// Both the gzip encoder and the cpio encoder are finalized on every exit
/// path, inner before outer, so even a failed pack leaves a trailer and
/// footer behind it; a finalization failure never masks an earlier body
/// error. Fails with an I/O error on any read/write failure or when a
/// source yields a different number of bytes than it declared.
pub fn pack<W: Write>(sources: Vec<ContentSource>, output: W) -> io::Result<()> {
    let gz = GzEncoder::new(output, Compression::default());
    let mut cpio = OdcWriter::new(gz);

    let body = write_entries(&mut cpio, sources);
    let finish = cpio.finish().and_then(|gz| gz.finish().map(|_| ()));
    // First error wins.
    body.and(finish)
}

fn write_entries<W: Write>(cpio: &mut OdcWriter<W>, sources: Vec<ContentSource>) -> io::Result<()> {
    for source in sources {
        // `source` (and its reader) drops at the end of this iteration,
        // bounding open streams to one.
        let ContentSource {
            name,
            mut reader,
            declared_size,
        } = source;
        match declared_size {
            Some(size) => {
                cpio.begin_entry(&name, size)?;
                copy_exact(&name, &mut reader, cpio, size)?;
            }
            None => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                cpio.begin_entry(&name, buf.len() as u64)?;
                cpio.write_all(&buf)?;
            }
        }
        log::debug!("packed entry {name}");
    }
    Ok(())
}

/// Stream exactly `size` bytes from `reader` into `out`. A short or long
/// source is a hard error: the header already declared the size and the
/// format cannot back-patch it.
fn copy_exact<W: Write>(
    name: &str,
    reader: &mut dyn Read,
    out: &mut W,
    size: u64,
) -> io::Result<()> {
    let copied = io::copy(&mut (&mut *reader).take(size), out)?;
    if copied < size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("source `{name}` declared {size} bytes but yielded {copied}"),
        ));
    }
    // Probe one byte past the declared size to catch overlong sources.
    let mut probe = [0u8; 1];
    if reader.read(&mut probe)? != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("source `{name}` yielded more than the declared {size} bytes"),
        ));
    }
    Ok(())
}
