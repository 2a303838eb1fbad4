//! Transfer sink: copy an inbound named byte stream to durable storage.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Copy `input` to `dest_dir/<sanitized file_name>` and return the path
/// written.
///
/// Inbound names come from the remote peer and are untrusted: only the
/// final path component is kept, and names that reduce to nothing are
/// refused, so a crafted name cannot escape `dest_dir`. An existing file
/// with the same name is overwritten. The copy goes through a bounded
/// buffer; on failure the partial file is left in place for the caller to
/// surface or clean up, and the write handle is flushed and released on
/// both paths. The first error encountered is the one returned.
pub fn receive(file_name: &str, input: &mut dyn Read, dest_dir: &Path) -> io::Result<PathBuf> {
    let name = sanitized_name(file_name)?;
    if name != file_name {
        log::warn!("stripped path components from inbound name {file_name:?}");
    }
    let path = dest_dir.join(name);
    log::debug!("receiving {name} into {}", dest_dir.display());

    let mut writer = BufWriter::new(File::create(&path)?);
    let copied = io::copy(input, &mut writer);
    let flushed = writer.flush();
    copied.and(flushed.map(|()| path))
}

/// Reduce an untrusted inbound file name to a bare file name. Separator
/// handling covers both `/` and `\` since the sender's platform is
/// unknown.
fn sanitized_name(file_name: &str) -> io::Result<&str> {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_end_matches(char::from(0));
    if name.is_empty() || name == "." || name == ".." {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unusable inbound file name {file_name:?}"),
        ));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempdir::TempDir;

    #[test]
    fn writes_stream_to_named_file() {
        let dir = TempDir::new("airlift-sink").unwrap();
        let path = receive("notes.txt", &mut Cursor::new(b"hello there"), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("notes.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello there");
    }

    #[test]
    fn second_receive_overwrites() {
        let dir = TempDir::new("airlift-sink").unwrap();
        receive("notes.txt", &mut Cursor::new(b"first, longer body"), dir.path()).unwrap();
        let path = receive("notes.txt", &mut Cursor::new(b"second"), dir.path()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn traversal_names_stay_inside_dest_dir() {
        let dir = TempDir::new("airlift-sink").unwrap();
        let path = receive("../../etc/evil.txt", &mut Cursor::new(b"x"), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("evil.txt"));
        assert!(path.exists());
    }

    #[test]
    fn backslash_separators_are_stripped_too() {
        let dir = TempDir::new("airlift-sink").unwrap();
        let path = receive(r"..\..\evil.txt", &mut Cursor::new(b"x"), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("evil.txt"));
    }

    #[test]
    fn empty_and_dot_names_are_refused() {
        let dir = TempDir::new("airlift-sink").unwrap();
        for bad in ["", ".", "..", "a/..", "dir/"] {
            let err = receive(bad, &mut Cursor::new(b"x"), dir.path()).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "name {bad:?}");
        }
    }

    #[test]
    fn stream_error_is_returned_and_partial_file_remains() {
        struct FailAfter {
            body: Vec<u8>,
            pos: usize,
        }
        impl Read for FailAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.pos >= self.body.len() {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sender vanished"));
                }
                let n = buf.len().min(self.body.len() - self.pos);
                buf[..n].copy_from_slice(&self.body[self.pos..self.pos + n]);
                self.pos += n;
                Ok(n)
            }
        }

        let dir = TempDir::new("airlift-sink").unwrap();
        let mut input = FailAfter {
            body: b"partial".to_vec(),
            pos: 0,
        };
        let err = receive("broken.bin", &mut input, dir.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        // Bytes written before the failure are flushed and observable.
        let written = std::fs::read(dir.path().join("broken.bin")).unwrap();
        assert_eq!(written, b"partial");
    }

    #[test]
    fn missing_destination_dir_is_an_error() {
        let dir = TempDir::new("airlift-sink").unwrap();
        let gone = dir.path().join("nope");
        assert!(receive("f.txt", &mut Cursor::new(b"x"), &gone).is_err());
    }
}
