//! Thin, stateless operations over the filesystem: stat, streamed reads
//! (whole or single byte range), streamed writes, and deletion. Every
//! failure is converted into the `LdpError` taxonomy at its origin.

use crate::errors::LdpError;
use anyhow::{Error, Result};
use chrono::prelude::*;
use log::debug;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Stat-derived attributes of a resource.
#[derive(Debug, Clone)]
pub struct ResourceStat {
    pub is_container: bool,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// A single inclusive byte range, as in `bytes=start-end`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

/// The `Content-Range` bookkeeping the caller needs to set response headers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ContentRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ContentRange {
    /// Number of bytes actually served.
    pub fn chunk_len(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl std::fmt::Display for ContentRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Returns the stat attributes for `path`, or `NotFound`/`Io`.
pub fn stat(path: &Path) -> Result<ResourceStat> {
    let metadata = std::fs::metadata(path).map_err(|e| Error::new(LdpError::from_io(path, e)))?;
    let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
    Ok(ResourceStat {
        is_container: metadata.is_dir(),
        size: metadata.len(),
        modified,
    })
}

/// Opens `path` for streaming. With a byte range, the total size is queried
/// first so the returned `ContentRange` carries `start-end/total`; an `end`
/// past the last byte is clamped, while an inverted range or a `start` at or
/// past the end of the resource is an `Io` error.
pub fn read(
    path: &Path,
    range: Option<ByteRange>,
) -> Result<(Box<dyn Read + Send>, Option<ContentRange>)> {
    let mut file = File::open(path).map_err(|e| Error::new(LdpError::from_io(path, e)))?;
    let Some(range) = range else {
        return Ok((Box::new(file), None));
    };
    if range.end < range.start {
        return Err(Error::new(LdpError::Io {
            path: path.to_path_buf(),
            message: format!("byte range ends at {} before it starts at {}", range.end, range.start),
        }));
    }
    let total = file
        .metadata()
        .map_err(|e| Error::new(LdpError::from_io(path, e)))?
        .len();
    if range.start >= total {
        return Err(Error::new(LdpError::Io {
            path: path.to_path_buf(),
            message: format!("byte range starts at {} but resource has {} bytes", range.start, total),
        }));
    }
    let end = range.end.min(total.saturating_sub(1));
    file.seek(SeekFrom::Start(range.start))
        .map_err(|e| Error::new(LdpError::from_io(path, e)))?;
    let content_range = ContentRange {
        start: range.start,
        end,
        total,
    };
    let chunk = file.take(content_range.chunk_len());
    debug!("Serving {} from {}", content_range, path.display());
    Ok((Box::new(chunk), Some(content_range)))
}

/// Reads the whole resource into memory. Used for metadata seeds and the
/// `graph` operation, where the content is parsed immediately.
pub fn read_to_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::new(LdpError::from_io(path, e)))
}

/// Streams `content` into `path`, overwriting wholesale. Parent directories
/// are created on demand so a PUT deep into an unmaterialized container
/// succeeds.
pub fn write(path: &Path, mut content: impl Read) -> Result<u64> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::new(LdpError::from_io(path, e)))?;
    }
    let mut file = File::create(path).map_err(|e| Error::new(LdpError::from_io(path, e)))?;
    let written = std::io::copy(&mut content, &mut file)
        .map_err(|e| Error::new(LdpError::from_io(path, e)))?;
    debug!("Wrote {} bytes to {}", written, path.display());
    Ok(written)
}

/// Deletes the resource at `path`. A container is removed together with its
/// members and auxiliary resources.
pub fn delete(path: &Path) -> Result<()> {
    let attrs = stat(path)?;
    let result = if attrs.is_container {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| Error::new(LdpError::from_io(path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_stat_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = stat(&dir.path().join("absent")).unwrap_err();
        let kind = err.downcast_ref::<LdpError>().unwrap();
        assert!(kind.is_not_found());
    }

    #[test]
    fn test_stat_through_regular_file_is_not_found() {
        // a path descending through a file names nothing, same as absence
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, b"plain").unwrap();

        let err = stat(&file.join("child")).unwrap_err();
        let kind = err.downcast_ref::<LdpError>().unwrap();
        assert!(kind.is_not_found(), "got {}", kind);
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep/nested/blob.bin");
        let payload = b"hello resource store".to_vec();
        let written = write(&path, std::io::Cursor::new(payload.clone())).unwrap();
        assert_eq!(written, payload.len() as u64);

        let (mut stream, range) = read(&path, None).unwrap();
        assert!(range.is_none());
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn test_ranged_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hundred.bin");
        let payload: Vec<u8> = (0u8..100).collect();
        write(&path, std::io::Cursor::new(payload.clone())).unwrap();

        let (mut stream, range) = read(&path, Some(ByteRange { start: 10, end: 19 })).unwrap();
        let range = range.unwrap();
        assert_eq!(range.to_string(), "bytes 10-19/100");
        assert_eq!(range.chunk_len(), 10);
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, payload[10..20].to_vec());
    }

    #[test]
    fn test_ranged_read_clamps_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        write(&path, std::io::Cursor::new(vec![7u8; 20])).unwrap();

        let (mut stream, range) = read(&path, Some(ByteRange { start: 10, end: 500 })).unwrap();
        assert_eq!(range.unwrap().to_string(), "bytes 10-19/20");
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn test_ranged_read_rejects_inverted_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hundred.bin");
        write(&path, std::io::Cursor::new((0u8..100).collect::<Vec<u8>>())).unwrap();

        let err = read(&path, Some(ByteRange { start: 19, end: 10 })).err().unwrap();
        let kind = err.downcast_ref::<LdpError>().unwrap();
        assert!(matches!(kind, LdpError::Io { .. }), "got {}", kind);
    }

    #[test]
    fn test_ranged_read_start_past_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        write(&path, std::io::Cursor::new(vec![7u8; 20])).unwrap();

        let err = read(&path, Some(ByteRange { start: 20, end: 25 })).err().unwrap();
        let kind = err.downcast_ref::<LdpError>().unwrap();
        assert!(matches!(kind, LdpError::Io { .. }));
    }

    #[test]
    fn test_delete_idempotence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        write(&path, std::io::Cursor::new(b"x".to_vec())).unwrap();
        delete(&path).unwrap();

        // repeated deletes surface NotFound rather than crashing
        for _ in 0..3 {
            let err = delete(&path).unwrap_err();
            assert!(err.downcast_ref::<LdpError>().unwrap().is_not_found());
        }
    }
}
