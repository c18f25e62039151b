//! Incremental Reader
//!
//! Reads only the byte range appended to a growing file.

use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Read bytes `[start, end)` of `path` and decode them as text
///
/// Invalid UTF-8 sequences are replaced rather than rejected, since a writer
/// may still be in the middle of a multi-byte character. If the file shrank
/// meanwhile, fewer bytes are returned.
pub async fn read_range(path: &Path, start: u64, end: u64) -> std::io::Result<String> {
    let len = end.saturating_sub(start);
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(start)).await?;

    let mut buf = Vec::with_capacity(len.min(1 << 20) as usize);
    file.take(len).read_to_end(&mut buf).await?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_only_requested_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        std::fs::write(&path, "old line\nnew line\n").unwrap();

        let content = read_range(&path, 9, 18).await.unwrap();
        assert_eq!(content, "new line\n");
    }

    #[tokio::test]
    async fn test_range_past_end_is_short() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        std::fs::write(&path, "abc").unwrap();

        assert_eq!(read_range(&path, 1, 100).await.unwrap(), "bc");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        std::fs::write(&path, [b'o', b'k', 0xff]).unwrap();

        assert_eq!(read_range(&path, 0, 3).await.unwrap(), "ok\u{fffd}");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_range(&dir.path().join("nope.log"), 0, 1).await.is_err());
    }
}
