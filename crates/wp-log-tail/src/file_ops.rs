//! Clearing and exporting watched log files

use crate::error::TailError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Truncate a log file to zero bytes
///
/// A watch on the file sees this as a truncation and reports nothing.
pub async fn clear_log_file(path: &Path) -> Result<(), TailError> {
    tokio::fs::write(path, b"")
        .await
        .map_err(|e| TailError::io(path, e))?;
    log::info!("Cleared {}", path.display());
    Ok(())
}

/// File name for an exported copy: `<name>_export_<YYYY-MM-DDTHH-MM-SS>.log`
///
/// The first `.log` in the file name is dropped, so `debug.log` becomes
/// `debug_export_2024-01-01T00-00-00.log`.
pub fn export_file_name(path: &Path, now: DateTime<Utc>) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    let stem = file_name.replacen(".log", "", 1);

    format!("{}_export_{}.log", stem, now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Copy a log file into `dest_dir` under a timestamped name
///
/// Returns the path of the written copy.
pub async fn export_log_file(path: &Path, dest_dir: &Path) -> Result<PathBuf, TailError> {
    let target = dest_dir.join(export_file_name(path, Utc::now()));

    let content = tokio::fs::read(path)
        .await
        .map_err(|e| TailError::io(path, e))?;
    tokio::fs::write(&target, content)
        .await
        .map_err(|e| TailError::io(&target, e))?;

    log::info!("Exported {} to {}", path.display(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_export_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(
            export_file_name(Path::new("/var/www/wp-content/debug.log"), now),
            "debug_export_2024-03-05T14-07-09.log"
        );
        assert_eq!(
            export_file_name(Path::new("php-errors.txt"), now),
            "php-errors.txt_export_2024-03-05T14-07-09.log"
        );
    }

    #[tokio::test]
    async fn test_clear_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        std::fs::write(&path, "lots of errors\n").unwrap();

        clear_log_file(&path).await.unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_export_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        let out = tempfile::tempdir().unwrap();
        std::fs::write(&path, "[01-Jan-2024 00:00:00 UTC] Error A\n").unwrap();

        let exported = export_log_file(&path, out.path()).await.unwrap();
        assert!(exported.starts_with(out.path()));
        assert!(exported
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("debug_export_"));
        assert_eq!(
            std::fs::read_to_string(&exported).unwrap(),
            "[01-Jan-2024 00:00:00 UTC] Error A\n"
        );
    }

    #[tokio::test]
    async fn test_export_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_log_file(&dir.path().join("nope.log"), dir.path()).await;
        assert!(matches!(result, Err(TailError::Io { .. })));
    }
}
