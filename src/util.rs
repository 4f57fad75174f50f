//! util: small shared helpers (time, fsync of directories, tmp paths).

use chrono::{Local, TimeZone};
use std::path::{Path, PathBuf};

use crate::consts::TMP_SUFFIX;

/// Current Unix time in seconds.
#[inline]
pub fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    now.as_secs().min(i64::MAX as u64) as i64
}

/// Render a Unix timestamp as local "YYYY-MM-DD HH:MM:SS".
pub fn format_local_time(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("@{}", secs),
    }
}

/// `<file>.tmp` next to `path`.
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.{}", name, TMP_SUFFIX))
}

// Best-effort fsync of the parent directory after a rename (Unix only).
#[cfg(unix)]
pub fn fsync_parent_dir(p: &Path) -> std::io::Result<()> {
    use std::fs::File;
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }
    Ok(())
}
#[cfg(not(unix))]
pub fn fsync_parent_dir(_p: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_secs_monotonic_nonzero() {
        let a = now_secs();
        let b = now_secs();
        assert!(a > 0);
        assert!(b >= a);
    }

    #[test]
    fn tmp_path_sits_next_to_file() {
        let p = tmp_path_for(Path::new("/data/accounts.dat"));
        assert_eq!(p, PathBuf::from("/data/accounts.dat.tmp"));
    }

    #[test]
    fn local_time_shape() {
        let s = format_local_time(1_700_000_000);
        assert_eq!(s.len(), 19);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[13..14], ":");
    }
}
