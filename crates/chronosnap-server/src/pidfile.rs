//! PID file management, preventing duplicate daemon instances.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, info, warn};

use crate::error::{ServerError, ServerResult};

/// PID file manager. Created on startup, removed on drop.
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Creates a PID file at the given path.
    ///
    /// Returns an error if another instance is already running; stale or
    /// invalid PID files are removed.
    pub fn create(path: impl Into<PathBuf>) -> ServerResult<Self> {
        let path = path.into();

        if path.exists() {
            match Self::read_pid(&path) {
                Ok(pid) => {
                    if Self::is_process_running(pid) {
                        return Err(ServerError::already_running(path.to_string_lossy()));
                    }
                    warn!(path = %path.display(), pid = pid, "removing stale PID file");
                    fs::remove_file(&path)?;
                }
                Err(_) => {
                    warn!(path = %path.display(), "removing invalid PID file");
                    fs::remove_file(&path)?;
                }
            }
        }

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let pid = process::id();
        let mut file = File::create(&path)?;
        writeln!(file, "{}", pid)?;
        file.sync_all()?;

        info!(path = %path.display(), pid = pid, "created PID file");

        Ok(Self { path })
    }

    /// Returns the path to the PID file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_pid(path: &Path) -> ServerResult<u32> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let pid = contents
            .trim()
            .parse::<u32>()
            .map_err(|_| ServerError::config(format!("invalid PID in file: {}", contents.trim())))?;
        Ok(pid)
    }

    #[cfg(unix)]
    fn is_process_running(pid: u32) -> bool {
        // Signal 0 checks process existence without sending anything.
        unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
    }

    #[cfg(not(unix))]
    fn is_process_running(_pid: u32) -> bool {
        true
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to remove PID file");
            } else {
                debug!(path = %self.path.display(), "removed PID file");
            }
        }
    }
}

/// Returns the default PID file path.
///
/// Uses `$XDG_RUNTIME_DIR/chronosnap.pid` if available,
/// otherwise falls back to `/tmp/chronosnap-$UID.pid`.
pub fn default_pid_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("chronosnap.pid")
    } else {
        #[cfg(unix)]
        let uid = unsafe { libc::getuid() };
        #[cfg(not(unix))]
        let uid = 0;
        PathBuf::from(format!("/tmp/chronosnap-{}.pid", uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn pidfile_create_and_remove() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("test.pid");

        {
            let _pidfile = PidFile::create(&pid_path).unwrap();
            assert!(pid_path.exists());

            let contents = fs::read_to_string(&pid_path).unwrap();
            let stored_pid: u32 = contents.trim().parse().unwrap();
            assert_eq!(stored_pid, process::id());
        }

        assert!(!pid_path.exists());
    }

    #[test]
    fn pidfile_rejects_duplicate() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("test.pid");

        let _pidfile1 = PidFile::create(&pid_path).unwrap();

        let result = PidFile::create(&pid_path);
        assert!(matches!(result, Err(ServerError::AlreadyRunning { .. })));
    }

    #[test]
    fn pidfile_removes_stale() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("test.pid");

        // A PID that is almost certainly not running.
        fs::write(&pid_path, "999999999\n").unwrap();

        let pidfile = PidFile::create(&pid_path).unwrap();
        assert!(pid_path.exists());
        drop(pidfile);
    }

    #[test]
    fn pidfile_removes_invalid() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("test.pid");

        fs::write(&pid_path, "not-a-pid\n").unwrap();

        let pidfile = PidFile::create(&pid_path).unwrap();
        assert!(pid_path.exists());
        drop(pidfile);
    }

    #[test]
    fn default_pid_path_format() {
        let path = default_pid_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("chronosnap"));
        assert!(path_str.ends_with(".pid"));
    }
}
