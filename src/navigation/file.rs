//! File-backed navigation fragment with change detection.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::watch;

use crate::error::RouterResult;
use crate::navigation::{publish, NavigationSource};

/// A fragment stored as the contents of a file.
///
/// External edits to the file are picked up by a `notify` watcher once
/// [`NavigationSource::subscribe`] has been called.
pub struct FileLocation {
    path: PathBuf,
    tx: Arc<watch::Sender<String>>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

fn read_fragment(path: &Path) -> std::io::Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content.trim_end_matches(['\r', '\n']).to_string())
}

impl FileLocation {
    /// Open `path`, creating an empty file if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> RouterResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            fs::write(&path, "")?;
        }
        let (tx, _) = watch::channel(read_fragment(&path)?);

        Ok(Self {
            path,
            tx: Arc::new(tx),
            watcher: Mutex::new(None),
        })
    }

}

/// Re-read the file and publish its fragment if it changed.
///
/// `fs::write` truncates before writing, so a watcher can observe an empty
/// file between the two steps. An empty read never replaces a non-empty
/// fragment.
fn refresh(tx: &watch::Sender<String>, path: &Path) -> bool {
    match read_fragment(path) {
        Ok(fragment) => {
            if fragment.is_empty() && !tx.borrow().is_empty() {
                tracing::trace!(path = ?path, "Ignoring empty read of location file");
                return false;
            }
            let changed = publish(tx, &fragment);
            if changed {
                tracing::debug!(fragment = %fragment, "Location file changed");
            }
            changed
        }
        Err(e) => {
            tracing::error!("Failed to read location file: {}", e);
            false
        }
    }
}

impl std::fmt::Debug for FileLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLocation")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl NavigationSource for FileLocation {
    fn current(&self) -> String {
        match read_fragment(&self.path) {
            Ok(fragment) => fragment,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to read location file, using last known value");
                self.tx.borrow().clone()
            }
        }
    }

    fn set(&self, fragment: &str) -> RouterResult<()> {
        fs::write(&self.path, fragment)?;
        publish(&self.tx, fragment);
        Ok(())
    }

    fn subscribe(&self) -> RouterResult<watch::Receiver<String>> {
        let mut slot = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            let tx = self.tx.clone();
            let path = self.path.clone();

            let mut watcher = RecommendedWatcher::new(
                move |res: notify::Result<Event>| match res {
                    Ok(event) => {
                        if event.kind.is_modify() || event.kind.is_create() {
                            refresh(&tx, &path);
                        }
                    }
                    Err(e) => tracing::error!("Watch error: {:?}", e),
                },
                Config::default().with_poll_interval(Duration::from_secs(2)),
            )?;
            watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

            tracing::info!(path = ?self.path, "Location watcher started");
            *slot = Some(watcher);
        }
        Ok(self.tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("location");

        let location = FileLocation::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(location.current(), "");
    }

    #[test]
    fn test_set_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("location");
        fs::write(&path, "#home\n").unwrap();

        let location = FileLocation::open(&path).unwrap();
        assert_eq!(location.current(), "#home");

        location.set("#users/7").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "#users/7");
        assert_eq!(location.current(), "#users/7");
    }

    #[tokio::test]
    async fn test_set_notifies_subscribers() {
        let dir = tempfile::tempdir().unwrap();
        let location = FileLocation::open(dir.path().join("location")).unwrap();
        let mut rx = location.subscribe().unwrap();

        location.set("#about").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "#about");
    }

    #[test]
    fn test_refresh_skips_truncated_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("location");
        fs::write(&path, "#x").unwrap();
        let (tx, rx) = watch::channel("#x".to_string());

        fs::write(&path, "").unwrap();
        assert!(!refresh(&tx, &path));
        assert_eq!(*rx.borrow(), "#x");

        fs::write(&path, "#x\n").unwrap();
        assert!(!refresh(&tx, &path));
        assert!(!rx.has_changed().unwrap());

        fs::write(&path, "#y").unwrap();
        assert!(refresh(&tx, &path));
        assert_eq!(*rx.borrow(), "#y");
    }

    #[tokio::test]
    async fn test_external_rewrite_with_same_fragment_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("location");
        fs::write(&path, "#x").unwrap();

        let location = FileLocation::open(&path).unwrap();
        let mut rx = location.subscribe().unwrap();

        for _ in 0..10 {
            fs::write(&path, "#x").unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!rx.has_changed().unwrap());

        fs::write(&path, "#y").unwrap();
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("watcher did not report the external edit")
            .unwrap();
        assert_eq!(*rx.borrow_and_update(), "#y");
    }
}
