use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, Receiver};
use tracing::{debug, warn};

/// Watches the settings file and reports every modification. Whether the change touched the
/// reminder namespace is decided by the receiver, which compares the loaded settings.
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<()>,
}

impl SettingsWatcher {
    /// The parent directory is watched instead of the file itself so that editors which replace
    /// the file on save are still noticed.
    pub fn new(settings_path: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel(16);
        let target: PathBuf = settings_path.to_path_buf();
        let file_name = target.file_name().map(ToOwned::to_owned);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_relevant(&event, file_name.as_deref()) => {
                    debug!("Settings file event {:?}", event.kind);
                    // A full queue already holds a pending notification.
                    let _ = tx.try_send(());
                }
                Ok(_) => {}
                Err(e) => warn!("Settings watch error {e:?}"),
            },
            Config::default(),
        )?;

        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {dir:?}"))?;

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Splits off the notification channel so the watcher can be held separately.
    pub fn into_parts(self) -> (RecommendedWatcher, Receiver<()>) {
        (self._watcher, self.rx)
    }
}

fn is_relevant(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    let touches_content = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    touches_content
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == file_name)
}
