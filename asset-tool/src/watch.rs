//! Keeps the registry in sync with file system changes under the asset root.

use assets::{AssetManager, Settings};
use log::{debug, info, warn};
use notify::{watcher, DebouncedEvent, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

/// Watches the asset root until the watcher channel closes.
///
/// Events are handled on the calling thread, one at a time.
pub fn watch(settings: &Settings, manager: &mut AssetManager, force: bool) -> notify::Result<()> {
    // if user disabled watching do not start watcher service
    if !settings.watch && !force {
        info!("File-system watcher is disabled. Enable it in the settings or pass --force.");
        return Ok(());
    }

    let (tx, rx) = channel();
    let mut watcher = watcher(tx, Duration::from_secs(1))?;

    let root = manager.library().root().to_path_buf();
    info!("Watching directory {:?} for changes...", root);
    watcher.watch(&root, RecursiveMode::Recursive)?;

    for event in rx {
        handle_event(manager, event);
    }

    Ok(())
}

fn track(manager: &mut AssetManager, path: &Path) {
    let handle = manager.import_asset(path);
    if handle.is_valid() {
        info!("Tracking {:?} as {}", manager.relative_path(path), handle);
        if let Err(e) = manager.serialize_registry() {
            warn!("Cannot save asset registry: {}", e);
        }
    }
}

fn handle_event(manager: &mut AssetManager, event: DebouncedEvent) {
    match event {
        DebouncedEvent::Create(path) => track(manager, &path),
        DebouncedEvent::Remove(path) => {
            let handle = manager.handle_for_path(&path);
            if manager.on_asset_deleted(handle) {
                info!("Stopped tracking {:?}", manager.relative_path(&path));
            }
        }
        DebouncedEvent::Rename(from, to) => {
            let handle = manager.handle_for_path(&from);
            if handle.is_valid() {
                manager.on_asset_renamed(handle, &to);
                info!("Asset {} renamed to {:?}", handle, manager.relative_path(&to));
            } else {
                let moved = manager.on_directory_moved(&from, &to);
                if moved > 0 {
                    info!("Moved {} assets to {:?}", moved, manager.relative_path(&to));
                } else {
                    track(manager, &to);
                }
            }
        }
        DebouncedEvent::Rescan => {
            manager.reload_assets();
        }
        DebouncedEvent::Error(e, path) => warn!("watch error at {:?}: {}", path, e),
        other => debug!("Ignoring {:?}", other),
    }
}
