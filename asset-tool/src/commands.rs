//! Subcommands of the asset tool.

use crate::watch::watch;
use assets::sidecar::{read_texture_settings, write_texture_settings};
use assets::{AssetHandle, AssetManager, AssetType, LoadReport, Settings, TextureImportSettings};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Loads the registry, rescans the asset root and saves the registry.
    Scan,
    /// Prints all registered assets.
    List {
        /// Only print assets of this type (e.g. "Texture", "Environment Map").
        #[structopt(short = "t", long = "type")]
        kind: Option<AssetType>,
    },
    /// Registers a single file and prints its handle.
    Import {
        #[structopt(parse(from_os_str))]
        path: PathBuf,
    },
    /// Records that the file of an asset was moved.
    Move {
        handle: u64,
        #[structopt(parse(from_os_str))]
        new_path: PathBuf,
    },
    /// Records that the file of an asset was renamed.
    Rename {
        handle: u64,
        #[structopt(parse(from_os_str))]
        new_path: PathBuf,
    },
    /// Removes an asset from the registry.
    Delete { handle: u64 },
    /// Reads or writes the texture import settings of a file.
    Meta {
        #[structopt(parse(from_os_str))]
        path: PathBuf,
        #[structopt(short, long)]
        filter: Option<i32>,
        #[structopt(short, long)]
        wrap: Option<i32>,
    },
    /// Watches the asset root and keeps the registry in sync.
    Watch {
        /// Watch even if watching is disabled in the settings.
        #[structopt(long)]
        force: bool,
    },
}

pub fn run(
    command: &Command,
    settings: &Settings,
    manager: &mut AssetManager,
    report: &LoadReport,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Scan => print_report(report),
        Command::List { kind } => list(manager, *kind),
        Command::Import { path } => {
            let handle = manager.import_asset(path);
            manager.serialize_registry()?;
            println!("{}", handle);
        }
        Command::Move { handle, new_path } => {
            let handle = AssetHandle::from_raw(*handle);
            print_changed(manager.on_asset_moved(handle, new_path), handle);
        }
        Command::Rename { handle, new_path } => {
            let handle = AssetHandle::from_raw(*handle);
            print_changed(manager.on_asset_renamed(handle, new_path), handle);
        }
        Command::Delete { handle } => {
            let handle = AssetHandle::from_raw(*handle);
            print_changed(manager.on_asset_deleted(handle), handle);
        }
        Command::Meta { path, filter, wrap } => {
            let path = manager.library().disk_path(&manager.relative_path(path));
            let mut current = read_texture_settings(&path);

            if filter.is_some() || wrap.is_some() {
                current = TextureImportSettings {
                    filter: filter.unwrap_or(current.filter),
                    wrap: wrap.unwrap_or(current.wrap),
                };
                write_texture_settings(&path, &current)?;
            }

            println!("filter={:?} ({})", current.filter_mode(), current.filter);
            println!("wrap={:?} ({})", current.wrap_mode(), current.wrap);
        }
        Command::Watch { force } => watch(settings, manager, *force)?,
    }

    Ok(())
}

fn print_changed(changed: bool, handle: AssetHandle) {
    if changed {
        println!("ok");
    } else {
        println!("asset {} is not registered", handle);
    }
}

fn list(manager: &AssetManager, filter: Option<AssetType>) {
    let mut entries: Vec<_> = manager
        .registry()
        .iter()
        .filter(|m| filter.map_or(true, |t| m.asset_type == t))
        .collect();
    entries.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    for metadata in entries {
        println!(
            "{:<20}  {:<16}  {}",
            metadata.handle,
            metadata.asset_type,
            metadata.file_path.display()
        );
    }
}

fn print_report(report: &LoadReport) {
    println!("loaded={}", report.loaded);
    println!("scanned={}", report.scan.scanned);
    println!("imported={}", report.scan.imported);
    println!("tracked={}", report.scan.tracked);
    println!("unsupported={}", report.scan.unsupported);

    if let Some(reason) = &report.corrupted {
        println!("registry was corrupted and rebuilt: {}", reason);
    }

    for rejected in &report.rejected {
        println!(
            "rejected {} {:?}: {}",
            rejected.record.handle, rejected.record.file_path, rejected.reason
        );
    }

    for recovered in &report.recovered {
        println!(
            "recovered {} {} -> {}",
            recovered.handle,
            recovered.from.display(),
            recovered.to.display()
        );
    }

    for orphaned in &report.orphaned {
        println!(
            "orphaned {} {} {}",
            orphaned.handle,
            orphaned.asset_type,
            orphaned.file_path.display()
        );
    }
}
