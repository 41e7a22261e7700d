use crate::commands::Command;
use assets::{AssetManager, Classifier, Codecs, Settings};
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

pub mod commands;
pub mod watch;

#[derive(StructOpt, Debug)]
#[structopt(name = "asset-tool", about = "Inspects and maintains the asset registry of a project.")]
pub struct Parameters {
    /// Settings file. Defaults to $ASSET_SETTINGS or ./asset_settings.json.
    #[structopt(short, long, parse(from_os_str))]
    settings: Option<PathBuf>,

    /// Asset root directory. Overrides the value from the settings file.
    #[structopt(short, long, parse(from_os_str))]
    root: Option<PathBuf>,

    #[structopt(subcommand)]
    command: Command,
}

fn load_settings(params: &Parameters) -> Result<Settings, assets::SettingsError> {
    let mut settings = match (&params.settings, &params.root) {
        (Some(file), _) => Settings::load_from(file)?,
        (None, Some(root)) => Settings::new(root),
        (None, None) => Settings::load()?,
    };

    if let Some(root) = &params.root {
        settings.asset_root = root.clone();
    }

    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let params = Parameters::from_args();
    let settings = load_settings(&params)?;

    info!("Using asset root {:?}", settings.asset_root);

    let mut manager = AssetManager::new(&settings, Classifier::default(), Codecs::new());
    let report = manager.init();

    let result = commands::run(&params.command, &settings, &mut manager, &report);
    manager.shutdown();

    result
}
