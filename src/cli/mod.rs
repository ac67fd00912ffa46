use std::path::PathBuf;

use common::{ClientFeatureSet, ClientVersion};
use log::{info, warn};
use thingsmith::config::{parse_config, parse_config_from_file};

use self::{decode::Decode, encode::Encode, sheet::Sheet};

mod decode;
mod encode;
mod sheet;

pub enum CliRes {
    Ok,
    Err,
    NoCli,
}

pub trait Cli {
    fn name(&self) -> &'static str;
    /// Each module has to handle the arguments by itself.
    fn cli(&self) -> CliRes;
    fn cli_help(&self);
}

/// Runs command-line options
pub fn cli() -> CliRes {
    let args: Vec<String> = std::env::args().collect();

    // No arguments
    if args.len() <= 1 {
        return CliRes::NoCli;
    }

    // Add new modules here.
    let modules: &[&dyn Cli] = &[&Decode, &Encode, &Sheet];

    let help = || {
        println!(
            "\
thingsmith

Available modules:"
        );
        for module in modules {
            println!("{}", module.name());
        }
    };

    let command = &args[1];

    for module in modules {
        if command == module.name() {
            return module.cli();
        }
    }

    // In case nothing fits then prints this again.
    help();

    CliRes::Err
}

/// `--client-version` wins over `--config`, which wins over `config.toml` beside the binary.
pub(crate) fn feature_set(
    client_version: Option<String>,
    config: Option<PathBuf>,
) -> eyre::Result<ClientFeatureSet> {
    if let Some(version) = client_version {
        let version: ClientVersion = version.parse()?;
        info!("Using client {version}");

        return Ok(ClientFeatureSet::resolve(version));
    }

    let config = match config {
        Some(path) => parse_config_from_file(&path)?,
        None => match parse_config() {
            Ok(config) => config,
            Err(err) => {
                let features = ClientFeatureSet::default();
                warn!("{err}. Falling back to client {}", features.version);

                return Ok(features);
            }
        },
    };

    let features = config.feature_set()?;
    info!("Using client {} from config", features.version);

    Ok(features)
}
