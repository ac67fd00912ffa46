use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};
use eyre::eyre;

use super::*;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct DecodeCli {
    // This is just dummy command because we are already in the command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compressed sprite bytes to a 32x32 PNG
    Decode {
        /// Raw sprite bytes, as stored for one sprite id
        #[arg(short)]
        input: PathBuf,
        /// Output .png
        #[arg(short)]
        output: PathBuf,
        /// Client version such as 8.60, overrides the config
        #[arg(long)]
        client_version: Option<String>,
        /// Path to config.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub struct Decode;

fn decode(
    input: PathBuf,
    output: PathBuf,
    client_version: Option<String>,
    config: Option<PathBuf>,
) -> eyre::Result<()> {
    let features = feature_set(client_version, config)?;

    let bytes =
        fs::read(&input).map_err(|err| eyre!("Cannot read {}: {err}", input.display()))?;
    let pixels = spr::decode(&bytes, features);

    pixels.to_rgba8().save(&output)?;

    info!("Decoded {} into {}", input.display(), output.display());

    Ok(())
}

impl Cli for Decode {
    fn name(&self) -> &'static str {
        "decode"
    }

    fn cli(&self) -> CliRes {
        let cli = DecodeCli::parse();

        let Commands::Decode {
            input,
            output,
            client_version,
            config,
        } = cli.command;

        match decode(input, output, client_version, config) {
            Ok(_) => CliRes::Ok,
            Err(err) => {
                println!("{}", err);
                CliRes::Err
            }
        }
    }

    fn cli_help(&self) {
        // handled by clap
        unreachable!()
    }
}
