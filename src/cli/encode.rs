use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};
use eyre::eyre;
use thingsmith::utils::img_stuffs::open_rgba8;

use super::*;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct EncodeCli {
    // This is just dummy command because we are already in the command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 32x32 PNG to compressed sprite bytes
    Encode {
        /// Input .png, must be 32x32
        #[arg(short)]
        input: PathBuf,
        /// Output file for the raw sprite bytes
        #[arg(short)]
        output: PathBuf,
        /// Prefixes the bytes with the color key header some clients store
        #[arg(short = 'k', long)]
        color_key: bool,
        /// Client version such as 8.60, overrides the config
        #[arg(long)]
        client_version: Option<String>,
        /// Path to config.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub struct Encode;

fn encode(
    input: PathBuf,
    output: PathBuf,
    color_key: bool,
    client_version: Option<String>,
    config: Option<PathBuf>,
) -> eyre::Result<()> {
    let features = feature_set(client_version, config)?;

    let img = open_rgba8(&input)?;
    let pixels = spr::PixelBuffer::from_rgba8(&img)?;

    let bytes = if color_key {
        spr::encode_with_color_key(&pixels, features)
    } else {
        spr::encode(&pixels, features)
    };

    fs::write(&output, &bytes)
        .map_err(|err| eyre!("Cannot write {}: {err}", output.display()))?;

    info!(
        "Encoded {} into {} ({} bytes)",
        input.display(),
        output.display(),
        bytes.len()
    );

    Ok(())
}

impl Cli for Encode {
    fn name(&self) -> &'static str {
        "encode"
    }

    fn cli(&self) -> CliRes {
        let cli = EncodeCli::parse();

        let Commands::Encode {
            input,
            output,
            color_key,
            client_version,
            config,
        } = cli.command;

        match encode(input, output, color_key, client_version, config) {
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
