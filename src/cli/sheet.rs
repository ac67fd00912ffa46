use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use dat::{FrameGroupDimensions, ThingCategory};
use eyre::eyre;
use thingsmith::{
    modules::{
        import_sheet::ImportSheet,
        project::{Project, ThingRef},
    },
    utils::img_stuffs::open_rgba8,
};

use super::*;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct SheetCli {
    // This is just dummy command because we are already in the command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Category {
    Item,
    Outfit,
    Effect,
    Missile,
}

impl From<Category> for ThingCategory {
    fn from(value: Category) -> Self {
        match value {
            Category::Item => ThingCategory::Item,
            Category::Outfit => ThingCategory::Outfit,
            Category::Effect => ThingCategory::Effect,
            Category::Missile => ThingCategory::Missile,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Imports a sprite sheet as a new object
    Sheet {
        /// Input sprite sheet .png
        #[arg(short)]
        input: PathBuf,
        /// Output folder for the preview and the compressed sprites
        #[arg(short)]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = Category::Item)]
        category: Category,
        /// In tiles
        #[arg(long, default_value_t = 1)]
        width: u8,
        /// In tiles
        #[arg(long, default_value_t = 1)]
        height: u8,
        #[arg(long, default_value_t = 1)]
        layers: u8,
        #[arg(long, default_value_t = 1)]
        pattern_x: u8,
        #[arg(long, default_value_t = 1)]
        pattern_y: u8,
        #[arg(long, default_value_t = 1)]
        pattern_z: u8,
        #[arg(long, default_value_t = 1)]
        frames: u8,
        /// Client version such as 8.60, overrides the config
        #[arg(long)]
        client_version: Option<String>,
        /// Path to config.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub struct Sheet;

struct SheetArgs {
    input: PathBuf,
    output: PathBuf,
    category: ThingCategory,
    dimensions: FrameGroupDimensions,
}

/// Writes `preview.png` plus one `<sprite id>.bin` per new sprite into the output folder.
fn sheet(args: SheetArgs, features: ClientFeatureSet) -> eyre::Result<()> {
    let SheetArgs {
        input,
        output,
        category,
        dimensions,
    } = args;

    let img = open_rgba8(&input)?;
    let mut project = Project::new(features);

    let id = ImportSheet::new(category)
        .dimensions(dimensions)
        .run(&mut project, &img)?;

    fs::create_dir_all(&output)
        .map_err(|err| eyre!("Cannot create {}: {err}", output.display()))?;

    let preview = project.composite(ThingRef::new(category, id), 0, 0, 0, 0)?;

    if !preview.is_empty() {
        preview.to_rgba8()?.save(output.join("preview.png"))?;
    }

    for (sprite_id, bytes) in project.sprites().iter() {
        fs::write(output.join(format!("{sprite_id}.bin")), bytes)?;
    }

    info!(
        "Wrote {} sprites of {} {} to {}",
        project.sprites().len(),
        category,
        id,
        output.display()
    );

    Ok(())
}

impl Cli for Sheet {
    fn name(&self) -> &'static str {
        "sheet"
    }

    fn cli(&self) -> CliRes {
        let cli = SheetCli::parse();

        let Commands::Sheet {
            input,
            output,
            category,
            width,
            height,
            layers,
            pattern_x,
            pattern_y,
            pattern_z,
            frames,
            client_version,
            config,
        } = cli.command;

        let args = SheetArgs {
            input,
            output,
            category: category.into(),
            dimensions: FrameGroupDimensions {
                width,
                height,
                layers,
                pattern_x,
                pattern_y,
                pattern_z,
                frames,
            },
        };

        let res = feature_set(client_version, config).and_then(|features| sheet(args, features));

        match res {
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
