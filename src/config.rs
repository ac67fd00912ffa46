//! Parses config file
use std::{
    env,
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
};

use common::{ClientFeatureSet, ClientVersion};
use eyre::eyre;
use serde::Deserialize;

/// Client version plus optional feature overrides.
///
/// ```toml
/// client_version = "10.98"
/// transparency = false
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub client_version: String,
    pub transparency: Option<bool>,
    pub extended: Option<bool>,
    pub frame_durations: Option<bool>,
    pub frame_groups: Option<bool>,
}

pub static CONFIG_FILE_NAME: &str = "config.toml";

impl Config {
    /// Features of the version with every override applied on top.
    pub fn feature_set(&self) -> eyre::Result<ClientFeatureSet> {
        let version: ClientVersion = self.client_version.parse()?;
        let mut features = ClientFeatureSet::resolve(version);

        if let Some(value) = self.transparency {
            features = features.with_alpha_channel(value);
        }

        if let Some(value) = self.extended {
            features = features.with_extended_ids(value);
        }

        if let Some(value) = self.frame_durations {
            features = features.with_frame_durations(value);
        }

        if let Some(value) = self.frame_groups {
            features = features.with_frame_groups(value);
        }

        Ok(features)
    }
}

/// Parse `config.toml` in the same folder as the binary
pub fn parse_config() -> eyre::Result<Config> {
    let path = env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(|parent| parent.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    parse_config_from_file(path.as_path())
}

pub fn parse_config_from_file(path: &Path) -> eyre::Result<Config> {
    let mut file = OpenOptions::new()
        .read(true)
        .open(path.as_os_str())
        .map_err(|err| eyre!("Cannot open config {}: {err}", path.display()))?;
    let mut buffer = String::new();

    file.read_to_string(&mut buffer)?;

    parse_config_from_str(&buffer)
}

pub fn parse_config_from_str(s: &str) -> eyre::Result<Config> {
    let config: Config = toml::from_str(s)?;

    // bad versions fail here rather than on first use
    config.feature_set()?;

    Ok(config)
}

#[cfg(test)]
mod test {
    use super::parse_config_from_str;

    #[test]
    fn version_only() {
        let config = parse_config_from_str("client_version = \"8.60\"").unwrap();
        let features = config.feature_set().unwrap();

        assert_eq!(features.version.number(), 860);
        assert!(!features.uses_alpha_channel);
        assert!(!features.uses_extended_ids);
    }

    #[test]
    fn overrides() {
        let config = parse_config_from_str(
            "\
client_version = \"10.98\"
transparency = false
frame_groups = false
",
        )
        .unwrap();
        let features = config.feature_set().unwrap();

        assert!(!features.uses_alpha_channel);
        assert!(!features.supports_frame_groups);
        assert!(features.uses_extended_ids);
        assert!(features.supports_frame_durations);
    }

    #[test]
    fn bad_version() {
        assert!(parse_config_from_str("client_version = \"eight\"").is_err());
        assert!(parse_config_from_str("client_version = \"\"").is_err());
        assert!(parse_config_from_str("transparency = true").is_err());
    }
}
