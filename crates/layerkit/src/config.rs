//! Types for the configuration file usable by layerkit
use std::{
    env::current_dir,
    fs::read_to_string,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use etcetera::{choose_base_strategy, BaseStrategy};
use layerkit_ast::serialize::Indent;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// The config for the CLI usage of layerkit. Arguments given to a command take precedence.
pub struct Config {
    /// The width and height of extracted icons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<NonZeroU32>,
    /// The indentation of extracted icons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<Indent>,
    /// Whether extracted icons start with an xml declaration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<bool>,
}

impl Config {
    fn load_local() -> std::io::Result<(String, PathBuf)> {
        let mut path = current_dir()?;
        path.push("layerkitrc.json");
        Ok((read_to_string(&path)?, path))
    }

    fn load_base() -> std::io::Result<(String, PathBuf)> {
        let mut path = choose_base_strategy()
            .map_err(std::io::Error::other)?
            .config_dir();
        path.push("layerkit");
        path.push("config.json");
        Ok((read_to_string(&path)?, path))
    }

    /// Tries loading the configuration from well-known paths, using the default configuration
    /// when there is none.
    ///
    /// # Errors
    /// When the config exists but cannot be parsed
    pub fn load() -> anyhow::Result<Self> {
        let Ok((file, path)) = Self::load_local().or_else(|_| Self::load_base()) else {
            log::debug!("using default config");
            return Ok(Self::default());
        };
        log::debug!("using config at {}", path.display());
        Self::parse(&file, &path)
    }

    /// Loads the configuration at the given path
    ///
    /// # Errors
    /// When the config cannot be read or parsed
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        log::debug!("using specified config");
        let file = read_to_string(path)
            .with_context(|| format!("Configuration at {} cannot be read", path.display()))?;
        Self::parse(&file, path)
    }

    fn parse(file: &str, path: &Path) -> anyhow::Result<Self> {
        serde_json::from_str(file)
            .with_context(|| format!("Configuration at {} cannot be parsed", path.display()))
    }
}

#[test]
fn serde() -> anyhow::Result<()> {
    let config: Config = serde_json::from_str(
        r#"{
        "size": 48,
        "pretty": "tabs",
        "declaration": false
    }"#,
    )?;

    assert_eq!(
        config,
        Config {
            size: NonZeroU32::new(48),
            pretty: Some(Indent::Tabs),
            declaration: Some(false),
        }
    );
    assert_eq!(
        serde_json::to_string(&config)?,
        String::from(r#"{"size":48,"pretty":"tabs","declaration":false}"#),
    );

    let config: Config = serde_json::from_str(r#"{ "pretty": "2" }"#)?;
    assert_eq!(config.pretty, Some(Indent::Spaces(2)));
    assert_eq!(serde_json::to_string(&config)?, r#"{"pretty":"2"}"#);

    assert_eq!(serde_json::from_str::<Config>("{}")?, Config::default());
    Ok(())
}

#[test]
fn invalid_config() {
    assert!(serde_json::from_str::<Config>(r#"{ "size": 0 }"#).is_err());
    assert!(serde_json::from_str::<Config>(r#"{ "pretty": "wide" }"#).is_err());
    assert!(Config::parse("{", Path::new("layerkitrc.json")).is_err());
}
