//! Layered startup settings: built-in defaults, then the config file, then command
//! line and environment.

use crate::Error;

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Json, Serialized, Yaml};
use mac2hostname_resolver::DEFAULT_GROUP;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_DIR: &str = "/etc/mac2hostname";
pub const DEFAULT_DB: &str = "mac2hostname.sqlite3";
pub const DEFAULT_PORT: u16 = 3000;

/// Searched in order; the first existing file is used.
const CONFIG_FILE_NAMES: [&str; 3] = ["config.yaml", "config.yml", "config.json"];

/// One source of settings. Unset and empty values fall through to the next layer.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct ConfigLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<Port>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname_base: Option<String>,
}

/// Port as written in a config file, where `3000` and `"3000"` are both accepted.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Port {
    Number(u16),
    Text(String),
}

impl Port {
    fn value(&self) -> Result<Option<u16>, Error> {
        match self {
            Self::Number(port) => Ok(Some(*port)),
            Self::Text(text) if text.trim().is_empty() => Ok(None),
            Self::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| Error::InvalidPort(text.clone())),
        }
    }
}

impl ConfigLayer {
    fn defaults() -> Self {
        Self {
            port: Some(Port::Number(DEFAULT_PORT)),
            db: Some(PathBuf::from(DEFAULT_DB)),
            hostname_base: Some(DEFAULT_GROUP.to_string()),
        }
    }

    /// Drops empty values so they do not shadow a lower layer.
    fn without_empty(self) -> Self {
        Self {
            port: self
                .port
                .filter(|port| !matches!(port, Port::Text(text) if text.trim().is_empty())),
            db: self.db.filter(|db| !db.as_os_str().is_empty()),
            hostname_base: self.hostname_base.filter(|base| !base.is_empty()),
        }
    }
}

/// The first config file present in `dir`, skipping files with no content.
fn config_file(dir: &Path) -> Result<Option<PathBuf>, Error> {
    let Some(path) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
    else {
        debug!("no config file in {}", dir.display());
        return Ok(None);
    };

    let contents = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    // An empty document is no layer at all rather than a parse error.
    if contents.trim().is_empty() {
        debug!("config file {} is empty", path.display());
        return Ok(None);
    }

    Ok(Some(path))
}

/// Final settings handed to the store, resolver and server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
    pub default_group: String,
}

impl Settings {
    /// Stacks the defaults, the config file found in `config_dir` and `flags`.
    pub fn figment(flags: ConfigLayer, config_dir: &Path) -> Result<Figment, Error> {
        let mut figment = Figment::from(Serialized::defaults(ConfigLayer::defaults()));

        if let Some(path) = config_file(config_dir)? {
            info!("loading config file {}", path.display());

            figment = if path.extension().is_some_and(|ext| ext == "json") {
                figment.merge(Json::file(path))
            } else {
                figment.merge(Yaml::file(path))
            };
        }

        Ok(figment.merge(Serialized::globals(flags.without_empty())))
    }

    /// Resolves the final settings, flags/env over file over defaults.
    pub fn load(flags: ConfigLayer, config_dir: &Path) -> Result<Self, Error> {
        let layer: ConfigLayer = Self::figment(flags, config_dir)?.extract()?;

        Self::from_layer(layer.without_empty())
    }

    fn from_layer(layer: ConfigLayer) -> Result<Self, Error> {
        let port = layer
            .port
            .as_ref()
            .map(Port::value)
            .transpose()?
            .flatten()
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            db_path: layer.db.unwrap_or_else(|| PathBuf::from(DEFAULT_DB)),
            default_group: layer
                .hostname_base
                .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::{TempDir, tempdir};

    fn layer(port: Option<u16>, db: Option<&str>, hostname_base: Option<&str>) -> ConfigLayer {
        ConfigLayer {
            port: port.map(Port::Number),
            db: db.map(PathBuf::from),
            hostname_base: hostname_base.map(str::to_string),
        }
    }

    fn config_dir(name: &str, contents: &str) -> TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(name), contents).unwrap();
        dir
    }

    #[test]
    fn test_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(ConfigLayer::default(), dir.path()).unwrap();

        assert_eq!(settings.listen_addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(settings.db_path, PathBuf::from("mac2hostname.sqlite3"));
        assert_eq!(settings.default_group, "machine");
    }

    #[test]
    fn test_flags_override_file() {
        let dir = config_dir(
            "config.yaml",
            "port: 9090\ndb: /var/lib/m2h.db\nhostname_base: printer\n",
        );
        let settings = Settings::load(layer(Some(8080), None, Some("node")), dir.path()).unwrap();

        assert_eq!(settings.listen_addr.port(), 8080);
        assert_eq!(settings.db_path, PathBuf::from("/var/lib/m2h.db"));
        assert_eq!(settings.default_group, "node");
    }

    #[test]
    fn test_empty_values_fall_through() {
        let dir = config_dir("config.yaml", "hostname_base: printer\n");
        let settings = Settings::load(layer(None, Some(""), Some("")), dir.path()).unwrap();

        assert_eq!(settings.db_path, PathBuf::from(DEFAULT_DB));
        assert_eq!(settings.default_group, "printer");
    }

    #[test]
    fn test_empty_file_values_keep_defaults() {
        let dir = config_dir("config.yaml", "port: \"\"\ndb: \"\"\nhostname_base: \"\"\n");
        let settings = Settings::load(ConfigLayer::default(), dir.path()).unwrap();

        assert_eq!(settings.listen_addr.port(), DEFAULT_PORT);
        assert_eq!(settings.db_path, PathBuf::from(DEFAULT_DB));
        assert_eq!(settings.default_group, DEFAULT_GROUP);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert_eq!(config_file(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_load_yaml() {
        let dir = config_dir(
            "config.yaml",
            "port: \"4000\"\ndb: /srv/hosts.sqlite3\nhostname_base: rack\nunrelated: true\n",
        );
        let settings = Settings::load(ConfigLayer::default(), dir.path()).unwrap();

        assert_eq!(settings.listen_addr.port(), 4000);
        assert_eq!(settings.db_path, PathBuf::from("/srv/hosts.sqlite3"));
        assert_eq!(settings.default_group, "rack");
    }

    #[test]
    fn test_load_json() {
        let dir = config_dir("config.json", r#"{"port": 3100}"#);
        let settings = Settings::load(ConfigLayer::default(), dir.path()).unwrap();

        assert_eq!(settings.listen_addr.port(), 3100);
        assert_eq!(settings.db_path, PathBuf::from(DEFAULT_DB));
    }

    #[test]
    fn test_yaml_preferred_over_json() {
        let dir = config_dir("config.json", r#"{"hostname_base": "json"}"#);
        std::fs::write(dir.path().join("config.yml"), "hostname_base: yml\n").unwrap();

        let settings = Settings::load(ConfigLayer::default(), dir.path()).unwrap();
        assert_eq!(settings.default_group, "yml");
    }

    #[test]
    fn test_load_empty_file() {
        let dir = config_dir("config.yml", "\n");

        assert_eq!(config_file(dir.path()).unwrap(), None);
        let settings = Settings::load(ConfigLayer::default(), dir.path()).unwrap();
        assert_eq!(settings.default_group, DEFAULT_GROUP);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = config_dir("config.yaml", "port: [1, 2\n");

        assert!(matches!(
            Settings::load(ConfigLayer::default(), dir.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_port_text() {
        let dir = config_dir("config.yaml", "port: http\n");

        assert!(matches!(
            Settings::load(ConfigLayer::default(), dir.path()),
            Err(Error::InvalidPort(_))
        ));
    }
}
