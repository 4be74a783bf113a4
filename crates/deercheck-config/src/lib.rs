use std::env;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "deercheck";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BUSINESS_NAME: &str = "Deer Processing";
const MAX_BUSINESS_NAME_LEN: usize = 120;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationsConfig {
    pub business_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: IpAddr::from([127, 0, 0, 1]),
                port: DEFAULT_PORT,
            },
            notifications: NotificationsConfig {
                business_name: DEFAULT_BUSINESS_NAME.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid server.port value: {0}")]
    InvalidPort(u16),
    #[error("invalid server.bind value: {0}")]
    InvalidBind(String),
    #[error("invalid notifications.business_name value")]
    InvalidBusinessName,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: Option<ServerFile>,
    notifications: Option<NotificationsFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NotificationsFile {
    business_name: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

pub fn parse_bind(raw: &str) -> Result<IpAddr> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBind(raw.to_string()))
}

pub fn validate_port(port: u16) -> Result<u16> {
    if port == 0 {
        return Err(ConfigError::InvalidPort(port));
    }
    Ok(port)
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(server) = parsed.server {
        if let Some(bind) = server.bind {
            config.server.bind = parse_bind(&bind)?;
        }
        if let Some(port) = server.port {
            config.server.port = validate_port(port)?;
        }
    }

    if let Some(notifications) = parsed.notifications {
        if let Some(name) = notifications.business_name {
            let trimmed = name.trim();
            if trimmed.is_empty() || trimmed.len() > MAX_BUSINESS_NAME_LEN {
                return Err(ConfigError::InvalidBusinessName);
            }
            config.notifications.business_name = trimmed.to_string();
        }
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, ConfigError, ConfigFile, NotificationsFile, ServerFile,
        DEFAULT_BUSINESS_NAME, DEFAULT_PORT,
    };
    use std::fs;
    use std::net::IpAddr;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            server: Some(ServerFile {
                bind: Some("0.0.0.0".to_string()),
                port: Some(9000),
            }),
            notifications: Some(NotificationsFile {
                business_name: Some("  Buck Stop Processing ".to_string()),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.server.bind, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(merged.server.port, 9000);
        assert_eq!(merged.notifications.business_name, "Buck Stop Processing");
    }

    #[test]
    fn merge_config_keeps_defaults() {
        let merged = merge_config(ConfigFile {
            server: None,
            notifications: None,
        })
        .expect("merge");
        assert_eq!(merged.server.port, DEFAULT_PORT);
        assert_eq!(merged.notifications.business_name, DEFAULT_BUSINESS_NAME);
    }

    #[test]
    fn merge_config_rejects_bad_values() {
        let zero_port = merge_config(ConfigFile {
            server: Some(ServerFile {
                bind: None,
                port: Some(0),
            }),
            notifications: None,
        });
        assert!(matches!(zero_port, Err(ConfigError::InvalidPort(0))));

        let bad_bind = merge_config(ConfigFile {
            server: Some(ServerFile {
                bind: Some("localhost:80".to_string()),
                port: None,
            }),
            notifications: None,
        });
        assert!(matches!(bad_bind, Err(ConfigError::InvalidBind(_))));

        let blank_name = merge_config(ConfigFile {
            server: None,
            notifications: Some(NotificationsFile {
                business_name: Some("   ".to_string()),
            }),
        });
        assert!(matches!(blank_name, Err(ConfigError::InvalidBusinessName)));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[server]\nport = 9090\n[notifications]\nbusiness_name = \"Buck Stop\"\n")
            .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.notifications.business_name, "Buck Stop");
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[server]\nworkers = 4\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn load_at_path_rejects_world_readable_files() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "").expect("write config");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&path, perms).expect("chmod");

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }
}
