//! Configuration management for campusrecords.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name under the user config directory.
const APP_DIR_NAME: &str = "campusrecords";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. The `PORT` environment variable (server port only)
/// 2. Environment variables prefixed with `CAMPUSRECORDS_`, nested with `__`
///    (e.g. `CAMPUSRECORDS_DATA__DATA_DIR`)
/// 3. TOML config file at `~/.config/campusrecords/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Record document configuration.
    pub data: DataConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory served for static assets (CSS, images).
    pub static_dir: PathBuf,
}

/// Record document configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding both record documents.
    pub data_dir: PathBuf,
    /// File name of the student document.
    pub students_file: String,
    /// File name of the course document.
    pub courses_file: String,
    /// Stage student writes in a temporary file and rename it into place.
    pub atomic_writes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            students_file: "students.json".to_string(),
            courses_file: "courses.json".to_string(),
            atomic_writes: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CAMPUSRECORDS_").split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.data.students_file.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "students_file must not be empty".to_string(),
            });
        }

        if self.data.courses_file.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "courses_file must not be empty".to_string(),
            });
        }

        if self.data.students_file == self.data.courses_file {
            return Err(Error::ConfigValidation {
                message: format!(
                    "students_file and courses_file must differ (both are {})",
                    self.data.students_file
                ),
            });
        }

        if self.server.host.parse::<std::net::IpAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("invalid server host: {}", self.server.host),
            });
        }

        Ok(())
    }

    /// Get the student document path.
    #[must_use]
    pub fn students_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.students_file)
    }

    /// Get the course document path.
    #[must_use]
    pub fn courses_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.courses_file)
    }

    /// Get the socket address the server binds to.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a valid IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip = self
            .server
            .host
            .parse::<std::net::IpAddr>()
            .map_err(|_| Error::ConfigValidation {
                message: format!("invalid server host: {}", self.server.host),
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.static_dir, PathBuf::from("public"));
        assert!(config.data.atomic_writes);
    }

    #[test]
    fn test_default_data_config() {
        let data = DataConfig::default();

        assert_eq!(data.data_dir, PathBuf::from("data"));
        assert_eq!(data.students_file, "students.json");
        assert_eq!(data.courses_file, "courses.json");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_students_file() {
        let mut config = Config::default();
        config.data.students_file = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("students_file"));
    }

    #[test]
    fn test_validate_empty_courses_file() {
        let mut config = Config::default();
        config.data.courses_file = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("courses_file"));
    }

    #[test]
    fn test_validate_same_file_for_both() {
        let mut config = Config::default();
        config.data.courses_file = "students.json".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must differ"));
    }

    #[test]
    fn test_validate_bad_host() {
        let mut config = Config::default();
        config.server.host = "not-an-ip".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid server host"));
    }

    #[test]
    fn test_document_paths() {
        let mut config = Config::default();
        config.data.data_dir = PathBuf::from("/srv/campus");

        assert_eq!(
            config.students_path(),
            PathBuf::from("/srv/campus/students.json")
        );
        assert_eq!(
            config.courses_path(),
            PathBuf::from("/srv/campus/courses.json")
        );
    }

    #[test]
    fn test_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 3000;

        let addr = config.bind_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("campusrecords"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9090\n\n[data]\ndata_dir = \"/tmp/records\"\natomic_writes = false\n",
        )
        .unwrap();

        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let config = Config::load_from(Some(path.clone())).unwrap();
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.data.data_dir, PathBuf::from("/tmp/records"));
            assert!(!config.data.atomic_writes);
            assert_eq!(config.data.students_file, "students.json");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "config.toml",
                "[server]\nport = 9090\nhost = \"127.0.0.1\"\n\n[data]\natomic_writes = false\n",
            )?;
            jail.set_env("CAMPUSRECORDS_SERVER__PORT", "7070");

            let config = Config::load_from(Some(PathBuf::from("config.toml"))).unwrap();
            assert_eq!(config.server.port, 7070);
            assert_eq!(config.server.host, "127.0.0.1");
            assert!(!config.data.atomic_writes);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("CAMPUSRECORDS_DATA__STUDENTS_FILE", "roster.json");
            jail.set_env("PORT", "5000");

            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .unwrap();
            assert_eq!(config.data.students_file, "roster.json");
            assert_eq!(config.server.port, 5000);
            Ok(())
        });
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let config =
                Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_data_config_deserialize() {
        let json = r#"{"students_file": "roster.json"}"#;
        let data: DataConfig = serde_json::from_str(json).unwrap();
        assert_eq!(data.students_file, "roster.json");
        assert_eq!(data.courses_file, "courses.json");
    }

    #[test]
    fn test_server_config_serialize() {
        let json = serde_json::to_string(&ServerConfig::default()).unwrap();
        assert!(json.contains("static_dir"));
    }
}
