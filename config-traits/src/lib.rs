use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use log::{error, info, warn};
pub use ron;
use ron::ser::PrettyConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Config file helper traits. Only `new()`, `file_name()` and `config_dir()`
/// are required to be implemented, the rest are intended to be free methods.
///
/// Nothing here panics: a user tool has to keep working with defaults when
/// its config can't be read or written.
pub trait StdConfig
where
    Self: Serialize + DeserializeOwned,
{
    /// Taking over the standard `new()` to ensure things can be generic
    fn new() -> Self;

    /// Return the config files names, such as `wibble.ron`
    fn file_name(&self) -> String;

    /// Return the full path to the directory the config file resides in
    fn config_dir() -> PathBuf;

    /// Return the full path to the config file
    fn file_path(&self) -> PathBuf {
        Self::config_dir().join(self.file_name())
    }

    /// Write the config file data to pretty ron format, creating the
    /// directory if needed
    fn write(&self) {
        if let Err(e) = fs::create_dir_all(Self::config_dir()) {
            error!("Could not create {:?}: {e}", Self::config_dir());
            return;
        }
        let ron = match ron::ser::to_string_pretty(&self, PrettyConfig::new().depth_limit(4)) {
            Ok(data) => data,
            Err(e) => {
                error!("Parse {:?} to RON failed, error: {e}", self.file_path());
                return;
            }
        };
        let mut file = match File::create(self.file_path()) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    "Couldn't overwrite config {:?}, error: {e}",
                    self.file_path()
                );
                return;
            }
        };
        file.write_all(ron.as_bytes())
            .unwrap_or_else(|err| error!("Could not write config: {}", err));
    }

    /// Renames the existing file to `<file>-old`
    fn rename_file_old(&self) {
        warn!(
            "Renaming {} to {}-old and recreating config",
            self.file_name(),
            self.file_name()
        );
        let cfg_old = self.file_path().to_string_lossy().to_string() + "-old";
        fs::rename(self.file_path(), cfg_old).unwrap_or_else(|err| {
            error!(
                "Could not rename. Please remove {} then try again: Error {}",
                self.file_name(),
                err
            )
        });
    }
}

/// Load the config, falling back to `self` for a missing or empty file.
///
/// # Example
/// ```rust
/// use std::path::PathBuf;
/// use serde::{Deserialize, Serialize};
/// use config_traits::{StdConfig, StdConfigLoad1};
///
/// #[derive(Deserialize, Serialize)]
/// struct LedConfig {}
///
/// impl StdConfig for LedConfig {
///     fn new() -> Self { Self {} }
///
///     fn file_name(&self) -> std::string::String { "test_name.ron".to_owned() }
///
///     fn config_dir() -> PathBuf { std::env::temp_dir() }
/// }
///
/// impl StdConfigLoad1 for LedConfig {}
/// ```
///
/// If the file fails to parse, then the old config is renamed and a new one
/// created. The result is written back so new fields show up in the file.
pub trait StdConfigLoad1
where
    Self: StdConfig + DeserializeOwned + Serialize,
{
    fn load(mut self) -> Self {
        match fs::read_to_string(self.file_path()) {
            Ok(buf) if buf.trim().is_empty() => {
                warn!("Config file {} is empty", self.file_name());
            }
            Ok(buf) => match ron::from_str(&buf) {
                Ok(data) => self = data,
                Err(e) => {
                    warn!("Could not deserialise {:?}: {e}", self.file_path());
                    self.rename_file_old();
                    self = Self::new();
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Creating default config {:?}", self.file_path());
            }
            Err(e) => {
                // Leave an unreadable file alone
                error!("Error reading {:?}: {e}", self.file_path());
                return self;
            }
        }
        self.write();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde::{Deserialize, Serialize};

    use super::*;

    thread_local! {
        static DIR: RefCell<PathBuf> = RefCell::new(PathBuf::new());
    }

    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    #[serde(default)]
    struct TestConfig {
        level: u32,
        name: String,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                level: 7,
                name: "default".into(),
            }
        }
    }

    impl StdConfig for TestConfig {
        fn new() -> Self {
            Self::default()
        }

        fn file_name(&self) -> String {
            "test.ron".to_owned()
        }

        fn config_dir() -> PathBuf {
            DIR.with(|d| d.borrow().clone())
        }
    }

    impl StdConfigLoad1 for TestConfig {}

    fn use_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        DIR.with(|d| *d.borrow_mut() = dir.path().join("nested"));
        dir
    }

    #[test]
    fn creates_default() {
        let _dir = use_dir();
        let config = TestConfig::new().load();
        assert_eq!(config, TestConfig::default());
        assert!(config.file_path().exists());
    }

    #[test]
    fn reads_existing() {
        let _dir = use_dir();
        fs::create_dir_all(TestConfig::config_dir()).unwrap();
        fs::write(
            TestConfig::config_dir().join("test.ron"),
            "(level: 3, name: \"custom\")",
        )
        .unwrap();
        let config = TestConfig::new().load();
        assert_eq!(config.level, 3);
        assert_eq!(config.name, "custom");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let _dir = use_dir();
        fs::create_dir_all(TestConfig::config_dir()).unwrap();
        fs::write(TestConfig::config_dir().join("test.ron"), "(level: 1)").unwrap();
        let config = TestConfig::new().load();
        assert_eq!(config.level, 1);
        assert_eq!(config.name, "default");
        // written back in full
        let buf = fs::read_to_string(config.file_path()).unwrap();
        assert!(buf.contains("name"));
    }

    #[test]
    fn broken_file_is_renamed() {
        let _dir = use_dir();
        fs::create_dir_all(TestConfig::config_dir()).unwrap();
        fs::write(TestConfig::config_dir().join("test.ron"), "not ron at all {").unwrap();
        let config = TestConfig::new().load();
        assert_eq!(config, TestConfig::default());
        assert!(TestConfig::config_dir().join("test.ron-old").exists());
    }
}
