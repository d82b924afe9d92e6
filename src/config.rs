use crate::Error;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".pathwrap";
pub const CONFIG_FILE: &str = "config.toml";

/// Directory portions longer than this are cut short when displayed.
pub const DEFAULT_MAX_DIR_LEN: usize = 80;

/// How a path is rendered for the terminal.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct DisplayStyle {
    pub max_dir_len: usize,
    pub color: bool,
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self {
            max_dir_len: DEFAULT_MAX_DIR_LEN,
            color: true,
        }
    }
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ConfigFile {
    display: DisplayStyle,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(p: &Path) -> Result<ConfigFile, Error> {
        let file = p.join(CONFIG_FILE);
        if file.is_file() == true {
            let data = match std::fs::read_to_string(&file) {
                Ok(r) => r,
                Err(e) => return Err(Error::ConfigRead(file, Error::lowerize(e.to_string()))),
            };
            Self::parse(&file, &data)
        } else {
            Ok(Self::new())
        }
    }

    fn parse(file: &Path, data: &str) -> Result<ConfigFile, Error> {
        match toml::de::from_str(data) {
            Ok(r) => Ok(r),
            Err(e) => Err(Error::TomlParse(
                file.to_path_buf(),
                Error::lowerize(e.to_string()),
            )),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Config {
    root: PathBuf,
    data: ConfigFile,
}

impl Config {
    /// Loads the configuration stored under the directory `p`.
    pub fn new(p: PathBuf) -> Result<Self, Error> {
        let root = p.join(CONFIG_DIR);
        Ok(Self {
            data: ConfigFile::load(&root)?,
            root: root,
        })
    }

    /// Loads the configuration stored under the user's home directory, falling
    /// back to defaults when there is no home to look in.
    pub fn from_home() -> Result<Self, Error> {
        match home::home_dir() {
            Some(h) => Self::new(h),
            None => {
                tracing::debug!("no home directory; using default configuration");
                Ok(Self {
                    root: PathBuf::new(),
                    data: ConfigFile::new(),
                })
            }
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn display(&self) -> &DisplayStyle {
        &self.data.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ut_config_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(cfg.display(), &DisplayStyle::default());
        assert_eq!(cfg.root(), &dir.path().join(CONFIG_DIR));
    }

    #[test]
    fn ut_config_partial_display_table() {
        let cfg = ConfigFile::parse(Path::new("c.toml"), "[display]\ncolor = false\n").unwrap();
        assert_eq!(
            cfg.display,
            DisplayStyle {
                max_dir_len: DEFAULT_MAX_DIR_LEN,
                color: false
            }
        );
    }

    #[test]
    fn ut_config_from_disk() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_DIR).join(CONFIG_FILE),
            "[display]\nmax-dir-len = 12\n",
        )
        .unwrap();
        let cfg = Config::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(cfg.display().max_dir_len, 12);
        assert_eq!(cfg.display().color, true);
    }

    #[test]
    fn ut_config_unknown_key_err() {
        let r = ConfigFile::parse(Path::new("c.toml"), "[display]\nwidth = 3\n");
        assert!(matches!(r, Err(Error::TomlParse(_, _))));
    }
}
