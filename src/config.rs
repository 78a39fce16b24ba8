use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::codec::CodecOptions;

pub const DEFAULT_LIBRARY_FILE: &str = "albums.json";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    pub library: LibraryConfig,
    #[serde(default)]
    pub codec: CodecOptions,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            library: LibraryConfig {
                path: PathBuf::from(DEFAULT_LIBRARY_FILE),
            },
            codec: CodecOptions::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LibraryConfig {
    /// JSON file holding the collection
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
version = 1

[library]
path = "/srv/catalogue/albums.json"

[codec]
strict_csv = true
compact_json_export = true
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(cfg.version, 1);
        assert_eq!(
            cfg.library.path,
            PathBuf::from("/srv/catalogue/albums.json")
        );
        assert!(cfg.codec.strict_csv);
        assert!(cfg.codec.compact_json_export);

        Ok(())
    }

    #[test]
    fn test_codec_section_is_optional() -> anyhow::Result<()> {
        let toml_str = r#"
version = 1

[library]
path = "albums.json"
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert!(!cfg.codec.strict_csv);
        assert!(!cfg.codec.compact_json_export);

        Ok(())
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let tmp = tempfile::TempDir::new()?;
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "version = 2\n[library]\npath = \"x.json\"\n")?;

        let cfg = Config::load(&path)?;
        assert_eq!(cfg.version, 2);
        assert_eq!(cfg.library.path, PathBuf::from("x.json"));

        assert!(Config::load(&tmp.path().join("missing.toml")).is_err());
        Ok(())
    }

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.library.path, PathBuf::from(DEFAULT_LIBRARY_FILE));
        assert!(!cfg.codec.strict_csv);
    }
}
