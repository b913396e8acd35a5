//! Defines the configuration for the resource layer: where the resource tree
//! lives on disk, whether the tree is partitioned per virtual host, and the
//! reserved filename suffixes.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

fn default_suffix_meta() -> String {
    ".meta".to_string()
}

fn default_suffix_acl() -> String {
    ".acl".to_string()
}

fn default_max_slug_attempts() -> usize {
    16
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Root of the resource tree. Normalized (no trailing separator) at
    /// construction so every resolved path is `root`-relative by simple join.
    pub root: PathBuf,
    /// When true, each virtual host gets its own subtree `root/<hostname>/`.
    #[serde(default)]
    pub multi_tenant: bool,
    /// Suffix of a container's metadata resource.
    #[serde(default = "default_suffix_meta")]
    pub suffix_meta: String,
    /// Suffix of an ACL resource. Interpreted by an external collaborator;
    /// this layer only knows that such files are turtle.
    #[serde(default = "default_suffix_acl")]
    pub suffix_acl: String,
    /// Retry cap for the slug allocator.
    #[serde(default = "default_max_slug_attempts")]
    pub max_slug_attempts: usize,
}

impl Config {
    pub fn new(root: PathBuf) -> Self {
        Config {
            root: normalize_root(root),
            multi_tenant: false,
            suffix_meta: default_suffix_meta(),
            suffix_acl: default_suffix_acl(),
            max_slug_attempts: default_max_slug_attempts(),
        }
    }

    pub fn new_multi_tenant(root: PathBuf) -> Self {
        let mut config = Self::new(root);
        config.multi_tenant = true;
        config
    }

    pub fn save_to_file(&self, file: &Path) -> Result<()> {
        let config_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let file = std::fs::File::open(file)?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)?;
        config.root = normalize_root(config.root);
        Ok(config)
    }

    /// Prints out the current Config in a clear and readable way for command line output.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Root: {}", self.root.display());
        println!("  Multi-tenant: {}", self.multi_tenant);
        println!("  Metadata suffix: {}", self.suffix_meta);
        println!("  ACL suffix: {}", self.suffix_acl);
        println!("  Max slug attempts: {}", self.max_slug_attempts);
    }
}

fn normalize_root(root: PathBuf) -> PathBuf {
    // Strip any trailing separator once here so per-request resolution never
    // has to re-check it.
    let s = root.to_string_lossy();
    let trimmed = s.trim_end_matches(std::path::MAIN_SEPARATOR);
    if trimmed.len() == s.len() {
        root
    } else if trimmed.is_empty() {
        PathBuf::from(std::path::MAIN_SEPARATOR.to_string())
    } else {
        PathBuf::from(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_normalization() {
        let config = Config::new(PathBuf::from("/data/resources/"));
        assert_eq!(config.root, PathBuf::from("/data/resources"));

        let config = Config::new(PathBuf::from("/data/resources"));
        assert_eq!(config.root, PathBuf::from("/data/resources"));
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::new(PathBuf::from("/srv/ldp"));
        config.multi_tenant = true;
        config.save_to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(config, loaded);
    }
}
