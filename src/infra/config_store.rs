// ============================================================
// Layer 6 - Config Store
// ============================================================
// Reads and writes TranslatorConfig as pretty-printed JSON.
// `init-config` writes the defaults; `translate --config` reads
// them back before command-line overrides are applied.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::application::translate_use_case::TranslatorConfig;

pub struct ConfigStore;

impl ConfigStore {
    pub fn load(path: impl AsRef<Path>) -> Result<TranslatorConfig> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let cfg = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))?;
        tracing::info!("Loaded config from '{}'", path.display());
        Ok(cfg)
    }

    /// Refuses to overwrite an existing file unless `force` is set
    pub fn save(path: impl AsRef<Path>, cfg: &TranslatorConfig, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            anyhow::bail!("'{}' already exists (use --force to overwrite)", path.display());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved config to '{}'", path.display());
        Ok(())
    }
}
