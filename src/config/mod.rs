pub mod types;


pub use types::*;

use anyhow::Result;
use std::path::Path;

impl ManagerOptions {
    /// Load options from a file (if it exists) and apply environment
    /// variable overrides. When the file does not exist, defaults are used
    /// and the caller is expected to rely on the environment or fail
    /// validation.
    pub fn load(path: &Path) -> Result<Self> {
        let mut options: ManagerOptions = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => toml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                Some(ext) => anyhow::bail!("unsupported config format: .{ext}, use .toml or .json"),
                None => anyhow::bail!("config file has no extension, use .toml or .json"),
            }
        } else {
            tracing::info!("config file not found at {}, using defaults", path.display());
            ManagerOptions::default()
        };

        options.apply_env_overrides();
        options.validate()?;
        Ok(options)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("XDS_DM_LISTENER_RESOURCE") {
            self.listener_resource_name = v;
        }
        if let Ok(v) = std::env::var("XDS_DM_AUTHORITY") {
            self.data_plane_authority = v;
        }
        if let Ok(v) = std::env::var("XDS_DM_DUAL_STACK") {
            self.dual_stack_endpoints = v == "true" || v == "1";
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.listener_resource_name.is_empty() {
            anyhow::bail!("listener_resource_name must not be empty");
        }
        if self.data_plane_authority.is_empty() {
            anyhow::bail!("data_plane_authority must not be empty");
        }
        Ok(())
    }
}
