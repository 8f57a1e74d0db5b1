use anyhow::{Context, Result};
use codex_indexer::{fetch_concurrency_from_env, ClosureConfig, DEFAULT_ROUND_BUDGET};
use codex_protocol::{extract_reference, EntryKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "codex.toml";

/// Run configuration, read from `codex.toml`.
///
/// Every field is optional in the file; CLI flags are applied on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodexConfig {
    pub base_language: String,
    pub languages: Vec<String>,
    pub round_budget: u32,
    pub fetch_concurrency: usize,
    pub fetch_batch_size: usize,
    /// Pointers known to never resolve
    pub known_unreachable: Vec<String>,
    /// Pointers absent from every listing
    pub seeds: Vec<String>,
    /// Copied into the output manifest
    pub version: String,
}

impl Default for CodexConfig {
    fn default() -> Self {
        Self {
            base_language: "en".to_string(),
            languages: vec!["en".to_string(), "zh-hans".to_string()],
            round_budget: DEFAULT_ROUND_BUDGET,
            fetch_concurrency: 4,
            fetch_batch_size: 32,
            known_unreachable: Vec::new(),
            seeds: Vec::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl CodexConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid codex configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Explicit path must exist; otherwise `codex.toml` in `dir` if present, else defaults
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            log::debug!("Using {}", fallback.display());
            return Self::load(&fallback);
        }
        Ok(Self::default())
    }

    /// Worker count after the `CODEX_FETCH_CONCURRENCY` override
    pub fn fetch_concurrency(&self) -> usize {
        fetch_concurrency_from_env(self.fetch_concurrency)
    }

    pub fn closure_config(&self) -> Result<ClosureConfig> {
        let mut config = ClosureConfig::new(self.base_language.clone(), self.languages.clone())
            .with_round_budget(self.round_budget);
        config.batch_size = self.fetch_batch_size.max(1);
        config.known_unreachable = parse_pointers(&self.known_unreachable)
            .context("Invalid known_unreachable pointer")?;
        config.seeds = parse_pointers(&self.seeds).context("Invalid seed pointer")?;
        Ok(config)
    }
}

fn parse_pointers(pointers: &[String]) -> Result<BTreeSet<EntryKey>> {
    pointers
        .iter()
        .map(|pointer| extract_reference(pointer).map_err(anyhow::Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_protocol::Category;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_uses_defaults() {
        let config = CodexConfig::from_toml("").unwrap();
        assert_eq!(config, CodexConfig::default());
        assert_eq!(config.languages, vec!["en", "zh-hans"]);
        assert_eq!(config.round_budget, 3);
    }

    #[test]
    fn pointers_become_entry_keys() {
        let config = CodexConfig::from_toml(
            r#"
            languages = ["en", "fr"]
            round_budget = 5
            seeds = ["/codex/items/hidden-ring/"]
            known_unreachable = ["spells/lost"]
            "#,
        )
        .unwrap();

        let closure = config.closure_config().unwrap();
        assert_eq!(closure.round_budget, 5);
        assert_eq!(closure.languages, vec!["en", "fr"]);
        assert!(closure
            .seeds
            .contains(&EntryKey::new(Category::Items, "hidden-ring")));
        assert!(closure
            .known_unreachable
            .contains(&EntryKey::new(Category::Spells, "lost")));
    }

    #[test]
    fn malformed_seed_is_rejected() {
        let config = CodexConfig::from_toml(r#"seeds = ["/codex/npcs/bob/"]"#).unwrap();
        let err = config.closure_config().unwrap_err();
        assert!(format!("{err:#}").contains("Invalid seed pointer"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(CodexConfig::from_toml("round_budgte = 2").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(CodexConfig::resolve(Some(&missing), temp.path()).is_err());

        std::fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            "base_language = \"fr\"\nlanguages = [\"fr\"]\n",
        )
        .unwrap();
        let config = CodexConfig::resolve(None, temp.path()).unwrap();
        assert_eq!(config.base_language, "fr");
    }
}
