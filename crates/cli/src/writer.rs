use crate::pipeline::PipelineOutput;
use anyhow::{Context, Result};
use codex_slug::hash8;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const REPORT_FILE: &str = "report.json";
const LOCALES_DIR: &str = "locales";

/// Index of the files written by one run, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub last_updated_unix_ms: u64,
    pub files: ManifestFiles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFiles {
    pub catalog: String,
    /// language -> locale file
    pub locales: BTreeMap<String, String>,
    pub report: String,
}

/// Write catalog, locales (content-hashed names), report, then the manifest
pub async fn write_outputs(dir: &Path, version: &str, output: &PipelineOutput) -> Result<Manifest> {
    fs::create_dir_all(dir.join(LOCALES_DIR))
        .await
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let catalog = write_hashed(dir, "catalog", &output.catalog).await?;
    let mut locales = BTreeMap::new();
    for (language, translations) in &output.translations {
        let file = write_hashed(dir, &format!("{LOCALES_DIR}/{language}"), translations).await?;
        locales.insert(language.clone(), file);
    }
    write_json(dir, REPORT_FILE, &output.report).await?;

    let manifest = Manifest {
        version: version.to_string(),
        last_updated_unix_ms: now_unix_ms(),
        files: ManifestFiles {
            catalog,
            locales,
            report: REPORT_FILE.to_string(),
        },
    };
    write_json(dir, MANIFEST_FILE, &manifest).await?;
    log::info!(
        "Wrote {} and {} locales to {}",
        manifest.files.catalog,
        manifest.files.locales.len(),
        dir.display()
    );
    Ok(manifest)
}

/// `<stem>.<hash8>.json`, hash8 taken over the written bytes
async fn write_hashed<T: Serialize>(dir: &Path, stem: &str, value: &T) -> Result<String> {
    let data = serde_json::to_string_pretty(value)?;
    let name = format!("{stem}.{}.json", hash8(&data));
    fs::write(dir.join(&name), data)
        .await
        .with_context(|| format!("Failed to write {name}"))?;
    Ok(name)
}

async fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(dir.join(name), data)
        .await
        .with_context(|| format!("Failed to write {name}"))
}

fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
