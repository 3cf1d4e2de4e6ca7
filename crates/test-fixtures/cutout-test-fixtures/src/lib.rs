use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    tables: HashMap<String, String>,
    packs: HashMap<String, PackEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PackEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        legacy: bool,
    },
}

impl PackEntry {
    fn as_path(&self) -> &str {
        match self {
            PackEntry::Path(path) => path,
            PackEntry::Detailed { path, .. } => path,
        }
    }

    fn is_legacy(&self) -> bool {
        match self {
            PackEntry::Path(_) => false,
            PackEntry::Detailed { legacy, .. } => *legacy,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod tables {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.tables.keys().cloned().collect()
    }

    pub fn text(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.tables, "table", name)?;
        read_to_string(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.tables, "table", name)?;
        Ok(resolve_path(rel))
    }
}

pub mod packs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.packs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.packs, "pack", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.packs, "pack", name)?;
        super::load_json(entry.as_path())
    }

    pub fn is_legacy(name: &str) -> Result<bool> {
        let entry = lookup(&MANIFEST.packs, "pack", name)?;
        Ok(entry.is_legacy())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.packs, "pack", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}
