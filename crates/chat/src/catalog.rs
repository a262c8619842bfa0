//! YAML catalog of the Parquet datasets offered to the chat agent.

use crate::dataset::Dataset;
use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One dataset in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub name: String,
    /// Parquet file; relative paths are resolved against the catalog file
    pub path: PathBuf,
    pub description: String,
}

/// Datasets plus the attribution shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub title: String,
    #[serde(default)]
    pub source_url: Option<String>,
    pub datasets: Vec<DatasetEntry>,
}

impl Catalog {
    /// Read a catalog file and resolve its dataset paths.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ChatError::Catalog(format!("{}: {e}", path.display())))?;
        let mut catalog = Self::from_yaml(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for entry in &mut catalog.datasets {
            if entry.path.is_relative() {
                entry.path = base.join(&entry.path);
            }
        }
        Ok(catalog)
    }

    /// Parse a catalog from YAML text. Paths are left as written.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| ChatError::Catalog(e.to_string()))
    }

    /// Load every dataset, optionally dropping each one's trailing total row.
    pub fn load_datasets(&self, trim_total_row: bool) -> Result<Vec<Dataset>> {
        self.datasets
            .iter()
            .map(|entry| Dataset::load(entry, trim_total_row))
            .collect()
    }

    /// Banner text shown before the first question.
    pub fn disclaimer(&self) -> String {
        let mut text = String::from(
            "No guarantees that the answers will be hallucination-free; take them with a grain of salt.",
        );
        if let Some(url) = &self.source_url {
            text.push_str("\nData source: ");
            text.push_str(url);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CATALOG: &str = r"
title: Analysis of 2022 Japan driving licence data
source_url: https://www.npa.go.jp/publications/statistics/koutsuu/menkyo/r04/r04_sub1.pdf
datasets:
  - name: 2022-all-prefectures
    path: dataset/2022-all-prefectures.parquet
    description: Licence holders by class in every prefecture
  - name: absolute
    path: /data/absolute.parquet
    description: Absolute path
";

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, CATALOG).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.datasets.len(), 2);
        assert_eq!(
            catalog.datasets[0].path,
            dir.path().join("dataset/2022-all-prefectures.parquet")
        );
        assert_eq!(catalog.datasets[1].path, PathBuf::from("/data/absolute.parquet"));
    }

    #[test]
    fn test_disclaimer_mentions_source() {
        let catalog = Catalog::from_yaml(CATALOG).unwrap();
        assert!(catalog.disclaimer().contains("npa.go.jp"));

        let bare = Catalog::from_yaml("title: t\ndatasets: []\n").unwrap();
        assert!(bare.source_url.is_none());
        assert!(!bare.disclaimer().contains("Data source"));
    }

    #[test]
    fn test_bundled_catalog() {
        let catalog = Catalog::from_yaml(include_str!("../resources/catalog.yaml")).unwrap();

        assert_eq!(catalog.title, "Analysis of 2022 Japan Driving license data");
        let names: Vec<&str> = catalog.datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["2022-all-prefectures", "2022-new-prefectures", "2022-new-ages"]
        );
        assert!(catalog
            .datasets
            .iter()
            .all(|d| d.path == Path::new("dataset").join(format!("{}.parquet", d.name))));
    }

    #[test]
    fn test_bad_catalog() {
        assert!(matches!(
            Catalog::from_yaml("title: [unterminated"),
            Err(ChatError::Catalog(_))
        ));
        assert!(matches!(
            Catalog::load("/nonexistent/catalog.yaml"),
            Err(ChatError::Catalog(_))
        ));
    }
}
