//! Header and label translation dictionaries.

use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

const BUILTIN_TRANSLATIONS: &str = include_str!("../resources/translations.yaml");

/// What to do with a first-column label that has no translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Keep the original label
    Keep,
    /// Keep the original label and log a warning
    #[default]
    Warn,
    /// Replace the label with null
    Null,
    /// Fail with `SheetError::TranslationMiss`
    Error,
}

impl FromStr for MissingPolicy {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(MissingPolicy::Keep),
            "warn" => Ok(MissingPolicy::Warn),
            "null" => Ok(MissingPolicy::Null),
            "error" => Ok(MissingPolicy::Error),
            other => Err(SheetError::Parse(format!("Unknown missing policy: {other}"))),
        }
    }
}

/// Label translations for the first column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTranslations {
    /// Name the first column must have (after header translation) for the
    /// map to apply
    #[serde(default = "default_value_column")]
    pub column: String,
    #[serde(default)]
    pub map: IndexMap<String, String>,
}

fn default_value_column() -> String {
    "Prefecture".to_string()
}

impl Default for ValueTranslations {
    fn default() -> Self {
        ValueTranslations {
            column: default_value_column(),
            map: IndexMap::new(),
        }
    }
}

/// Translation dictionaries applied by the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translations {
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub values: ValueTranslations,
}

impl Translations {
    /// The driving-licence statistics dictionaries shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_TRANSLATIONS)
    }

    /// No translations at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load dictionaries from a YAML file with the same layout as the
    /// builtin one.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse dictionaries from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| SheetError::Parse(e.to_string()))
    }

    /// Translate a header, falling back to the header itself.
    #[must_use]
    pub fn header<'a>(&'a self, name: &'a str) -> &'a str {
        self.headers.get(name).map_or(name, String::as_str)
    }
}

impl Sheet {
    /// Translate the column headers, then the labels of the first column
    /// when it is the column the value map targets.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::DuplicateColumnName` if two headers translate to
    /// the same name, and `SheetError::TranslationMiss` for an untranslated
    /// label under `MissingPolicy::Error`.
    pub fn translate(&mut self, translations: &Translations, policy: MissingPolicy) -> Result<()> {
        if self.column_names().is_none() {
            return Ok(());
        }
        self.rename_columns(|name| translations.header(name).to_string())?;

        let applies = self
            .column_names()
            .and_then(|names| names.first())
            .is_some_and(|first| *first == translations.values.column);
        if !applies {
            return Ok(());
        }

        let column = translations.values.column.clone();
        self.try_column_map(0, |_, cell| {
            let Some(label) = cell.as_text() else {
                return Ok(cell.clone());
            };
            if let Some(translated) = translations.values.map.get(label) {
                return Ok(CellValue::String(translated.clone()));
            }
            match policy {
                MissingPolicy::Keep => Ok(cell.clone()),
                MissingPolicy::Warn => {
                    tracing::warn!(column = %column, value = %label, "No translation for label");
                    Ok(cell.clone())
                }
                MissingPolicy::Null => Ok(CellValue::Null),
                MissingPolicy::Error => Err(SheetError::TranslationMiss {
                    column: column.clone(),
                    value: label.to_string(),
                }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefecture_sheet() -> Sheet {
        let mut sheet = Sheet::from_data(vec![
            vec!["都道府県", "合計"],
            vec!["北海道", "10"],
            vec!["不明", "3"],
        ]);
        sheet.name_columns_by_row(0).unwrap();
        sheet
    }

    #[test]
    fn test_builtin_dictionaries_load() {
        let t = Translations::builtin().unwrap();
        assert_eq!(t.header("都道府県"), "Prefecture");
        assert_eq!(t.header("第一種免許-準中型"), "First Class License - Semi-Medium");
        assert_eq!(t.header("unmapped"), "unmapped");
        assert_eq!(t.values.column, "Prefecture");
        assert_eq!(t.values.map.len(), 48);
        assert_eq!(t.values.map["警視庁"], "Tokyo");
        assert_eq!(t.values.map["合 計"], "Total");
    }

    #[test]
    fn test_translate_headers_and_labels() {
        let mut sheet = prefecture_sheet();
        sheet
            .translate(&Translations::builtin().unwrap(), MissingPolicy::Keep)
            .unwrap();

        assert_eq!(
            sheet.column_names().unwrap(),
            &vec!["Prefecture".to_string(), "Total".to_string()]
        );
        assert_eq!(sheet.get(1, 0).unwrap(), &CellValue::from("Hokkaido"));
        assert_eq!(sheet.get(2, 0).unwrap(), &CellValue::from("不明"));
    }

    #[test]
    fn test_missing_policies() {
        let mut sheet = prefecture_sheet();
        sheet
            .translate(&Translations::builtin().unwrap(), MissingPolicy::Null)
            .unwrap();
        assert!(sheet.get(2, 0).unwrap().is_null());

        let mut sheet = prefecture_sheet();
        let err = sheet
            .translate(&Translations::builtin().unwrap(), MissingPolicy::Error)
            .unwrap_err();
        assert!(matches!(
            err,
            SheetError::TranslationMiss { value, .. } if value == "不明"
        ));
    }

    #[test]
    fn test_warn_policy_keeps_unmapped_value() {
        let mut sheet = prefecture_sheet();
        sheet
            .translate(&Translations::builtin().unwrap(), MissingPolicy::Warn)
            .unwrap();

        assert_eq!(sheet.column_names().unwrap()[0], "Prefecture");
        assert_eq!(sheet.get(1, 0).unwrap(), &CellValue::from("Hokkaido"));
        assert_eq!(sheet.get(2, 0).unwrap(), &CellValue::from("不明"));
        assert_eq!(sheet.get(2, 1).unwrap(), &CellValue::from("3"));
    }

    #[test]
    fn test_labels_untouched_when_first_column_differs() {
        let mut sheet = Sheet::from_data(vec![vec!["年齢", "合計"], vec!["北海道", "1"]]);
        sheet.name_columns_by_row(0).unwrap();
        sheet
            .translate(&Translations::builtin().unwrap(), MissingPolicy::Error)
            .unwrap();
        assert_eq!(sheet.column_names().unwrap()[0], "Age");
        assert_eq!(sheet.get(1, 0).unwrap(), &CellValue::from("北海道"));
    }

    #[test]
    fn test_header_translation_is_idempotent() {
        let t = Translations::builtin().unwrap();
        let mut once = prefecture_sheet();
        once.translate(&t, MissingPolicy::Keep).unwrap();
        let mut twice = once.clone();
        twice.translate(&t, MissingPolicy::Keep).unwrap();
        assert_eq!(once.column_names(), twice.column_names());
    }

    #[test]
    fn test_from_yaml_defaults() {
        let t = Translations::from_yaml("headers:\n  a: A\n").unwrap();
        assert_eq!(t.header("a"), "A");
        assert_eq!(t.values.column, "Prefecture");
        assert!(t.values.map.is_empty());
        assert_eq!("WARN".parse::<MissingPolicy>().unwrap(), MissingPolicy::Warn);
        assert!("sometimes".parse::<MissingPolicy>().is_err());
    }
}
