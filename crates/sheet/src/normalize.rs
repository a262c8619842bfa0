//! Turn a nested table into a typed, translated flat sheet.

use crate::error::{Result, SheetError};
use crate::locale::NumberLocale;
use crate::sheet::Sheet;
use crate::translate::{MissingPolicy, Translations};
use pdftab_core::{flatten, flatten_deep, NestedTable};
use std::path::Path;

/// Options for [`Normalizer`]
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Locale used to parse grouped integers
    pub locale: NumberLocale,
    /// Header and label dictionaries
    pub translations: Translations,
    /// What to do with labels missing from the dictionaries
    pub missing_policy: MissingPolicy,
    /// Collapse every header level instead of just the first
    pub deep_flatten: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            locale: NumberLocale::default(),
            translations: Translations::empty(),
            missing_policy: MissingPolicy::default(),
            deep_flatten: false,
        }
    }
}

/// Flattens, coerces, renames and translates nested tables.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    #[must_use]
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Read a nested-table JSON file and normalize it. The sheet is named
    /// after the file stem.
    pub fn normalize_file(&self, path: impl AsRef<Path>) -> Result<Sheet> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let nested: NestedTable = serde_json::from_str(&content)
            .map_err(|e| SheetError::Parse(format!("{}: {e}", path.display())))?;

        let mut sheet = self.normalize(&nested)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            sheet.set_name(stem);
        }
        Ok(sheet)
    }

    /// Run flatten, coercion, first-column rename and translation in that
    /// order.
    pub fn normalize(&self, nested: &NestedTable) -> Result<Sheet> {
        let flat = if self.options.deep_flatten {
            flatten_deep(nested)?
        } else {
            flatten(nested)?
        };

        let mut sheet = Sheet::from_flat(&flat)?;
        tracing::debug!(
            columns = sheet.col_count(),
            rows = sheet.data_row_count(),
            "Flattened table"
        );

        sheet.coerce_numeric(&self.options.locale)?;
        sheet.rename_first_column_from_compound()?;
        sheet.translate(&self.options.translations, self.options.missing_policy)?;
        Ok(sheet)
    }
}
