//! Flat tables for pdftab
//!
//! Turns the nested header trees produced by `pdftab-core` into flat,
//! typed and translated sheets, and writes them as Parquet, CSV or JSON.
//!
//! # Examples
//!
//! ## Normalizing a nested table
//!
//! ```
//! use pdftab_core::NestedTable;
//! use pdftab_sheet::{CellValue, NormalizeOptions, Normalizer, Translations};
//!
//! let nested: NestedTable = serde_json::from_str(
//!     r#"{"都道府県": ["北海道"], "合計": ["1,234"]}"#,
//! ).unwrap();
//!
//! let normalizer = Normalizer::new(NormalizeOptions {
//!     translations: Translations::builtin().unwrap(),
//!     ..NormalizeOptions::default()
//! });
//! let sheet = normalizer.normalize(&nested).unwrap();
//!
//! assert_eq!(sheet.column_names().unwrap()[0], "Prefecture");
//! assert_eq!(sheet.get(1, 0).unwrap(), &CellValue::from("Hokkaido"));
//! assert_eq!(sheet.get(1, 1).unwrap(), &CellValue::Int(1234));
//! ```
//!
//! ## Named column access
//!
//! ```
//! use pdftab_sheet::Sheet;
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec!["Prefecture", "Total"],
//!     vec!["Hokkaido", "1234"],
//! ]);
//!
//! sheet.name_columns_by_row(0).unwrap();
//! let totals = sheet.column_by_name("Total").unwrap();
//! assert_eq!(totals.len(), 1);
//! ```

mod cell;
mod csv;
mod error;
mod json;
pub mod locale;
pub mod normalize;
mod parquet;
mod sheet;
pub mod translate;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
pub use locale::NumberLocale;
pub use normalize::{NormalizeOptions, Normalizer};
/// Re-export sheet type.
pub use sheet::Sheet;
pub use translate::{MissingPolicy, Translations, ValueTranslations};
