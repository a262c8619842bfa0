//! # pdftab-core
//!
//! Recovers the header tree of a table whose column headers were merged
//! across several cells, as produced by PDF table detectors.
//!
//! This crate provides:
//! - The [`CellGrid`] input type (rows of optional cell strings)
//! - Merge-span and header-depth detection
//! - [`reconstruct`] from a grid to a [`NestedTable`]
//! - [`flatten`] from a nested table to `parent-child` keyed columns
//!
//! # Example
//!
//! ```
//! use pdftab_core::{reconstruct, CellGrid, TableNode};
//!
//! let grid = CellGrid::from_rows(vec![
//!     vec![Some("Category"), None, Some("Other")],
//!     vec![Some("X"), Some("Y"), None],
//!     vec![Some("1"), Some("2"), Some("3")],
//! ])
//! .unwrap();
//!
//! let nested = reconstruct(&grid).unwrap();
//! assert!(matches!(nested["Category"], TableNode::Composite(_)));
//! assert_eq!(nested["Other"], TableNode::leaf(["3"]));
//! ```

/// Error types and result aliases.
pub mod error;
/// Flattening of nested header trees.
pub mod flatten;
/// The rectangular cell grid.
pub mod grid;
/// Merge-span and header-depth detection.
pub mod header;
/// Nested table representation.
pub mod node;
/// Recursive header reconstruction.
pub mod reconstruct;

pub use error::{Result, StructureError};
pub use flatten::{flatten, flatten_deep, FLAT_KEY_SEPARATOR};
pub use grid::{Cell, CellGrid};
pub use node::{LeafValue, NestedTable, TableNode};
pub use reconstruct::{reconstruct, reconstruct_range};
