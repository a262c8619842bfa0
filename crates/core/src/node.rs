//! Nested table representation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Top-level header labels mapped to their subtrees, in column order.
pub type NestedTable = IndexMap<String, TableNode>;

/// A non-null data cell of a leaf column.
///
/// Reconstructed grids only produce text; nested JSON written by other
/// tools may also carry plain numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeafValue {
    Number(Number),
    Text(String),
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafValue::Number(n) => write!(f, "{n}"),
            LeafValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<String> for LeafValue {
    fn from(s: String) -> Self {
        LeafValue::Text(s)
    }
}

impl From<&str> for LeafValue {
    fn from(s: &str) -> Self {
        LeafValue::Text(s.to_string())
    }
}

impl From<i64> for LeafValue {
    fn from(n: i64) -> Self {
        LeafValue::Number(n.into())
    }
}

impl From<i32> for LeafValue {
    fn from(n: i32) -> Self {
        LeafValue::Number(n.into())
    }
}

/// One header in the reconstructed header tree.
///
/// Serialises untagged: a leaf is a JSON array of cell values, a
/// composite header is a JSON object keyed by its sub-headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableNode {
    /// A data column: the cells below the header region, in row order.
    Leaf(Vec<Option<LeafValue>>),
    /// A header spanning several sub-columns.
    Composite(IndexMap<String, TableNode>),
}

impl TableNode {
    /// Build a leaf from non-null values.
    pub fn leaf<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<LeafValue>,
    {
        TableNode::Leaf(values.into_iter().map(|v| Some(v.into())).collect())
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, TableNode::Leaf(_))
    }

    /// Leaf values, or `None` for a composite header.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&[Option<LeafValue>]> {
        match self {
            TableNode::Leaf(values) => Some(values),
            TableNode::Composite(_) => None,
        }
    }

    /// Depth of the subtree; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TableNode::Leaf(_) => 1,
            TableNode::Composite(children) => {
                1 + children.values().map(TableNode::depth).max().unwrap_or(0)
            }
        }
    }

    /// Number of leaf columns under this node.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            TableNode::Leaf(_) => 1,
            TableNode::Composite(children) => children.values().map(TableNode::leaf_count).sum(),
        }
    }
}
