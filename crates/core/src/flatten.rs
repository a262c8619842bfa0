//! Flattening of nested header trees into `parent-child` keyed columns.

use crate::error::{Result, StructureError};
use crate::node::{NestedTable, TableNode};

/// Joins a parent header and a child header in a flattened key.
pub const FLAT_KEY_SEPARATOR: &str = "-";

/// Collapse exactly one level of nesting.
///
/// Each composite entry at the top level is replaced by its children,
/// re-keyed as `"{parent}-{child}"`; other entries pass through. Children
/// nested deeper stay as they are. Column order is kept.
pub fn flatten(nested: &NestedTable) -> Result<NestedTable> {
    let mut flat = NestedTable::with_capacity(nested.len());
    for (head, node) in nested {
        match node {
            TableNode::Composite(children) => {
                for (key, child) in children {
                    insert_unique(&mut flat, flat_key(head, key), child.clone())?;
                }
            }
            TableNode::Leaf(_) => insert_unique(&mut flat, head.clone(), node.clone())?,
        }
    }
    Ok(flat)
}

/// Collapse every level of nesting, joining the whole header path.
pub fn flatten_deep(nested: &NestedTable) -> Result<NestedTable> {
    let mut flat = NestedTable::new();
    for (head, node) in nested {
        collect_leaves(&mut flat, head.clone(), node)?;
    }
    Ok(flat)
}

fn collect_leaves(flat: &mut NestedTable, path: String, node: &TableNode) -> Result<()> {
    match node {
        TableNode::Leaf(_) => insert_unique(flat, path, node.clone()),
        TableNode::Composite(children) => {
            for (key, child) in children {
                collect_leaves(flat, flat_key(&path, key), child)?;
            }
            Ok(())
        }
    }
}

fn flat_key(parent: &str, child: &str) -> String {
    format!("{parent}{FLAT_KEY_SEPARATOR}{child}")
}

fn insert_unique(flat: &mut NestedTable, key: String, node: TableNode) -> Result<()> {
    if flat.contains_key(&key) {
        return Err(StructureError::DuplicateHeader { label: key, row: 0 });
    }
    flat.insert(key, node);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn composite(children: Vec<(&str, TableNode)>) -> TableNode {
        TableNode::Composite(
            children
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<IndexMap<_, _>>(),
        )
    }

    fn table(entries: Vec<(&str, TableNode)>) -> NestedTable {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_flatten_one_level() {
        let nested = table(vec![
            (
                "Category",
                composite(vec![("X", TableNode::leaf(["1"])), ("Y", TableNode::leaf(["2"]))]),
            ),
            ("Other", TableNode::leaf(["3"])),
        ]);
        let flat = flatten(&nested).unwrap();
        assert_eq!(
            flat.keys().collect::<Vec<_>>(),
            vec!["Category-X", "Category-Y", "Other"]
        );
        assert_eq!(flat["Category-Y"], TableNode::leaf(["2"]));
    }

    #[test]
    fn test_flatten_is_idempotent_on_flat_input() {
        let flat = table(vec![("A", TableNode::leaf(["1"])), ("B", TableNode::leaf(["2"]))]);
        assert_eq!(flatten(&flat).unwrap(), flat);
    }

    #[test]
    fn test_flatten_keeps_deeper_levels() {
        let nested = table(vec![(
            "Top",
            composite(vec![(
                "Mid",
                composite(vec![("Low", TableNode::leaf(["1"]))]),
            )]),
        )]);
        let flat = flatten(&nested).unwrap();
        assert!(matches!(flat["Top-Mid"], TableNode::Composite(_)));

        let deep = flatten_deep(&nested).unwrap();
        assert_eq!(deep["Top-Mid-Low"], TableNode::leaf(["1"]));
    }

    #[test]
    fn test_flatten_rejects_key_collision() {
        let nested = table(vec![
            ("A", composite(vec![("B", TableNode::leaf(["1"]))])),
            ("A-B", TableNode::leaf(["2"])),
        ]);
        assert!(matches!(
            flatten(&nested),
            Err(StructureError::DuplicateHeader { label, .. }) if label == "A-B"
        ));
    }
}
