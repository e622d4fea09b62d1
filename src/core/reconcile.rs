//! Path-to-hierarchy reconciliation
//!
//! Walks the segments of an upload path, adopting existing nodes and
//! creating missing ones, so that repeated uploads share ancestors instead
//! of duplicating them. Ancestor creation is committed segment by segment;
//! a store failure aborts the walk without rolling earlier segments back.

use thiserror::Error;

use crate::core::store::{AssetMetadata, Store, StoreError};

/// Errors raised during path reconciliation
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("cannot reconcile an empty segment list")]
    EmptyPath,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Ensure every node along `segments` exists, returning the leaf asset id.
///
/// All but the last segment are folder ancestors: an existing node at the
/// candidate path is adopted as parent, a missing one is created at its
/// zero-based level. The final segment is the asset itself; if a node
/// already occupies that path it is upserted (metadata overwritten, old
/// sheets and line items dropped), otherwise a fresh leaf is inserted
/// carrying the parsed metadata.
pub fn ensure_path(
    store: &mut Store,
    segments: &[String],
    metadata: &AssetMetadata,
) -> Result<String, ReconcileError> {
    let Some((leaf_name, ancestors)) = segments.split_last() else {
        return Err(ReconcileError::EmptyPath);
    };

    let mut parent_id: Option<String> = None;
    let mut accumulated = String::new();

    for (index, segment) in ancestors.iter().enumerate() {
        let candidate = join_path(&accumulated, segment);

        parent_id = Some(match store.find_node_by_path(&candidate)? {
            Some(existing) => existing.id,
            None => store.insert_node(segment, parent_id.as_deref(), &candidate, index as i64, None)?,
        });

        accumulated = candidate;
    }

    let leaf_path = join_path(&accumulated, leaf_name);
    let leaf_level = ancestors.len() as i64;

    match store.find_node_by_path(&leaf_path)? {
        Some(existing) => {
            store.replace_asset(&existing.id, metadata)?;
            Ok(existing.id)
        }
        None => Ok(store.insert_node(
            leaf_name,
            parent_id.as_deref(),
            &leaf_path,
            leaf_level,
            Some(metadata),
        )?),
    }
}

fn join_path(accumulated: &str, segment: &str) -> String {
    if accumulated.is_empty() {
        segment.to_string()
    } else {
        format!("{accumulated}/{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::NewLineItem;

    fn meta(name: &str) -> AssetMetadata {
        AssetMetadata {
            assembly_name: Some(name.to_string()),
            source_hash: Some("cafe".to_string()),
            ..Default::default()
        }
    }

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ensure_path_creates_full_chain() {
        let mut store = Store::open_in_memory().unwrap();
        let leaf_id =
            ensure_path(&mut store, &segs(&["Plant", "Unit1", "pump"]), &meta("Pump")).unwrap();

        let nodes = store.list_nodes().unwrap();
        assert_eq!(nodes.len(), 3);

        let plant = store.find_node_by_path("Plant").unwrap().unwrap();
        let unit = store.find_node_by_path("Plant/Unit1").unwrap().unwrap();
        let pump = store.find_node_by_path("Plant/Unit1/pump").unwrap().unwrap();

        assert_eq!(plant.level, 0);
        assert!(plant.parent_id.is_none());
        assert!(plant.metadata.is_none());

        assert_eq!(unit.level, 1);
        assert_eq!(unit.parent_id.as_deref(), Some(plant.id.as_str()));

        assert_eq!(pump.id, leaf_id);
        assert_eq!(pump.level, 2);
        assert_eq!(pump.parent_id.as_deref(), Some(unit.id.as_str()));
        assert_eq!(
            pump.metadata.unwrap().assembly_name.as_deref(),
            Some("Pump")
        );
    }

    #[test]
    fn test_ensure_path_reuses_ancestors() {
        let mut store = Store::open_in_memory().unwrap();
        ensure_path(&mut store, &segs(&["Plant", "Unit1", "pump"]), &meta("Pump")).unwrap();
        ensure_path(
            &mut store,
            &segs(&["Plant", "Unit1", "valve"]),
            &meta("Valve"),
        )
        .unwrap();

        // Shared ancestors are adopted, not duplicated
        let nodes = store.list_nodes().unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(
            nodes
                .iter()
                .filter(|n| n.path.starts_with("Plant/Unit1/"))
                .count(),
            2
        );
    }

    #[test]
    fn test_ensure_path_upserts_leaf_on_reupload() {
        let mut store = Store::open_in_memory().unwrap();
        let first =
            ensure_path(&mut store, &segs(&["Plant", "pump"]), &meta("Pump v1")).unwrap();

        let sheet = store.insert_sheet(&first, "Sheet1", 0).unwrap();
        store
            .insert_items(&first, Some(&sheet), &[NewLineItem::default()])
            .unwrap();

        let second =
            ensure_path(&mut store, &segs(&["Plant", "pump"]), &meta("Pump v2")).unwrap();

        // Same node, updated metadata, previous contents dropped
        assert_eq!(first, second);
        assert_eq!(store.list_nodes().unwrap().len(), 2);

        let pump = store.get_node(&second).unwrap();
        assert_eq!(
            pump.metadata.unwrap().assembly_name.as_deref(),
            Some("Pump v2")
        );
        assert!(store.list_sheets(&second).unwrap().is_empty());
        assert!(store.list_items(&second).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_path_single_segment_is_root_asset() {
        let mut store = Store::open_in_memory().unwrap();
        let id = ensure_path(&mut store, &segs(&["boiler"]), &meta("Boiler")).unwrap();

        let node = store.get_node(&id).unwrap();
        assert_eq!(node.path, "boiler");
        assert_eq!(node.level, 0);
        assert!(node.parent_id.is_none());
    }

    #[test]
    fn test_ensure_path_rejects_empty_segments() {
        let mut store = Store::open_in_memory().unwrap();
        let err = ensure_path(&mut store, &[], &AssetMetadata::default()).unwrap_err();
        assert!(matches!(err, ReconcileError::EmptyPath));
    }
}
