// toolbelt-cli/src/selection.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::warn;
use uuid::Uuid;
use toolbelt_core::{SelectedToolkit, Selection, ToolkitId, ToolkitRegistry};

const SELECTION_SUBDIR: &str = ".toolbelt"; // Store selection relative to project root
const SELECTION_FILENAME: &str = "selection.json";

/// On-disk form of the selection list. Only identifiers and parameters are
/// persisted; definitions are rehydrated from the registry on load.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SelectionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub toolkits: Vec<StoredToolkit>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoredToolkit {
    pub id: ToolkitId,
    pub parameters: JsonValue,
}

fn selection_file_path(project_root: &Path) -> Result<PathBuf> {
    let dir = project_root.join(SELECTION_SUBDIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create selection directory at {:?}", dir))?;
    Ok(dir.join(SELECTION_FILENAME))
}

/// Saves the current selection, preserving the snapshot id and creation time
/// of any existing file.
pub fn save_selection(project_root: &Path, selection: &Selection) -> Result<()> {
    let file_path = selection_file_path(project_root)?;
    let now = Utc::now();
    let (id, created_at) = match read_snapshot(&file_path) {
        Ok(Some(existing)) => (existing.id, existing.created_at),
        _ => (Uuid::new_v4(), now),
    };

    let snapshot = SelectionSnapshot {
        id,
        created_at,
        last_updated_at: now,
        toolkits: selection
            .iter()
            .map(|t| StoredToolkit {
                id: t.id,
                parameters: t.parameters.clone(),
            })
            .collect(),
    };

    let file = File::create(&file_path)
        .with_context(|| format!("Failed to create selection file at {:?}", file_path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &snapshot)
        .with_context(|| format!("Failed to serialize selection to {:?}", file_path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush writer for {:?}", file_path))?;
    Ok(())
}

/// Loads the persisted selection, rehydrating definitions from the registry.
///
/// A missing file yields an empty selection. Entries whose identifier no
/// longer resolves, or whose stored parameters no longer satisfy the current
/// schema (e.g. a model removed from the catalog), are skipped with a
/// warning rather than restored invalid.
pub fn load_selection(project_root: &Path, registry: &ToolkitRegistry) -> Result<Selection> {
    let file_path = project_root.join(SELECTION_SUBDIR).join(SELECTION_FILENAME);
    let mut selection = Selection::new();
    let Some(snapshot) = read_snapshot(&file_path)? else {
        return Ok(selection);
    };

    for stored in snapshot.toolkits {
        let Some(definition) = registry.get(stored.id) else {
            warn!(toolkit = %stored.id, "skipping persisted toolkit: not in registry");
            continue;
        };
        if definition.parameters.validate(&stored.parameters).is_err() {
            warn!(
                toolkit = %stored.id,
                "skipping persisted toolkit: stored parameters no longer satisfy its schema"
            );
            continue;
        }
        selection.add(SelectedToolkit {
            id: stored.id,
            toolkit: definition.clone(),
            parameters: stored.parameters,
        });
    }
    Ok(selection)
}

fn read_snapshot(file_path: &Path) -> Result<Option<SelectionSnapshot>> {
    if !file_path.exists() {
        return Ok(None);
    }
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open selection file at {:?}", file_path))?;
    let reader = BufReader::new(file);
    let snapshot: SelectionSnapshot = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize selection from {:?}", file_path))?;
    Ok(Some(snapshot))
}
