use crate::error::StoreError;
use crate::schema::{
    ConditionOperator, ConditionSource, RenderType, Step, StepCondition, Visibility,
    WorkflowSchema,
};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Everything needed to resume an in-progress editing session: the schema
/// plus the id-allocator position, so recovery can never re-issue a spent
/// step id.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub schema: WorkflowSchema,
    pub next_step_ordinal: u64,
}

impl DraftSnapshot {
    /// Serializes the snapshot to the compact bincode draft format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let repr = SnapshotRepr::from(self);
        encode_to_vec(&repr, standard()).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Deserializes a snapshot from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        decode_from_slice::<SnapshotRepr, _>(bytes, standard())
            .map(|(repr, _)| repr.into())
            .map_err(|e| StoreError::Deserialization(e.to_string()))
    }
}

// The canonical schema structs carry `skip_serializing_if` attributes for
// the JSON wire format. Bincode is not self-describing, so a skipped field
// would shift every subsequent byte and corrupt the draft on decode. Drafts
// therefore encode through fixed-shape representations that always write
// every field.

#[derive(Serialize, Deserialize)]
struct SnapshotRepr {
    schema: SchemaRepr,
    next_step_ordinal: u64,
}

#[derive(Serialize, Deserialize)]
struct SchemaRepr {
    name: String,
    sync_patient: bool,
    steps: Vec<StepRepr>,
}

#[derive(Serialize, Deserialize)]
struct StepRepr {
    id: String,
    render_type: RenderType,
    form_id: Option<String>,
    skippable: bool,
    weight: Option<i32>,
    conditions: Vec<ConditionRepr>,
}

#[derive(Serialize, Deserialize)]
struct ConditionRepr {
    source: ConditionSource,
    step_id: Option<String>,
    field: String,
    operator: ConditionOperator,
    value: String,
}

impl From<&DraftSnapshot> for SnapshotRepr {
    fn from(snapshot: &DraftSnapshot) -> Self {
        Self {
            schema: SchemaRepr {
                name: snapshot.schema.name.clone(),
                sync_patient: snapshot.schema.sync_patient,
                steps: snapshot.schema.steps.iter().map(StepRepr::from).collect(),
            },
            next_step_ordinal: snapshot.next_step_ordinal,
        }
    }
}

impl From<&Step> for StepRepr {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id.clone(),
            render_type: step.render_type,
            form_id: step.form_id.clone(),
            skippable: step.skippable,
            weight: step.weight,
            conditions: step
                .visibility
                .conditions
                .iter()
                .map(|c| ConditionRepr {
                    source: c.source,
                    step_id: c.step_id.clone(),
                    field: c.field.clone(),
                    operator: c.operator,
                    value: c.value.clone(),
                })
                .collect(),
        }
    }
}

impl From<SnapshotRepr> for DraftSnapshot {
    fn from(repr: SnapshotRepr) -> Self {
        Self {
            schema: WorkflowSchema {
                name: repr.schema.name,
                sync_patient: repr.schema.sync_patient,
                steps: repr.schema.steps.into_iter().map(Step::from).collect(),
            },
            next_step_ordinal: repr.next_step_ordinal,
        }
    }
}

impl From<StepRepr> for Step {
    fn from(repr: StepRepr) -> Self {
        Self {
            id: repr.id,
            render_type: repr.render_type,
            form_id: repr.form_id,
            skippable: repr.skippable,
            weight: repr.weight,
            visibility: Visibility {
                conditions: repr
                    .conditions
                    .into_iter()
                    .map(|c| StepCondition {
                        source: c.source,
                        step_id: c.step_id,
                        field: c.field,
                        operator: c.operator,
                        value: c.value,
                    })
                    .collect(),
            },
        }
    }
}

/// Local, ephemeral persistence of in-progress edits.
///
/// Advisory only: saves are last-write-wins with no conflict resolution,
/// and a failed save never blocks the edit that triggered it.
pub trait DraftStore {
    fn save(&mut self, snapshot: &DraftSnapshot) -> Result<(), StoreError>;

    /// The most recent snapshot, or `None` when no draft has been saved.
    fn load(&self) -> Result<Option<DraftSnapshot>, StoreError>;

    /// Discards the draft (e.g. after a successful publish).
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// A single-file [`DraftStore`].
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DraftStore for FileDraftStore {
    fn save(&mut self, snapshot: &DraftSnapshot) -> Result<(), StoreError> {
        let bytes = snapshot.to_bytes()?;
        fs::write(&self.path, bytes).map_err(|e| StoreError::Io {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    fn load(&self) -> Result<Option<DraftSnapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path).map_err(|e| StoreError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;
        DraftSnapshot::from_bytes(&bytes).map(Some)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.path).map_err(|e| StoreError::Io {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// An in-memory [`DraftStore`], useful in tests and as the default for
/// hosts without local storage.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    bytes: Option<Vec<u8>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&mut self, snapshot: &DraftSnapshot) -> Result<(), StoreError> {
        self.bytes = Some(snapshot.to_bytes()?);
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftSnapshot>, StoreError> {
        self.bytes
            .as_deref()
            .map(DraftSnapshot::from_bytes)
            .transpose()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.bytes = None;
        Ok(())
    }
}
