use crate::error::StoreError;
use crate::schema::{EligibilityCriterion, WorkflowSchema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Opaque pointer to a persisted schema blob (the metadata record's
/// `resourceValueReference`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobReference(pub String);

impl BlobReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The metadata record stored alongside a schema blob.
///
/// The schema itself is an opaque JSON blob; everything list views and the
/// eligibility editor need lives here, keyed by `uuid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    pub uuid: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub criteria: Vec<EligibilityCriterion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_value_reference: Option<BlobReference>,
}

impl WorkflowMetadata {
    pub fn new(uuid: &str, name: &str, version: &str) -> Self {
        Self {
            uuid: uuid.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            description: String::new(),
            published: false,
            criteria: Vec::new(),
            resource_value_reference: None,
        }
    }
}

/// A partial metadata edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataUpdate {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub published: Option<bool>,
    pub criteria: Option<Vec<EligibilityCriterion>>,
}

impl MetadataUpdate {
    fn apply_to(&self, metadata: &mut WorkflowMetadata) {
        if let Some(name) = &self.name {
            metadata.name = name.clone();
        }
        if let Some(version) = &self.version {
            metadata.version = version.clone();
        }
        if let Some(description) = &self.description {
            metadata.description = description.clone();
        }
        if let Some(published) = self.published {
            metadata.published = published;
        }
        if let Some(criteria) = &self.criteria {
            metadata.criteria = criteria.clone();
        }
    }
}

// JSON wire codec. The published blob format is JSON matching the schema
// shape, persisted as opaque text and re-hydrated on load.
impl WorkflowSchema {
    pub fn to_json_string(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Deserialization(e.to_string()))
    }
}

/// The persistence seam the editor talks to.
///
/// The production collaborator is a REST backend; this trait is consumed
/// exactly as `save -> reference`, `load(reference) -> schema`, and
/// metadata updates keyed by uuid. All failures are non-fatal: the caller's
/// in-memory schema survives and the operation can be retried.
pub trait SchemaStore {
    /// Persists the schema blob for `uuid` and returns its reference. The
    /// uuid's metadata record is created on first save and gets its
    /// `resource_value_reference` updated on every save.
    fn save(&mut self, uuid: &str, schema: &WorkflowSchema) -> Result<BlobReference, StoreError>;

    /// Re-hydrates a schema from its blob reference.
    fn load(&self, reference: &BlobReference) -> Result<WorkflowSchema, StoreError>;

    fn metadata(&self, uuid: &str) -> Result<WorkflowMetadata, StoreError>;

    fn update_metadata(
        &mut self,
        uuid: &str,
        update: MetadataUpdate,
    ) -> Result<WorkflowMetadata, StoreError>;
}

/// A directory-backed [`SchemaStore`]: one JSON blob plus one metadata JSON
/// per uuid. Stands in for the REST collaborator in tests and the CLI.
pub struct FileSchemaStore {
    root: PathBuf,
}

impl FileSchemaStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| io_error(&root, e))?;
        Ok(Self { root })
    }

    fn blob_path(&self, uuid: &str) -> PathBuf {
        self.root.join(format!("{uuid}.schema.json"))
    }

    fn metadata_path(&self, uuid: &str) -> PathBuf {
        self.root.join(format!("{uuid}.meta.json"))
    }

    fn read_metadata(&self, uuid: &str) -> Result<Option<WorkflowMetadata>, StoreError> {
        let path = self.metadata_path(uuid);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::Deserialization(e.to_string()))
    }

    fn write_metadata(&self, metadata: &WorkflowMetadata) -> Result<(), StoreError> {
        let path = self.metadata_path(&metadata.uuid);
        let text = serde_json::to_string_pretty(metadata)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&path, text).map_err(|e| io_error(&path, e))
    }
}

impl SchemaStore for FileSchemaStore {
    fn save(&mut self, uuid: &str, schema: &WorkflowSchema) -> Result<BlobReference, StoreError> {
        let blob = schema.to_json_string()?;
        let path = self.blob_path(uuid);
        fs::write(&path, blob).map_err(|e| io_error(&path, e))?;

        let reference = BlobReference(format!("{uuid}.schema.json"));
        let mut metadata = self
            .read_metadata(uuid)?
            .unwrap_or_else(|| WorkflowMetadata::new(uuid, &schema.name, "1.0"));
        metadata.resource_value_reference = Some(reference.clone());
        self.write_metadata(&metadata)?;
        Ok(reference)
    }

    fn load(&self, reference: &BlobReference) -> Result<WorkflowSchema, StoreError> {
        let path = self.root.join(reference.as_str());
        let text = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        WorkflowSchema::from_json_str(&text)
    }

    fn metadata(&self, uuid: &str) -> Result<WorkflowMetadata, StoreError> {
        self.read_metadata(uuid)?
            .ok_or_else(|| StoreError::UnknownUuid(uuid.to_string()))
    }

    fn update_metadata(
        &mut self,
        uuid: &str,
        update: MetadataUpdate,
    ) -> Result<WorkflowMetadata, StoreError> {
        let mut metadata = self
            .read_metadata(uuid)?
            .ok_or_else(|| StoreError::UnknownUuid(uuid.to_string()))?;
        update.apply_to(&mut metadata);
        self.write_metadata(&metadata)?;
        Ok(metadata)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
