use crate::error::{SchemaError, StoreError};
use crate::schema::{
    ConditionSource, RenderType, Step, StepCondition, Visibility, WorkflowSchema,
};
use crate::store::{DraftSnapshot, DraftStore};
use std::fmt;

/// Record of the conditions cascade-removed when a referenced step was
/// deleted. Returned so the editor surface can tell the user what was
/// dropped instead of leaving references dangling silently.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CascadeReport {
    pub removed_step_id: String,
    pub removed_conditions: Vec<RemovedCondition>,
}

/// One condition stripped from a surviving step during cascade removal.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedCondition {
    /// Id of the step the condition was attached to.
    pub owner_step_id: String,
    pub condition: StepCondition,
}

impl CascadeReport {
    /// True when the delete removed no conditions from surviving steps.
    pub fn is_clean(&self) -> bool {
        self.removed_conditions.is_empty()
    }
}

// Pure, immutable-value structural edits. Every operation validates the
// incoming step against the schema it would land in and returns a new value.
impl WorkflowSchema {
    /// Returns a copy with `step` appended at the end.
    pub fn with_step_appended(&self, step: Step) -> Result<Self, SchemaError> {
        if self.step_index_of(&step.id).is_some() {
            return Err(SchemaError::DuplicateStepId { step_id: step.id });
        }
        self.validate_step_at(self.steps.len(), &step)?;
        let mut next = self.clone();
        next.steps.push(step);
        Ok(next)
    }

    /// Returns a copy with the step at `index` replaced.
    ///
    /// A replacement at an occupied index keeps the original step's id, so
    /// conditions referencing the step survive the edit. An index past the
    /// end appends instead, matching the editor's "save new step" path.
    pub fn with_step_replaced(&self, index: usize, step: Step) -> Result<Self, SchemaError> {
        if index >= self.steps.len() {
            return self.with_step_appended(step);
        }
        let mut step = step;
        step.id = self.steps[index].id.clone();
        self.validate_step_at(index, &step)?;
        let mut next = self.clone();
        next.steps[index] = step;
        Ok(next)
    }

    /// Returns a copy with the step at `index` removed, together with a
    /// report of every condition in surviving steps that referenced it and
    /// was cascade-removed along with it.
    pub fn with_step_deleted(&self, index: usize) -> Result<(Self, CascadeReport), SchemaError> {
        if index >= self.steps.len() {
            return Err(SchemaError::StepIndexOutOfBounds {
                index,
                len: self.steps.len(),
            });
        }
        let mut next = self.clone();
        let removed = next.steps.remove(index);
        let mut report = CascadeReport {
            removed_step_id: removed.id.clone(),
            removed_conditions: Vec::new(),
        };
        for step in &mut next.steps {
            let (dangling, kept): (Vec<StepCondition>, Vec<StepCondition>) = step
                .visibility
                .conditions
                .drain(..)
                .partition(|c| {
                    c.source == ConditionSource::Step
                        && c.step_id.as_deref() == Some(removed.id.as_str())
                });
            step.visibility.conditions = kept;
            report
                .removed_conditions
                .extend(dangling.into_iter().map(|condition| RemovedCondition {
                    owner_step_id: step.id.clone(),
                    condition,
                }));
        }
        Ok((next, report))
    }
}

/// Hands out step ids from a monotonically increasing ordinal.
///
/// Ids are assigned once and never recomputed from position, so deleting or
/// reordering steps can never make a later allocation collide with a
/// surviving id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIdAllocator {
    next: u64,
}

impl StepIdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Resumes allocation at a persisted ordinal (draft recovery).
    pub fn resume_at(ordinal: u64) -> Self {
        Self { next: ordinal }
    }

    /// Seeds the allocator past every `step-{n}` ordinal already present in
    /// `schema`, so hydrating an existing blob can never re-issue a spent
    /// id. Ids not matching the `step-{n}` shape are ignored.
    pub fn seeded_from(schema: &WorkflowSchema) -> Self {
        let next = schema
            .steps
            .iter()
            .filter_map(|s| s.id.strip_prefix("step-"))
            .filter_map(|ordinal| ordinal.parse::<u64>().ok())
            .map(|ordinal| ordinal + 1)
            .max()
            .unwrap_or(0);
        Self { next }
    }

    pub fn allocate(&mut self) -> String {
        let id = format!("step-{}", self.next);
        self.next += 1;
        id
    }

    /// The ordinal the next allocation will use; persisted in draft
    /// snapshots.
    pub fn next_ordinal(&self) -> u64 {
        self.next
    }
}

impl Default for StepIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A step as the builder UI describes it, before the editor has assigned an
/// identity.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDraft {
    pub render_type: RenderType,
    pub form_id: Option<String>,
    pub skippable: bool,
    pub weight: Option<i32>,
    pub visibility: Visibility,
}

impl StepDraft {
    pub fn new(render_type: RenderType) -> Self {
        Self {
            render_type,
            form_id: None,
            skippable: false,
            weight: None,
            visibility: Visibility::default(),
        }
    }

    /// Shorthand for a form-rendered step.
    pub fn form(form_id: &str) -> Self {
        Self {
            form_id: Some(form_id.to_string()),
            ..Self::new(RenderType::Form)
        }
    }

    pub fn skippable(mut self, skippable: bool) -> Self {
        self.skippable = skippable;
        self
    }

    pub fn with_condition(mut self, condition: StepCondition) -> Self {
        self.visibility.conditions.push(condition);
        self
    }

    fn into_step(self, id: String) -> Step {
        Step {
            id,
            render_type: self.render_type,
            form_id: self.form_id,
            skippable: self.skippable,
            weight: self.weight,
            visibility: self.visibility,
        }
    }
}

/// The closed set of edits the builder surface can request.
///
/// Dispatch over this enum replaces a string-keyed modal registry: every
/// action is a typed variant resolved at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    Rename(String),
    SetSyncPatient(bool),
    AppendStep(StepDraft),
    ReplaceStep { index: usize, draft: StepDraft },
    DeleteStep { index: usize },
}

/// What an applied action changed beyond the schema value itself.
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    /// Present when a delete cascade-removed conditions from surviving
    /// steps.
    pub cascade: Option<CascadeReport>,
    /// Present when the advisory draft snapshot could not be written. The
    /// edit itself has still been applied.
    pub draft_error: Option<StoreError>,
}

/// Owns the canonical in-memory schema and the step-id allocator, and
/// funnels every edit through [`EditorAction`] dispatch.
///
/// After each successful edit the editor advisorily snapshots the schema to
/// an attached [`DraftStore`] so a reload can recover in-progress work. A
/// failed snapshot is reported in the [`ApplyOutcome`], never escalated: the
/// in-memory schema is the source of truth until an explicit save.
pub struct SchemaEditor {
    schema: WorkflowSchema,
    ids: StepIdAllocator,
    drafts: Option<Box<dyn DraftStore>>,
}

// `Box<dyn DraftStore>` has no Debug, so show whether a store is attached
// instead of its contents.
impl fmt::Debug for SchemaEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEditor")
            .field("schema", &self.schema)
            .field("ids", &self.ids)
            .field("draft_store_attached", &self.drafts.is_some())
            .finish()
    }
}

impl SchemaEditor {
    /// Starts a new, empty workflow.
    pub fn create(name: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            schema: WorkflowSchema::new(name)?,
            ids: StepIdAllocator::new(),
            drafts: None,
        })
    }

    /// Takes over an existing schema (e.g. loaded from the blob store),
    /// validating it and seeding the id allocator past its existing ids.
    pub fn hydrate(schema: WorkflowSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        let ids = StepIdAllocator::seeded_from(&schema);
        Ok(Self {
            schema,
            ids,
            drafts: None,
        })
    }

    /// Resumes from a draft snapshot, restoring both the schema and the
    /// allocator position recorded at snapshot time.
    pub fn resume(snapshot: DraftSnapshot) -> Result<Self, SchemaError> {
        snapshot.schema.validate()?;
        let seeded = StepIdAllocator::seeded_from(&snapshot.schema);
        // The persisted ordinal can be ahead of the seed if steps were
        // deleted after allocation; never move it backwards.
        let ids = StepIdAllocator::resume_at(snapshot.next_step_ordinal.max(seeded.next_ordinal()));
        Ok(Self {
            schema: snapshot.schema,
            ids,
            drafts: None,
        })
    }

    /// Attaches a draft store for advisory autosave after each edit.
    pub fn with_draft_store(mut self, store: Box<dyn DraftStore>) -> Self {
        self.drafts = Some(store);
        self
    }

    pub fn schema(&self) -> &WorkflowSchema {
        &self.schema
    }

    /// The snapshot an autosave would write right now.
    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            schema: self.schema.clone(),
            next_step_ordinal: self.ids.next_ordinal(),
        }
    }

    /// Applies one editor action and returns what changed.
    ///
    /// On error the canonical schema is left untouched; allocator ordinals
    /// consumed by a rejected append are not reused, which is harmless and
    /// keeps allocation strictly monotonic.
    pub fn apply(&mut self, action: EditorAction) -> Result<ApplyOutcome, SchemaError> {
        let mut outcome = ApplyOutcome::default();
        match action {
            EditorAction::Rename(new_name) => {
                self.schema = self.schema.renamed(&new_name);
            }
            EditorAction::SetSyncPatient(sync_patient) => {
                self.schema = self.schema.with_sync_patient(sync_patient);
            }
            EditorAction::AppendStep(draft) => {
                let step = draft.into_step(self.ids.allocate());
                self.schema = self.schema.with_step_appended(step)?;
            }
            EditorAction::ReplaceStep { index, draft } => {
                let step = draft.into_step(self.ids.allocate());
                self.schema = self.schema.with_step_replaced(index, step)?;
            }
            EditorAction::DeleteStep { index } => {
                let (schema, report) = self.schema.with_step_deleted(index)?;
                self.schema = schema;
                outcome.cascade = Some(report);
            }
        }
        if let Some(store) = &mut self.drafts {
            let snapshot = DraftSnapshot {
                schema: self.schema.clone(),
                next_step_ordinal: self.ids.next_ordinal(),
            };
            if let Err(err) = store.save(&snapshot) {
                outcome.draft_error = Some(err);
            }
        }
        Ok(outcome)
    }
}
