//! Dashboard controller: the admin project-editing workflow.
//!
//! A two-mode state machine (`Browsing` list view, `Editing` form view)
//! that owns the transient edit buffer and funnels every mutation through
//! the project store's write path, so the persisted collection and the
//! cached copy never diverge. One controller per admin session; the session
//! is the single writer.

use crate::generator::DescriptionGenerator;
use crate::project::{self, EditBuffer, Project};
use crate::store::ProjectStore;
use crate::{AtelierError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Controller mode; `Browsing` is both initial and terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    Editing,
}

pub struct DashboardController {
    store: ProjectStore,
    generator: Arc<dyn DescriptionGenerator>,

    /// Transient cached copy of the persisted collection, for rendering
    projects: Vec<Project>,
    mode: Mode,
    buffer: EditBuffer,
    pending_delete: Option<String>,
    /// At most one generation in flight per edit session
    generating: bool,
}

impl DashboardController {
    /// Load the collection from the store and start in `Browsing`
    pub async fn new(
        store: ProjectStore,
        generator: Arc<dyn DescriptionGenerator>,
    ) -> Result<Self> {
        let projects = store.load().await?;
        info!(target: "dashboard", count = projects.len(), "Dashboard loaded");
        Ok(Self {
            store,
            generator,
            projects,
            mode: Mode::Browsing,
            buffer: EditBuffer::default(),
            pending_delete: None,
            generating: false,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Immutable snapshot for the rendering layer
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    // === Browsing → Editing ===

    /// "Add Project": empty buffer with an empty tools list
    pub fn begin_add(&mut self) {
        if self.mode != Mode::Browsing {
            debug!(target: "dashboard", "begin_add ignored outside Browsing");
            return;
        }
        self.buffer = EditBuffer::default();
        self.mode = Mode::Editing;
    }

    /// "Edit project": buffer seeded with a full copy of the project, so
    /// form edits do not touch the list until save. Returns false for an
    /// unknown id.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        if self.mode != Mode::Browsing {
            debug!(target: "dashboard", "begin_edit ignored outside Browsing");
            return false;
        }
        match self.projects.iter().find(|p| p.id == id) {
            Some(project) => {
                self.buffer = EditBuffer::from_project(project);
                self.mode = Mode::Editing;
                true
            }
            None => {
                warn!(target: "dashboard", %id, "begin_edit: no such project");
                false
            }
        }
    }

    // === Field edits (synchronous, in-memory, Editing only) ===

    pub fn set_title(&mut self, title: &str) {
        if self.mode == Mode::Editing {
            self.buffer.title = Some(title.to_string());
        }
    }

    pub fn set_kind(&mut self, kind: &str) {
        if self.mode == Mode::Editing {
            self.buffer.kind = Some(kind.to_string());
        }
    }

    pub fn set_image(&mut self, image: &str) {
        if self.mode == Mode::Editing {
            self.buffer.image = Some(image.to_string());
        }
    }

    /// Tools arrive from the form as a comma-separated string
    pub fn set_tools_csv(&mut self, csv: &str) {
        if self.mode == Mode::Editing {
            self.buffer.tools = project::parse_tools(csv);
        }
    }

    pub fn set_description(&mut self, description: &str) {
        if self.mode == Mode::Editing {
            self.buffer.description = Some(description.to_string());
        }
    }

    pub fn set_problem(&mut self, problem: &str) {
        if self.mode == Mode::Editing {
            self.buffer.details.get_or_insert_with(Default::default).problem = problem.to_string();
        }
    }

    pub fn set_approach(&mut self, approach: &str) {
        if self.mode == Mode::Editing {
            self.buffer.details.get_or_insert_with(Default::default).approach =
                approach.to_string();
        }
    }

    pub fn set_outcome(&mut self, outcome: &str) {
        if self.mode == Mode::Editing {
            self.buffer.details.get_or_insert_with(Default::default).outcome = outcome.to_string();
        }
    }

    /// Save gate the form binds its button state to
    pub fn can_save(&self) -> bool {
        self.mode == Mode::Editing && self.buffer.is_savable()
    }

    // === Editing → Browsing ===

    /// Commit the buffer: upsert-by-id into the collection, persist, return
    /// to `Browsing`. On a store write failure the buffer and mode are kept
    /// so nothing typed is lost.
    pub async fn save(&mut self) -> Result<()> {
        if !self.can_save() {
            return Err(AtelierError::ValidationError(
                "Title and type are required".to_string(),
            ));
        }

        let id = match &self.buffer.id {
            Some(id) => id.clone(),
            None => project::generate_id(&self.projects),
        };
        let committed = self.buffer.clone().into_project(id.clone());

        let mut updated = self.projects.clone();
        project::upsert(&mut updated, committed);
        self.store.save(&updated).await?;

        self.projects = updated;
        self.buffer = EditBuffer::default();
        self.mode = Mode::Browsing;
        info!(target: "dashboard", %id, "Project saved");
        Ok(())
    }

    /// Discard the buffer, no store write
    pub fn cancel(&mut self) {
        if self.mode == Mode::Editing {
            self.buffer = EditBuffer::default();
            self.mode = Mode::Browsing;
        }
    }

    // === Delete (Browsing only, explicit confirmation) ===

    pub fn request_delete(&mut self, id: &str) {
        if self.mode != Mode::Browsing {
            debug!(target: "dashboard", "request_delete ignored outside Browsing");
            return;
        }
        self.pending_delete = Some(id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Commit a previously requested delete. Deleting an id that is not in
    /// the collection leaves the persisted collection untouched.
    pub async fn confirm_delete(&mut self) -> Result<()> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(());
        };

        let mut updated = self.projects.clone();
        if !project::remove_by_id(&mut updated, &id) {
            debug!(target: "dashboard", %id, "confirm_delete: id not present, no-op");
            return Ok(());
        }

        self.store.save(&updated).await?;
        self.projects = updated;
        info!(target: "dashboard", %id, "Project deleted");
        Ok(())
    }

    // === Generation ===

    /// Ask the generator to draft copy for the buffer.
    ///
    /// Precondition: editing, title and type filled in, no generation
    /// already in flight. On success the buffer's description and details
    /// are replaced wholesale (regenerate contract); on failure the buffer
    /// is left untouched and the reason is returned to the caller.
    pub async fn generate_description(&mut self) -> Result<()> {
        if self.mode != Mode::Editing {
            return Err(AtelierError::ValidationError(
                "Not editing a project".to_string(),
            ));
        }
        if self.generating {
            return Err(AtelierError::ValidationError(
                "A generation request is already in flight".to_string(),
            ));
        }
        let (title, kind) = match (&self.buffer.title, &self.buffer.kind) {
            (Some(t), Some(k)) if !t.trim().is_empty() && !k.trim().is_empty() => {
                (t.clone(), k.clone())
            }
            _ => {
                return Err(AtelierError::ValidationError(
                    "Title and type are required".to_string(),
                ))
            }
        };
        let tools = self.buffer.tools.clone();

        self.generating = true;
        let result = self.generator.generate(&title, &kind, &tools).await;
        self.generating = false;

        let generated = result?;
        self.buffer.description = Some(generated.description);
        self.buffer.details = Some(generated.details);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratedDescription;
    use crate::project::ProjectDetails;
    use crate::store::InMemorySlot;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test double: scripted result plus an invocation counter
    struct ScriptedGenerator {
        result: std::result::Result<GeneratedDescription, String>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                result: Ok(GeneratedDescription {
                    description: "Generated brief.".to_string(),
                    details: ProjectDetails {
                        problem: "Generated problem.".to_string(),
                        approach: "Generated approach.".to_string(),
                        outcome: "Generated outcome.".to_string(),
                    },
                }),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                result: Err("backend unreachable".to_string()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DescriptionGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _title: &str,
            _kind: &str,
            _tools: &[String],
        ) -> Result<GeneratedDescription> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(AtelierError::GenerationFailed)
        }
    }

    async fn controller_with(
        generator: Arc<dyn DescriptionGenerator>,
    ) -> (DashboardController, ProjectStore) {
        let slot = InMemorySlot::new();
        let controller = DashboardController::new(ProjectStore::new(slot.clone()), generator)
            .await
            .unwrap();
        (controller, ProjectStore::new(slot))
    }

    #[tokio::test]
    async fn test_begin_add_seeds_empty_buffer() {
        let (mut c, _) = controller_with(ScriptedGenerator::ok()).await;
        c.begin_add();
        assert_eq!(c.mode(), Mode::Editing);
        assert!(c.buffer().tools.is_empty());
        assert!(c.buffer().id.is_none());
    }

    #[tokio::test]
    async fn test_save_rejected_without_kind_and_collection_unchanged() {
        let (mut c, store) = controller_with(ScriptedGenerator::ok()).await;
        let before = store.load().await.unwrap();

        c.begin_add();
        c.set_title("Poster Series");
        assert!(!c.can_save());
        assert!(matches!(
            c.save().await,
            Err(AtelierError::ValidationError(_))
        ));
        assert_eq!(c.mode(), Mode::Editing);
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_save_new_project_assigns_id_and_persists() {
        let (mut c, store) = controller_with(ScriptedGenerator::ok()).await;
        let before = c.projects().len();

        c.begin_add();
        c.set_title("Poster Series");
        c.set_kind("Print");
        c.set_tools_csv("Photoshop, InDesign");
        c.save().await.unwrap();

        assert_eq!(c.mode(), Mode::Browsing);
        assert_eq!(c.projects().len(), before + 1);

        let persisted = store.load().await.unwrap();
        let added = persisted.iter().find(|p| p.title == "Poster Series").unwrap();
        assert!(!added.id.is_empty());
        assert_eq!(added.tools, vec!["Photoshop", "InDesign"]);
        // Cached copy and persisted copy agree
        assert_eq!(persisted, c.projects());
    }

    #[tokio::test]
    async fn test_edit_upserts_in_place_keeping_id_and_order() {
        let (mut c, store) = controller_with(ScriptedGenerator::ok()).await;
        assert!(c.begin_edit("2"));
        c.set_title("FinTech Dashboard v2");
        c.save().await.unwrap();

        let persisted = store.load().await.unwrap();
        assert_eq!(persisted[1].id, "2");
        assert_eq!(persisted[1].title, "FinTech Dashboard v2");
        assert_eq!(persisted.len(), 3);
    }

    #[tokio::test]
    async fn test_cancel_discards_buffer_without_write() {
        let (mut c, store) = controller_with(ScriptedGenerator::ok()).await;
        let before = store.load().await.unwrap();

        assert!(c.begin_edit("1"));
        c.set_title("Should not stick");
        c.cancel();

        assert_eq!(c.mode(), Mode::Browsing);
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_two_phase_delete() {
        let (mut c, store) = controller_with(ScriptedGenerator::ok()).await;

        c.request_delete("1");
        assert_eq!(c.pending_delete(), Some("1"));
        c.cancel_delete();
        c.confirm_delete().await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 3);

        c.request_delete("1");
        c.confirm_delete().await.unwrap();
        let persisted = store.load().await.unwrap();
        assert_eq!(persisted.len(), 2);
        assert!(!persisted.iter().any(|p| p.id == "1"));
    }

    #[tokio::test]
    async fn test_delete_absent_id_is_noop() {
        let (mut c, store) = controller_with(ScriptedGenerator::ok()).await;
        let before = store.load().await.unwrap();

        c.request_delete("no-such-id");
        c.confirm_delete().await.unwrap();
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_generation_overwrites_typed_text_wholesale() {
        let (mut c, _) = controller_with(ScriptedGenerator::ok()).await;
        c.begin_add();
        c.set_title("Poster Series");
        c.set_kind("Print");
        c.set_description("hand-typed draft");
        c.set_problem("hand-typed problem");

        c.generate_description().await.unwrap();

        assert_eq!(c.buffer().description.as_deref(), Some("Generated brief."));
        let details = c.buffer().details.as_ref().unwrap();
        assert_eq!(details.problem, "Generated problem.");
        assert!(!c.is_generating());
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_buffer_untouched() {
        let (mut c, _) = controller_with(ScriptedGenerator::failing()).await;
        c.begin_add();
        c.set_title("Poster Series");
        c.set_kind("Print");
        c.set_description("hand-typed draft");

        let err = c.generate_description().await.unwrap_err();
        assert!(matches!(err, AtelierError::GenerationFailed(_)));
        assert_eq!(c.buffer().description.as_deref(), Some("hand-typed draft"));
        assert!(!c.is_generating());
    }

    #[tokio::test]
    async fn test_generation_requires_title_and_kind_and_never_calls_generator() {
        let generator = ScriptedGenerator::ok();
        let (mut c, _) = controller_with(generator.clone()).await;
        c.begin_add();
        c.set_title("Poster Series");

        assert!(matches!(
            c.generate_description().await,
            Err(AtelierError::ValidationError(_))
        ));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_busy_flag_blocks_reentrant_generation() {
        let generator = ScriptedGenerator::ok();
        let (mut c, _) = controller_with(generator.clone()).await;
        c.begin_add();
        c.set_title("Poster Series");
        c.set_kind("Print");

        c.generating = true;
        assert!(matches!(
            c.generate_description().await,
            Err(AtelierError::ValidationError(_))
        ));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}
