//! Portfolio project data model.
//!
//! A `Project` is one portfolio entry; the collection is an ordered
//! `Vec<Project>` whose insertion order is the display order. `EditBuffer`
//! is the transient, partially-filled project used while composing a
//! create or edit operation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Problem / approach / outcome detail triple shown on a project page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub problem: String,
    pub approach: String,
    pub outcome: String,
}

/// One portfolio entry
///
/// `id` is opaque, unique within the collection, and immutable once
/// assigned. `title` and `kind` are required for a project to be savable;
/// everything else may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    /// Project category ("Brand Identity", "UI Design", ...).
    /// Serialized as `type` to keep the persisted format stable.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: ProjectDetails,
}

/// Work-in-progress project state backing the edit form.
///
/// All fields are optional; the buffer is discarded on cancel or after a
/// successful save and is never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub id: Option<String>,
    pub title: Option<String>,
    pub kind: Option<String>,
    pub tools: Vec<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub details: Option<ProjectDetails>,
}

impl EditBuffer {
    /// Seed a buffer from an existing project (deep copy, so form edits do
    /// not touch the list until save)
    pub fn from_project(project: &Project) -> Self {
        Self {
            id: Some(project.id.clone()),
            title: Some(project.title.clone()),
            kind: Some(project.kind.clone()),
            tools: project.tools.clone(),
            image: Some(project.image.clone()),
            description: Some(project.description.clone()),
            details: Some(project.details.clone()),
        }
    }

    /// Save gate: both title and kind must be non-empty after trimming
    pub fn is_savable(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.title) && filled(&self.kind)
    }

    /// Materialize the buffer into a full project under the given id.
    ///
    /// Callers must check `is_savable()` first; missing optional fields get
    /// the same defaults the admin form applies to a brand-new entry.
    pub fn into_project(self, id: String) -> Project {
        Project {
            id,
            title: self.title.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            tools: self.tools,
            image: self
                .image
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "/placeholder-project-new.jpg".to_string()),
            description: self.description.unwrap_or_default(),
            details: self.details.unwrap_or_else(|| ProjectDetails {
                problem: "Description pending...".to_string(),
                approach: "Description pending...".to_string(),
                outcome: "Description pending...".to_string(),
            }),
        }
    }
}

/// Parse the form's comma-separated tools field into the internal ordered
/// list, trimming entries and dropping blanks
pub fn parse_tools(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Generate a fresh project id: millisecond timestamp, bumped until it does
/// not collide with any id already in the collection
pub fn generate_id(existing: &[Project]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|p| p.id == id) {
            return id;
        }
        candidate += 1;
    }
}

/// Insert-if-absent, replace-if-present, keyed by id. Replacement keeps the
/// project's position in display order; insertion appends.
pub fn upsert(collection: &mut Vec<Project>, project: Project) {
    match collection.iter_mut().find(|p| p.id == project.id) {
        Some(slot) => *slot = project,
        None => collection.push(project),
    }
}

/// Remove the project with the given id. Removing an absent id is a no-op.
pub fn remove_by_id(collection: &mut Vec<Project>, id: &str) -> bool {
    let before = collection.len();
    collection.retain(|p| p.id != id);
    collection.len() != before
}

/// Built-in dataset shown (and persisted) before the owner has saved
/// anything of their own
pub fn default_projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            title: "EcoBrand Identity".to_string(),
            kind: "Brand Identity".to_string(),
            tools: vec!["Figma".to_string(), "Illustrator".to_string()],
            image: "/placeholder-project-1.svg".to_string(),
            description: "Complete brand identity for a sustainable fashion startup.".to_string(),
            details: ProjectDetails {
                problem: "The client needed a brand identity that communicated sustainability \
                          without falling into greenwashing clichés."
                    .to_string(),
                approach: "We focused on earthy tones and organic shapes, avoiding generic leaf \
                           icons. The typography was chosen to be modern yet approachable."
                    .to_string(),
                outcome: "A cohesive brand identity that helped the startup secure their first \
                          round of funding and launch successfully."
                    .to_string(),
            },
        },
        Project {
            id: "2".to_string(),
            title: "FinTech Dashboard UI".to_string(),
            kind: "UI Design".to_string(),
            tools: vec!["Figma".to_string()],
            image: "/placeholder-project-2.svg".to_string(),
            description: "User interface design for a financial analytics dashboard.".to_string(),
            details: ProjectDetails {
                problem: "Users found the existing dashboard clutter and difficult to navigate, \
                          leading to high churn."
                    .to_string(),
                approach: "I simplified the layout, used a clear hierarchy for data \
                           visualization, and introduced a dark mode for power users."
                    .to_string(),
                outcome: "User engagement increased by 40% and support tickets regarding \
                          navigation dropped significantly."
                    .to_string(),
            },
        },
        Project {
            id: "3".to_string(),
            title: "Coffee Shop Website".to_string(),
            kind: "Web Design".to_string(),
            tools: vec!["Wix".to_string()],
            image: "/placeholder-project-3.svg".to_string(),
            description: "Website design and build for a local coffee shop.".to_string(),
            details: ProjectDetails {
                problem: "The coffee shop had no online presence and customers couldn't find \
                          their menu or hours."
                    .to_string(),
                approach: "Built a simple, mobile-first website on Wix that captures the cozy \
                           atmosphere of the shop."
                    .to_string(),
                outcome: "Increased foot traffic and online orders for pickup.".to_string(),
            },
        },
    ]
}
