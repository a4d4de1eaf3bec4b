use serde::{Deserialize, Serialize};

/// The kinds of project entity the engine reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Project,
    Task,
    Resource,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Project => "project",
            EntityType::Task => "task",
            EntityType::Resource => "resource",
        }
    }
}

/// Caller-supplied context for one detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionContext {
    pub entity_type: EntityType,
    pub entity_id: String,
    /// Project the entity belongs to, when the entity is not itself a project.
    pub project_id: Option<String>,
    /// Connector session that supplied the two versions.
    pub connector_id: Option<String>,
}

impl DetectionContext {
    pub fn new(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type,
            entity_id: entity_id.into(),
            project_id: None,
            connector_id: None,
        }
    }
}
