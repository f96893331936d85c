//! Core data model: scenes, storyboards and the project type catalog.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Title used for a storyboard whose scenes have no title yet.
pub const UNTITLED_STORYBOARD: &str = "未命名專案";

/// Opaque identifier for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque identifier for a storyboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryboardId(String);

impl StoryboardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StoryboardId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for StoryboardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for StoryboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One described unit of UI/behavior within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub interactions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

impl Scene {
    /// A blank scene with a freshly generated id.
    pub fn empty() -> Self {
        Self {
            id: SceneId::new(),
            title: String::new(),
            objective: String::new(),
            layout: String::new(),
            interactions: String::new(),
            references: None,
        }
    }

    /// Value of a single editable field.
    pub fn field(&self, field: SceneField) -> &str {
        match field {
            SceneField::Title => &self.title,
            SceneField::Objective => &self.objective,
            SceneField::Layout => &self.layout,
            SceneField::Interactions => &self.interactions,
            SceneField::References => self.references.as_deref().unwrap_or(""),
        }
    }

    /// Merge the set fields of `patch` into this scene.
    pub fn apply(&mut self, patch: ScenePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(objective) = patch.objective {
            self.objective = objective;
        }
        if let Some(layout) = patch.layout {
            self.layout = layout;
        }
        if let Some(interactions) = patch.interactions {
            self.interactions = interactions;
        }
        if let Some(references) = patch.references {
            self.references = Some(references);
        }
    }

    /// True when the scene has neither a title nor an objective.
    pub fn is_incomplete(&self) -> bool {
        self.title.trim().is_empty() && self.objective.trim().is_empty()
    }
}

/// The five editable text fields of a scene, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneField {
    Title,
    Objective,
    Layout,
    Interactions,
    References,
}

impl SceneField {
    pub const ALL: [SceneField; 5] = [
        SceneField::Title,
        SceneField::Objective,
        SceneField::Layout,
        SceneField::Interactions,
        SceneField::References,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Objective,
            Self::Objective => Self::Layout,
            Self::Layout => Self::Interactions,
            Self::Interactions => Self::References,
            Self::References => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::References,
            Self::Objective => Self::Title,
            Self::Layout => Self::Objective,
            Self::Interactions => Self::Layout,
            Self::References => Self::Interactions,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "場景標題",
            Self::Objective => "目標",
            Self::Layout => "畫面",
            Self::Interactions => "互動",
            Self::References => "參考資料",
        }
    }

    /// Whether Enter inserts a newline rather than moving to the next field.
    pub fn is_multiline(self) -> bool {
        !matches!(self, Self::Title)
    }
}

/// Partial update for a scene. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenePatch {
    pub title: Option<String>,
    pub objective: Option<String>,
    pub layout: Option<String>,
    pub interactions: Option<String>,
    pub references: Option<String>,
}

impl ScenePatch {
    /// A patch that sets exactly one field.
    pub fn field(field: SceneField, value: String) -> Self {
        let mut patch = Self::default();
        match field {
            SceneField::Title => patch.title = Some(value),
            SceneField::Objective => patch.objective = Some(value),
            SceneField::Layout => patch.layout = Some(value),
            SceneField::Interactions => patch.interactions = Some(value),
            SceneField::References => patch.references = Some(value),
        }
        patch
    }
}

/// One of the three fixed project archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProjectType {
    #[default]
    Fullstack,
    FrontendOnly,
    BackendOnly,
}

impl ProjectType {
    pub const ALL: [ProjectType; 3] = [
        ProjectType::Fullstack,
        ProjectType::FrontendOnly,
        ProjectType::BackendOnly,
    ];

    /// The value embedded in prompts and persisted storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fullstack => "Fullstack",
            Self::FrontendOnly => "Frontend Only",
            Self::BackendOnly => "Backend Only",
        }
    }

    /// Parse a stored value. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s.trim())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fullstack => "全端 (Fullstack)",
            Self::FrontendOnly => "純前端 (Frontend Only)",
            Self::BackendOnly => "純後端 (Backend Only)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Fullstack => "有畫面 + 有後端 API + 有資料庫。",
            Self::FrontendOnly => "只有畫面，資料存在瀏覽器 (localStorage)。",
            Self::BackendOnly => "只有 API，沒有畫面。",
        }
    }

    pub fn example(self) -> &'static str {
        match self {
            Self::Fullstack => "範例：會員系統、電商網站、部落格、SaaS 服務。",
            Self::FrontendOnly => "範例：公司官網、活動頁面、作品集。",
            Self::BackendOnly => "範例：資料 API、爬蟲程式、排程任務。",
        }
    }

    pub fn tech_details(self) -> &'static str {
        match self {
            Self::Fullstack => "Node.js + Express (前端) / Python FastAPI (後端) / SQLite",
            Self::FrontendOnly => "Node.js + Express + HTML/CSS/JS (無後端)",
            Self::BackendOnly => "Python FastAPI + SQLite (無前端)",
        }
    }

    /// Cycle to the next archetype in selector order.
    pub fn next(self) -> Self {
        match self {
            Self::Fullstack => Self::FrontendOnly,
            Self::FrontendOnly => Self::BackendOnly,
            Self::BackendOnly => Self::Fullstack,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Fullstack => Self::BackendOnly,
            Self::FrontendOnly => Self::Fullstack,
            Self::BackendOnly => Self::FrontendOnly,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProjectType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProjectType {
    /// Lenient: null or unrecognised values fall back to Fullstack instead of
    /// failing the whole collection.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(ProjectType::parse)
            .unwrap_or_default())
    }
}

/// A saved project: ordered scenes, a project type, and optionally the
/// prompt pack generated from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storyboard {
    pub id: StoryboardId,
    pub title: String,
    pub scenes: Vec<Scene>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub generated_spec: Option<String>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_type: ProjectType,
}

/// Derive a storyboard title from its scenes: the first non-blank scene
/// title, or the untitled placeholder.
pub fn derive_title(scenes: &[Scene]) -> String {
    scenes
        .iter()
        .map(|s| s.title.trim())
        .find(|t| !t.is_empty())
        .unwrap_or(UNTITLED_STORYBOARD)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_titled(title: &str) -> Scene {
        Scene {
            title: title.to_string(),
            ..Scene::empty()
        }
    }

    #[test]
    fn test_empty_scene_has_unique_id() {
        let a = Scene::empty();
        let b = Scene::empty();
        assert_ne!(a.id, b.id);
        assert!(a.title.is_empty());
        assert!(a.references.is_none());
    }

    #[test]
    fn test_apply_patch_only_touches_set_fields() {
        let mut scene = scene_titled("登入頁");
        scene.objective = "讓使用者登入".to_string();
        scene.apply(ScenePatch {
            layout: Some("置中表單".to_string()),
            ..ScenePatch::default()
        });
        assert_eq!(scene.title, "登入頁");
        assert_eq!(scene.objective, "讓使用者登入");
        assert_eq!(scene.layout, "置中表單");
    }

    #[test]
    fn test_patch_field_sets_references() {
        let mut scene = Scene::empty();
        scene.apply(ScenePatch::field(
            SceneField::References,
            "https://example.com/api".to_string(),
        ));
        assert_eq!(scene.field(SceneField::References), "https://example.com/api");
    }

    #[test]
    fn test_is_incomplete() {
        assert!(Scene::empty().is_incomplete());
        assert!(scene_titled("   ").is_incomplete());
        assert!(!scene_titled("首頁").is_incomplete());

        let mut objective_only = Scene::empty();
        objective_only.objective = "展示商品".to_string();
        assert!(!objective_only.is_incomplete());
    }

    #[test]
    fn test_scene_field_next_prev_inverse() {
        for field in SceneField::ALL {
            assert_eq!(field.next().prev(), field);
            assert_eq!(field.prev().next(), field);
        }
        assert_eq!(SceneField::References.next(), SceneField::Title);
    }

    #[test]
    fn test_project_type_parse_round_trip() {
        for t in ProjectType::ALL {
            assert_eq!(ProjectType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ProjectType::parse("Mobile"), None);
    }

    #[test]
    fn test_project_type_cycle() {
        let t = ProjectType::default();
        assert_eq!(t, ProjectType::Fullstack);
        assert_eq!(t.next().next().next(), t);
        assert_eq!(t.prev(), ProjectType::BackendOnly);
    }

    #[test]
    fn test_derive_title_first_non_blank() {
        let scenes = vec![scene_titled(""), scene_titled("商品列表"), scene_titled("購物車")];
        assert_eq!(derive_title(&scenes), "商品列表");
    }

    #[test]
    fn test_derive_title_fallback() {
        assert_eq!(derive_title(&[Scene::empty()]), UNTITLED_STORYBOARD);
        assert_eq!(derive_title(&[]), UNTITLED_STORYBOARD);
    }

    #[test]
    fn test_storyboard_json_field_names() {
        let now = Utc::now();
        let board = Storyboard {
            id: StoryboardId::from("sb-1"),
            title: "Demo".to_string(),
            scenes: vec![Scene::empty()],
            created_at: now,
            updated_at: now,
            generated_spec: None,
            generated_at: None,
            project_type: ProjectType::BackendOnly,
        };
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["id"], "sb-1");
        assert_eq!(json["projectType"], "Backend Only");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json["generatedSpec"].is_null());
    }

    #[test]
    fn test_storyboard_missing_project_type_defaults_to_fullstack() {
        let json = r#"{
            "id": "abc",
            "title": "舊資料",
            "scenes": [],
            "createdAt": "2024-05-01T08:00:00Z",
            "updatedAt": "2024-05-02T08:00:00Z",
            "techStack": "Auto"
        }"#;
        let board: Storyboard = serde_json::from_str(json).unwrap();
        assert_eq!(board.project_type, ProjectType::Fullstack);
        assert!(board.generated_spec.is_none());
    }

    #[test]
    fn test_storyboard_unknown_project_type_defaults_to_fullstack() {
        let json = r#"{
            "id": "abc",
            "title": "x",
            "scenes": [],
            "createdAt": "2024-05-01T08:00:00Z",
            "updatedAt": "2024-05-02T08:00:00Z",
            "generatedSpec": null,
            "generatedAt": null,
            "projectType": "Desktop"
        }"#;
        let board: Storyboard = serde_json::from_str(json).unwrap();
        assert_eq!(board.project_type, ProjectType::Fullstack);
    }
}
