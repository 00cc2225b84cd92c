use serde::{Deserialize, Serialize};

use crate::impl_entity_for;
use crate::model::NodeKey;
use crate::model::entity::Visibility;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    id: i64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    sort_order: i32,
    #[serde(default)]
    visibility: Visibility,
    #[serde(default)]
    archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCreate {
    pub title: String,
    pub description: String,
    pub sort_order: Option<i32>,
    pub visibility: Visibility,
}

impl_entity_for!(Course, Course);

impl Course {
    pub fn new(id: i64, title: impl Into<String>, sort_order: i32) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            sort_order,
            visibility: Visibility::default(),
            archived: false,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub(crate) fn container(&self) -> Option<NodeKey> {
        None
    }
}

impl CourseCreate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            sort_order: None,
            visibility: Visibility::default(),
        }
    }
}
