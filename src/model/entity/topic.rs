use serde::{Deserialize, Serialize};

use crate::impl_entity_for;
use crate::model::NodeKey;
use crate::model::entity::Visibility;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    id: i64,
    course_id: i64,
    title: String,
    #[serde(default)]
    sort_order: i32,
    #[serde(default)]
    visibility: Visibility,
    #[serde(default)]
    archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCreate {
    pub course_id: i64,
    pub title: String,
    pub sort_order: Option<i32>,
    pub visibility: Visibility,
}

impl_entity_for!(Topic, Topic);

impl Topic {
    pub fn new(id: i64, course_id: i64, title: impl Into<String>, sort_order: i32) -> Self {
        Self {
            id,
            course_id,
            title: title.into(),
            sort_order,
            visibility: Visibility::default(),
            archived: false,
        }
    }

    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn reparent(&mut self, course_id: i64) {
        self.course_id = course_id;
    }

    pub(crate) fn container(&self) -> Option<NodeKey> {
        Some(NodeKey::course(self.course_id))
    }
}

impl TopicCreate {
    pub fn new(course_id: i64, title: impl Into<String>) -> Self {
        Self {
            course_id,
            title: title.into(),
            sort_order: None,
            visibility: Visibility::default(),
        }
    }
}
