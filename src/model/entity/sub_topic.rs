use serde::{Deserialize, Serialize};

use crate::impl_entity_for;
use crate::model::NodeKey;
use crate::model::entity::Visibility;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTopic {
    id: i64,
    course_id: i64,
    topic_id: i64,
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
pub struct SubTopicCreate {
    pub course_id: i64,
    pub topic_id: i64,
    pub title: String,
    pub sort_order: Option<i32>,
    pub visibility: Visibility,
}

impl_entity_for!(SubTopic, SubTopic);

impl SubTopic {
    pub fn new(
        id: i64,
        course_id: i64,
        topic_id: i64,
        title: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        Self {
            id,
            course_id,
            topic_id,
            title: title.into(),
            sort_order,
            visibility: Visibility::default(),
            archived: false,
        }
    }

    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    pub fn topic_id(&self) -> i64 {
        self.topic_id
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

    pub fn reparent(&mut self, course_id: i64, topic_id: i64) {
        self.course_id = course_id;
        self.topic_id = topic_id;
    }

    pub(crate) fn container(&self) -> Option<NodeKey> {
        Some(NodeKey::topic(self.topic_id))
    }
}

impl SubTopicCreate {
    pub fn new(course_id: i64, topic_id: i64, title: impl Into<String>) -> Self {
        Self {
            course_id,
            topic_id,
            title: title.into(),
            sort_order: None,
            visibility: Visibility::default(),
        }
    }
}
