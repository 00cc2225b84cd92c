use serde::{Deserialize, Serialize};

use crate::impl_entity_for;
use crate::model::NodeKey;
use crate::model::entity::Visibility;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    id: i64,
    course_id: i64,
    topic_id: i64,
    #[serde(default)]
    sub_topic_id: Option<i64>,
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
pub struct LessonCreate {
    pub course_id: i64,
    pub topic_id: i64,
    pub sub_topic_id: Option<i64>,
    pub title: String,
    pub sort_order: Option<i32>,
    pub visibility: Visibility,
}

impl_entity_for!(Lesson, Lesson);

impl Lesson {
    pub fn new(
        id: i64,
        course_id: i64,
        topic_id: i64,
        sub_topic_id: Option<i64>,
        title: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        Self {
            id,
            course_id,
            topic_id,
            sub_topic_id,
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

    pub fn sub_topic_id(&self) -> Option<i64> {
        self.sub_topic_id
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

    pub fn reparent(&mut self, course_id: i64, topic_id: i64, sub_topic_id: Option<i64>) {
        self.course_id = course_id;
        self.topic_id = topic_id;
        self.sub_topic_id = sub_topic_id;
    }

    // a lesson lives in its subtopic when it has one, otherwise directly in the topic
    pub(crate) fn container(&self) -> Option<NodeKey> {
        match self.sub_topic_id {
            Some(id) => Some(NodeKey::sub_topic(id)),
            None => Some(NodeKey::topic(self.topic_id)),
        }
    }
}

impl LessonCreate {
    pub fn in_topic(course_id: i64, topic_id: i64, title: impl Into<String>) -> Self {
        Self {
            course_id,
            topic_id,
            sub_topic_id: None,
            title: title.into(),
            sort_order: None,
            visibility: Visibility::default(),
        }
    }

    pub fn in_sub_topic(
        course_id: i64,
        topic_id: i64,
        sub_topic_id: i64,
        title: impl Into<String>,
    ) -> Self {
        Self {
            sub_topic_id: Some(sub_topic_id),
            ..Self::in_topic(course_id, topic_id, title)
        }
    }
}
