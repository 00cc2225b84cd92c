use serde::{Deserialize, Serialize};

use crate::model::{CurriculumEntity, EntityKind, NodeKey};

mod course;
pub use course::{Course, CourseCreate};

mod topic;
pub use topic::{Topic, TopicCreate};

mod sub_topic;
pub use sub_topic::{SubTopic, SubTopicCreate};

mod lesson;
pub use lesson::{Lesson, LessonCreate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// Any one of the four curriculum entities. Payloads carry no kind tag, so
/// decoding goes through [`AnyEntity::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyEntity {
    Course(Course),
    Topic(Topic),
    SubTopic(SubTopic),
    Lesson(Lesson),
}

impl AnyEntity {
    /// Decodes a backend payload whose kind is known from the request.
    pub fn from_value(kind: EntityKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            EntityKind::Course => Self::Course(serde_json::from_value(value)?),
            EntityKind::Topic => Self::Topic(serde_json::from_value(value)?),
            EntityKind::SubTopic => Self::SubTopic(serde_json::from_value(value)?),
            EntityKind::Lesson => Self::Lesson(serde_json::from_value(value)?),
        })
    }

    fn inner(&self) -> &dyn EntityView {
        match self {
            Self::Course(e) => e,
            Self::Topic(e) => e,
            Self::SubTopic(e) => e,
            Self::Lesson(e) => e,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Course(_) => EntityKind::Course,
            Self::Topic(_) => EntityKind::Topic,
            Self::SubTopic(_) => EntityKind::SubTopic,
            Self::Lesson(_) => EntityKind::Lesson,
        }
    }

    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.kind(), self.id())
    }

    pub fn id(&self) -> i64 {
        self.inner().view_id()
    }

    pub fn title(&self) -> &str {
        self.inner().view_title()
    }

    pub fn sort_order(&self) -> i32 {
        self.inner().view_sort_order()
    }

    pub fn visibility(&self) -> Visibility {
        self.inner().view_visibility()
    }

    pub fn archived(&self) -> bool {
        self.inner().view_archived()
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.inner().view_parent()
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        match &mut self {
            Self::Course(e) => e.set_sort_order(sort_order),
            Self::Topic(e) => e.set_sort_order(sort_order),
            Self::SubTopic(e) => e.set_sort_order(sort_order),
            Self::Lesson(e) => e.set_sort_order(sort_order),
        }
        self
    }

    pub fn with_id(self, id: i64) -> Self {
        match self {
            Self::Course(e) => e.with_id(id).into(),
            Self::Topic(e) => e.with_id(id).into(),
            Self::SubTopic(e) => e.with_id(id).into(),
            Self::Lesson(e) => e.with_id(id).into(),
        }
    }

    /// Copy of `self` re-parented under `parent`, `None` when the pair cannot nest.
    pub fn moved_to(&self, parent: &AnyEntity, sort_order: i32) -> Option<AnyEntity> {
        let moved: AnyEntity = match (self.clone(), parent) {
            (Self::Topic(mut e), Self::Course(p)) => {
                e.reparent(p.id());
                e.into()
            }
            (Self::SubTopic(mut e), Self::Topic(p)) => {
                e.reparent(p.course_id(), p.id());
                e.into()
            }
            (Self::Lesson(mut e), Self::Topic(p)) => {
                e.reparent(p.course_id(), p.id(), None);
                e.into()
            }
            (Self::Lesson(mut e), Self::SubTopic(p)) => {
                e.reparent(p.course_id(), p.topic_id(), Some(p.id()));
                e.into()
            }
            _ => return None,
        };
        Some(moved.with_sort_order(sort_order))
    }

    /// Owning course; a course owns itself.
    pub fn course_id(&self) -> i64 {
        match self {
            Self::Course(e) => e.id(),
            Self::Topic(e) => e.course_id(),
            Self::SubTopic(e) => e.course_id(),
            Self::Lesson(e) => e.course_id(),
        }
    }
}

// object-safe projection of `CurriculumEntity` for the enum accessors
trait EntityView {
    fn view_id(&self) -> i64;
    fn view_title(&self) -> &str;
    fn view_sort_order(&self) -> i32;
    fn view_visibility(&self) -> Visibility;
    fn view_archived(&self) -> bool;
    fn view_parent(&self) -> Option<NodeKey>;
}

impl<T: CurriculumEntity> EntityView for T {
    fn view_id(&self) -> i64 {
        self.id()
    }

    fn view_title(&self) -> &str {
        self.title()
    }

    fn view_sort_order(&self) -> i32 {
        self.sort_order()
    }

    fn view_visibility(&self) -> Visibility {
        self.visibility()
    }

    fn view_archived(&self) -> bool {
        self.archived()
    }

    fn view_parent(&self) -> Option<NodeKey> {
        self.parent()
    }
}

impl From<Course> for AnyEntity {
    fn from(value: Course) -> Self {
        Self::Course(value)
    }
}

impl From<Topic> for AnyEntity {
    fn from(value: Topic) -> Self {
        Self::Topic(value)
    }
}

impl From<SubTopic> for AnyEntity {
    fn from(value: SubTopic) -> Self {
        Self::SubTopic(value)
    }
}

impl From<Lesson> for AnyEntity {
    fn from(value: Lesson) -> Self {
        Self::Lesson(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityDraft {
    Course(CourseCreate),
    Topic(TopicCreate),
    SubTopic(SubTopicCreate),
    Lesson(LessonCreate),
}

impl EntityDraft {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Course(_) => EntityKind::Course,
            Self::Topic(_) => EntityKind::Topic,
            Self::SubTopic(_) => EntityKind::SubTopic,
            Self::Lesson(_) => EntityKind::Lesson,
        }
    }

    /// Container the new entity will be appended to, `None` for courses.
    pub fn container(&self) -> Option<NodeKey> {
        match self {
            Self::Course(_) => None,
            Self::Topic(d) => Some(NodeKey::course(d.course_id)),
            Self::SubTopic(d) => Some(NodeKey::topic(d.topic_id)),
            Self::Lesson(d) => match d.sub_topic_id {
                Some(id) => Some(NodeKey::sub_topic(id)),
                None => Some(NodeKey::topic(d.topic_id)),
            },
        }
    }

    pub fn sort_order(&self) -> Option<i32> {
        match self {
            Self::Course(d) => d.sort_order,
            Self::Topic(d) => d.sort_order,
            Self::SubTopic(d) => d.sort_order,
            Self::Lesson(d) => d.sort_order,
        }
    }

    pub fn set_sort_order(&mut self, sort_order: i32) {
        match self {
            Self::Course(d) => d.sort_order = Some(sort_order),
            Self::Topic(d) => d.sort_order = Some(sort_order),
            Self::SubTopic(d) => d.sort_order = Some(sort_order),
            Self::Lesson(d) => d.sort_order = Some(sort_order),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSnapshot {
    pub course: Option<Course>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub sub_topics: Vec<SubTopic>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}
