use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Course,
    Topic,
    SubTopic,
    Lesson,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Course,
        EntityKind::Topic,
        EntityKind::SubTopic,
        EntityKind::Lesson,
    ];

    /// REST collection name for this kind.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Course => "courses",
            Self::Topic => "topics",
            Self::SubTopic => "subtopics",
            Self::Lesson => "lessons",
        }
    }

    /// Tie-breaker among siblings that share a sort order.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Course => 0,
            Self::Topic => 1,
            Self::SubTopic => 2,
            Self::Lesson => 3,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Lesson)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Course => write!(f, "course"),
            Self::Topic => write!(f, "topic"),
            Self::SubTopic => write!(f, "subtopic"),
            Self::Lesson => write!(f, "lesson"),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "course" => Ok(Self::Course),
            "topic" => Ok(Self::Topic),
            "subtopic" | "sub_topic" | "sub-topic" => Ok(Self::SubTopic),
            "lesson" => Ok(Self::Lesson),
            other => Err(format!("unknown entity kind `{other}`")),
        }
    }
}

/// Identifies a node in the tree. Ids are only unique per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub kind: EntityKind,
    pub id: i64,
}

impl NodeKey {
    pub fn new(kind: EntityKind, id: i64) -> Self {
        Self { kind, id }
    }

    pub fn course(id: i64) -> Self {
        Self::new(EntityKind::Course, id)
    }

    pub fn topic(id: i64) -> Self {
        Self::new(EntityKind::Topic, id)
    }

    pub fn sub_topic(id: i64) -> Self {
        Self::new(EntityKind::SubTopic, id)
    }

    pub fn lesson(id: i64) -> Self {
        Self::new(EntityKind::Lesson, id)
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Parses `kind:id`, e.g. `topic:12`.
impl std::str::FromStr for NodeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| format!("expected `kind:id`, got `{s}`"))?;
        let id = id
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid id in `{s}`: {e}"))?;
        Ok(Self::new(kind.trim().parse()?, id))
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> EntityKind;
}

pub trait CurriculumEntity: ResourceTyped {
    fn id(&self) -> i64;
    fn title(&self) -> &str;
    fn sort_order(&self) -> i32;
    fn set_sort_order(&mut self, sort_order: i32);
    fn visibility(&self) -> super::entity::Visibility;
    fn archived(&self) -> bool;

    /// Direct container of this entity, `None` for courses.
    fn parent(&self) -> Option<NodeKey>;

    fn key(&self) -> NodeKey {
        NodeKey::new(Self::get_resource_type(), self.id())
    }
}

#[macro_export]
macro_rules! impl_entity_for {
    ($ent:ident, $kind:ident) => {
        impl $crate::model::ResourceTyped for $ent {
            fn get_resource_type() -> $crate::model::EntityKind {
                $crate::model::EntityKind::$kind
            }
        }

        impl $ent {
            pub fn with_id(mut self, id: i64) -> Self {
                self.id = id;
                self
            }
        }

        impl $crate::model::CurriculumEntity for $ent {
            fn id(&self) -> i64 {
                self.id
            }

            fn title(&self) -> &str {
                &self.title
            }

            fn sort_order(&self) -> i32 {
                self.sort_order
            }

            fn set_sort_order(&mut self, sort_order: i32) {
                self.sort_order = sort_order;
            }

            fn visibility(&self) -> $crate::model::entity::Visibility {
                self.visibility
            }

            fn archived(&self) -> bool {
                self.archived
            }

            fn parent(&self) -> Option<$crate::model::NodeKey> {
                self.container()
            }
        }
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn node_key_parses_kind_and_id() {
        let key: NodeKey = "subtopic:7".parse().unwrap();
        assert_eq!(key, NodeKey::sub_topic(7));
        assert_eq!(key.to_string(), "subtopic:7");

        assert!("lesson".parse::<NodeKey>().is_err());
        assert!("unit:3".parse::<NodeKey>().is_err());
        assert!("lesson:x".parse::<NodeKey>().is_err());
    }

    #[test]
    fn only_lessons_are_leaves() {
        assert!(EntityKind::Course.is_container());
        assert!(EntityKind::SubTopic.is_container());
        assert!(!EntityKind::Lesson.is_container());
    }
}
