use std::collections::BTreeMap;

use crate::model::entity::{AnyEntity, Course, CourseSnapshot};
use crate::model::{CurriculumEntity, EntityKind, NodeKey};

/// In-memory display cache of the curriculum.
#[derive(Debug, Clone, Default)]
pub struct Curriculum {
    entities: BTreeMap<NodeKey, AnyEntity>,
}

impl Curriculum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entities<I>(entities: I) -> Self
    where
        I: IntoIterator<Item = AnyEntity>,
    {
        let mut cache = Self::new();
        for entity in entities {
            cache.upsert(entity);
        }
        cache
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, key: NodeKey) -> Option<&AnyEntity> {
        self.entities.get(&key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.entities.contains_key(&key)
    }

    pub fn parent_of(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(AnyEntity::parent)
    }

    pub fn courses(&self) -> Vec<&Course> {
        let mut courses: Vec<&AnyEntity> = self
            .entities
            .values()
            .filter(|e| e.kind() == EntityKind::Course)
            .collect();
        courses.sort_by_key(|e| display_order(e));
        courses
            .into_iter()
            .filter_map(|e| match e {
                AnyEntity::Course(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn children_of(&self, key: NodeKey) -> Vec<&AnyEntity> {
        let mut children: Vec<&AnyEntity> = self
            .entities
            .values()
            .filter(|e| e.parent() == Some(key))
            .collect();
        children.sort_by_key(|e| display_order(e));
        children
    }

    pub fn upsert(&mut self, entity: AnyEntity) -> Option<AnyEntity> {
        self.entities.insert(entity.key(), entity)
    }

    pub fn remove(&mut self, key: NodeKey) -> Vec<AnyEntity> {
        let mut doomed = vec![key];
        let mut idx = 0;
        while idx < doomed.len() {
            let parent = doomed[idx];
            doomed.extend(self.children_of(parent).into_iter().map(AnyEntity::key));
            idx += 1;
        }

        doomed
            .into_iter()
            .filter_map(|k| self.entities.remove(&k))
            .collect()
    }

    /// Drops every cached entity of the course and inserts the snapshot.
    pub fn replace_course(&mut self, course_id: i64, snapshot: CourseSnapshot) {
        self.entities.retain(|_, e| e.course_id() != course_id);

        let CourseSnapshot {
            course,
            topics,
            sub_topics,
            lessons,
        } = snapshot;

        if let Some(course) = course {
            self.upsert(course.into());
        }
        topics.into_iter().for_each(|e| {
            self.upsert(e.into());
        });
        sub_topics.into_iter().for_each(|e| {
            self.upsert(e.into());
        });
        lessons.into_iter().for_each(|e| {
            self.upsert(e.into());
        });
    }

    /// Replaces the course list; courses missing from `courses` lose their subtree.
    pub fn replace_courses(&mut self, courses: Vec<Course>) {
        let keep: Vec<NodeKey> = courses.iter().map(|c| NodeKey::course(c.id())).collect();
        let stale: Vec<NodeKey> = self
            .entities
            .keys()
            .filter(|k| k.kind == EntityKind::Course && !keep.contains(k))
            .copied()
            .collect();
        for key in stale {
            self.remove(key);
        }
        for course in courses {
            self.upsert(course.into());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnyEntity> {
        self.entities.values()
    }
}

// sort order, then kind, then id
pub(crate) fn display_order(entity: &AnyEntity) -> (i32, u8, i64) {
    (entity.sort_order(), entity.kind().rank(), entity.id())
}
