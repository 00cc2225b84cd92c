//! A backend that lives in process memory.
//!
//! Used for offline work from a fixture file and as the store behind test
//! servers. It follows the same rules the REST backend does: SORT renumbers the
//! siblings densely, REGROUP and copy append at the end of the new parent.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::{ApiError, ApiResult, CopyRequest, CurriculumApi, MoveRequest, SpecialDay};
use crate::model::entity::{
    AnyEntity, Course, CourseSnapshot, EntityDraft, Lesson, SubTopic, Topic,
};
use crate::model::{Curriculum, EntityKind, NodeKey};
use crate::tree::{MoveKind, can_contain, sort_order};

#[derive(Debug, Default)]
struct MemoryState {
    entities: Curriculum,
    special_days: Vec<SpecialDay>,
    next_id: i64,
    calls: Vec<String>,
    fail_next: Option<StatusCode>,
}

#[derive(Debug, Default)]
pub struct InMemoryApi {
    state: Mutex<MemoryState>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entities<I>(entities: I) -> Self
    where
        I: IntoIterator<Item = AnyEntity>,
    {
        let entities = Curriculum::from_entities(entities);
        let next_id = entities.iter().map(AnyEntity::id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(MemoryState {
                entities,
                next_id,
                ..Default::default()
            }),
        }
    }

    pub fn from_snapshots(snapshots: Vec<CourseSnapshot>) -> Self {
        let mut entities: Vec<AnyEntity> = Vec::new();
        for snapshot in snapshots {
            entities.extend(snapshot.course.map(AnyEntity::from));
            entities.extend(snapshot.topics.into_iter().map(AnyEntity::from));
            entities.extend(snapshot.sub_topics.into_iter().map(AnyEntity::from));
            entities.extend(snapshot.lessons.into_iter().map(AnyEntity::from));
        }
        Self::from_entities(entities)
    }

    /// Makes the next call fail with `status`.
    pub fn fail_next(&self, status: StatusCode) {
        self.lock().fail_next = Some(status);
    }

    /// Calls received so far, e.g. `move lesson:3`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn get(&self, key: NodeKey) -> Option<AnyEntity> {
        self.lock().entities.get(key).cloned()
    }

    pub fn children_of(&self, container: NodeKey) -> Vec<NodeKey> {
        self.lock()
            .entities
            .children_of(container)
            .into_iter()
            .map(AnyEntity::key)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self, call: String) -> ApiResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(status) => Err(ApiError::StatusError {
                status,
                message: format!("{} injected failure", status.as_u16()),
            }),
            None => Ok(state),
        }
    }
}

fn not_found(key: NodeKey) -> ApiError {
    ApiError::StatusError {
        status: StatusCode::NOT_FOUND,
        message: format!("{key} not found"),
    }
}

fn bad_request(message: String) -> ApiError {
    ApiError::StatusError {
        status: StatusCode::BAD_REQUEST,
        message,
    }
}

impl MemoryState {
    fn require(&self, key: NodeKey) -> ApiResult<AnyEntity> {
        self.entities.get(key).cloned().ok_or_else(|| not_found(key))
    }

    fn append_order(&self, container: NodeKey) -> ApiResult<i32> {
        sort_order::next_sort_order(&self.entities, container).map_err(|e| bad_request(e.to_string()))
    }

    fn issue_id(&mut self) -> i64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    fn place(&mut self, entity: &AnyEntity, parent: &AnyEntity, sort_order: i32) -> ApiResult<AnyEntity> {
        let placed = entity.moved_to(parent, sort_order).ok_or_else(|| {
            bad_request(format!("a {} cannot contain a {}", parent.kind(), entity.kind()))
        })?;
        self.entities.upsert(placed.clone());

        // descendants keep their order under the re-parented entity
        let children: Vec<AnyEntity> = self
            .entities
            .children_of(entity.key())
            .into_iter()
            .cloned()
            .collect();
        for child in children {
            self.place(&child, &placed, child.sort_order())?;
        }
        Ok(placed)
    }

    // dense renumbering of a container after `moved` was placed relative to an anchor
    fn resequence(&mut self, container: NodeKey, moved: NodeKey, anchor: Option<(NodeKey, sort_order::SiblingPosition)>) {
        let siblings: Vec<NodeKey> = self
            .entities
            .children_of(container)
            .into_iter()
            .map(AnyEntity::key)
            .collect();
        for (key, order) in sort_order::resequence(&siblings, moved, anchor) {
            if let Some(entity) = self.entities.get(key).cloned() {
                self.entities.upsert(entity.with_sort_order(order));
            }
        }
    }
}

#[async_trait]
impl CurriculumApi for InMemoryApi {
    async fn list_courses(&self) -> ApiResult<Vec<Course>> {
        let state = self.begin(String::from("list courses"))?;
        Ok(state.entities.courses().into_iter().cloned().collect())
    }

    async fn load_course(&self, course_id: i64) -> ApiResult<CourseSnapshot> {
        let state = self.begin(format!("load course:{course_id}"))?;
        let course = match state.require(NodeKey::course(course_id))? {
            AnyEntity::Course(course) => course,
            _ => return Err(not_found(NodeKey::course(course_id))),
        };

        let mut snapshot = CourseSnapshot {
            course: Some(course),
            ..Default::default()
        };
        for entity in state.entities.iter().filter(|e| e.course_id() == course_id) {
            match entity.clone() {
                AnyEntity::Topic(e) => snapshot.topics.push(e),
                AnyEntity::SubTopic(e) => snapshot.sub_topics.push(e),
                AnyEntity::Lesson(e) => snapshot.lessons.push(e),
                AnyEntity::Course(_) => {}
            }
        }
        Ok(snapshot)
    }

    async fn create(&self, draft: &EntityDraft) -> ApiResult<AnyEntity> {
        let mut state = self.begin(format!("create {}", draft.kind()))?;
        if let Some(container) = draft.container() {
            state.require(container)?;
        }
        let id = state.issue_id();
        let order = draft.sort_order().unwrap_or(0);

        let entity: AnyEntity = match draft {
            EntityDraft::Course(d) => {
                let mut e = Course::new(id, d.title.clone(), order);
                e.set_description(d.description.clone());
                e.set_visibility(d.visibility);
                e.into()
            }
            EntityDraft::Topic(d) => {
                let mut e = Topic::new(id, d.course_id, d.title.clone(), order);
                e.set_visibility(d.visibility);
                e.into()
            }
            EntityDraft::SubTopic(d) => {
                let mut e = SubTopic::new(id, d.course_id, d.topic_id, d.title.clone(), order);
                e.set_visibility(d.visibility);
                e.into()
            }
            EntityDraft::Lesson(d) => {
                let mut e = Lesson::new(id, d.course_id, d.topic_id, d.sub_topic_id, d.title.clone(), order);
                e.set_visibility(d.visibility);
                e.into()
            }
        };
        state.entities.upsert(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: &AnyEntity) -> ApiResult<AnyEntity> {
        let mut state = self.begin(format!("update {}", entity.key()))?;
        state.require(entity.key())?;
        state.entities.upsert(entity.clone());
        Ok(entity.clone())
    }

    async fn delete(&self, key: NodeKey) -> ApiResult<()> {
        let mut state = self.begin(format!("delete {key}"))?;
        state.require(key)?;
        state.entities.remove(key);
        Ok(())
    }

    async fn move_entity(&self, request: &MoveRequest) -> ApiResult<AnyEntity> {
        let mut state = self.begin(format!("move {}", request.source()))?;
        let entity = state.require(request.source())?;
        let parent = state.require(request.target_parent())?;
        if !can_contain(parent.kind(), entity.kind()) {
            return Err(bad_request(format!(
                "a {} cannot contain a {}",
                parent.kind(),
                entity.kind()
            )));
        }

        match request.move_kind {
            MoveKind::Regroup => {
                let order = state.append_order(parent.key())?;
                state.place(&entity, &parent, order)
            }
            MoveKind::Sort => {
                let anchor = request
                    .relative_to
                    .map(|r| (NodeKey::new(r.sibling_type, r.sibling_id), r.position));
                state.place(&entity, &parent, request.sort_order)?;
                state.resequence(parent.key(), entity.key(), anchor);
                state.require(entity.key())
            }
        }
    }

    async fn copy_entity(&self, request: &CopyRequest) -> ApiResult<AnyEntity> {
        let mut state = self.begin(format!("copy {}", request.source()))?;
        let source = state.require(request.source())?;
        let parent = state.require(request.target_parent())?;

        let order = state.append_order(parent.key())?;
        let root = copy_subtree(&mut state, &source, &parent, order)?;
        Ok(root)
    }

    async fn special_days(&self, course_id: i64) -> ApiResult<Vec<SpecialDay>> {
        let state = self.begin(format!("special days course:{course_id}"))?;
        let mut days: Vec<SpecialDay> = state
            .special_days
            .iter()
            .filter(|d| d.course_id == course_id)
            .cloned()
            .collect();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }

    async fn save_special_day(&self, day: &SpecialDay) -> ApiResult<SpecialDay> {
        let mut state = self.begin(format!("save special day {}", day.date))?;
        state.require(NodeKey::course(day.course_id))?;

        let mut saved = day.clone();
        // one override per course and date
        state
            .special_days
            .retain(|d| !(d.course_id == day.course_id && d.date == day.date));
        if saved.id.is_none() {
            saved.id = Some(state.issue_id());
        }
        state.special_days.push(saved.clone());
        Ok(saved)
    }
}

// copies `source` and its descendants under `parent`, returning the new root
fn copy_subtree(
    state: &mut MemoryState,
    source: &AnyEntity,
    parent: &AnyEntity,
    sort_order: i32,
) -> ApiResult<AnyEntity> {
    if source.kind() == EntityKind::Course {
        return Err(bad_request(String::from("courses cannot be copied")));
    }

    let id = state.issue_id();
    let fresh = source.clone().with_id(id);
    let copy = state.place(&fresh, parent, sort_order)?;

    let children: Vec<AnyEntity> = state
        .entities
        .children_of(source.key())
        .into_iter()
        .cloned()
        .collect();
    for child in children {
        copy_subtree(state, &child, &copy, child.sort_order())?;
    }
    Ok(copy)
}
