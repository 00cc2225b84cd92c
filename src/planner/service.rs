use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{CopyRequest, CurriculumApi, MoveRequest, SpecialDay};
use crate::config::PlannerConfig;
use crate::error::log_error;
use crate::model::entity::{AnyEntity, Course, EntityDraft};
use crate::model::{Curriculum, ModelError, NodeKey};
use crate::planner::{Notifier, PlannerError, PlannerResult, Toast};
use crate::tree::{
    DragRejection, DropRequest, MoveKind, MovePlan, TreeNode, TreeOptions, build_tree,
    can_contain, classify, next_course_order, next_sort_order, sort_order,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The backend accepted the move; `entity` is its confirmed copy.
    Moved { plan: MovePlan, entity: AnyEntity },
    /// Nothing was sent.
    Rejected(DragRejection),
}

/// Owns the display cache and routes every change through the backend.
pub struct PlannerService<A> {
    api: A,
    cache: Curriculum,
    notifier: Arc<dyn Notifier>,
    config: PlannerConfig,
}

impl<A: CurriculumApi> PlannerService<A> {
    pub fn new(api: A, config: PlannerConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            cache: Curriculum::new(),
            notifier,
            config,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &Curriculum {
        &self.cache
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn fail(&self, error: impl Into<PlannerError>) -> PlannerError {
        let error = error.into();
        log_error(&error);
        self.notifier.notify(Toast::error(error.client_display()));
        error
    }

    fn toast(&self, message: String) {
        self.notifier.notify(Toast::success(message));
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_courses(&mut self) -> PlannerResult<Vec<Course>> {
        let courses = self.api.list_courses().await.map_err(|e| self.fail(e))?;
        self.cache.replace_courses(courses.clone());
        Ok(courses)
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_course(&mut self, course_id: i64) -> PlannerResult<()> {
        let snapshot = self
            .api
            .load_course(course_id)
            .await
            .map_err(|e| self.fail(e))?;
        self.cache.replace_course(course_id, snapshot);
        debug!("course {} loaded, {} entities cached", course_id, self.cache.len());
        Ok(())
    }

    /// Display tree, honouring the configured archived filter.
    pub fn tree(&self, course: Option<i64>) -> Vec<TreeNode> {
        self.tree_with(&TreeOptions {
            show_archived: self.config.show_archived(),
            course,
        })
    }

    pub fn tree_with(&self, options: &TreeOptions) -> Vec<TreeNode> {
        build_tree(&self.cache, options)
    }

    pub fn next_sort_order(&self, container: NodeKey) -> PlannerResult<i32> {
        Ok(next_sort_order(&self.cache, container)?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&mut self, mut draft: EntityDraft) -> PlannerResult<AnyEntity> {
        let order = match draft.container() {
            Some(container) => next_sort_order(&self.cache, container),
            None => next_course_order(&self.cache),
        }
        .map_err(|e| self.fail(e))?;
        if draft.sort_order().is_none() {
            draft.set_sort_order(order);
        }

        let created = self.api.create(&draft).await.map_err(|e| self.fail(e))?;
        self.cache.upsert(created.clone());
        self.toast(format!("Created {} \"{}\"", created.kind(), created.title()));
        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(key = %entity.key()))]
    pub async fn update(&mut self, entity: AnyEntity) -> PlannerResult<AnyEntity> {
        let key = entity.key();
        if !self.cache.contains(key) {
            return Err(self.fail(ModelError::NotFound(key)));
        }
        if let Some(parent) = entity.parent() {
            if !self.cache.contains(parent) {
                tracing::warn!("parent container {} of {} is not loaded", parent, key);
                return Err(self.fail(ModelError::ParentNotFound(parent)));
            }
        }

        let updated = self.api.update(&entity).await.map_err(|e| self.fail(e))?;
        self.cache.upsert(updated.clone());
        self.toast(format!("Saved \"{}\"", updated.title()));
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&mut self, key: NodeKey) -> PlannerResult<()> {
        if !self.cache.contains(key) {
            return Err(self.fail(ModelError::NotFound(key)));
        }

        self.api.delete(key).await.map_err(|e| self.fail(e))?;
        let removed = self.cache.remove(key);
        self.toast(format!("Deleted {} ({} items)", key, removed.len()));
        Ok(())
    }

    /// Cache as it would look after `request`, without contacting the backend.
    pub fn preview_drop(&self, request: &DropRequest) -> Result<Curriculum, DragRejection> {
        let plan = classify(&self.cache, &self.config.drag_policy(), request)?;
        let mut preview = self.cache.clone();

        let source = preview
            .get(plan.source)
            .cloned()
            .ok_or(DragRejection::UnknownNode(plan.source))?;
        let parent = preview
            .get(plan.target_parent)
            .cloned()
            .ok_or(DragRejection::UnknownNode(plan.target_parent))?;
        let moved = source
            .moved_to(&parent, plan.sort_order)
            .ok_or(DragRejection::IllegalNesting {
                parent: parent.kind(),
                child: source.kind(),
            })?;
        preview.upsert(moved);

        if plan.kind == MoveKind::Sort {
            let siblings: Vec<NodeKey> = self
                .cache
                .children_of(plan.target_parent)
                .into_iter()
                .map(AnyEntity::key)
                .collect();
            let anchor = plan.anchor.map(|a| (a.sibling, a.position));
            for (key, order) in sort_order::resequence(&siblings, plan.source, anchor) {
                if let Some(entity) = preview.get(key).cloned() {
                    preview.upsert(entity.with_sort_order(order));
                }
            }
        }
        Ok(preview)
    }

    /// Invalid drops are rejected without a request. Accepted ones are sent to
    /// the backend and the confirmed entity replaces the cached copy.
    #[tracing::instrument(skip(self))]
    pub async fn drop_node(&mut self, request: DropRequest) -> PlannerResult<DropOutcome> {
        let plan = match classify(&self.cache, &self.config.drag_policy(), &request) {
            Ok(plan) => plan,
            Err(rejection) => {
                debug!("drop rejected: {}", rejection);
                return Ok(DropOutcome::Rejected(rejection));
            }
        };

        let previous_course = self.cache.get(plan.source).map(AnyEntity::course_id);
        let move_request = MoveRequest::from(&plan);
        let confirmed = self
            .api
            .move_entity(&move_request)
            .await
            .map_err(|e| self.fail(e))?;
        info!(
            "{:?} {} -> {} at {}",
            plan.kind,
            plan.source,
            plan.target_parent,
            confirmed.sort_order()
        );
        self.cache.upsert(confirmed.clone());

        if self.config.reload_after_move() {
            let target_course = confirmed.course_id();
            self.load_course(target_course).await?;
            if let Some(course_id) = previous_course.filter(|id| *id != target_course) {
                self.load_course(course_id).await?;
            }
        }

        self.toast(format!("Moved \"{}\"", confirmed.title()));
        Ok(DropOutcome::Moved {
            plan,
            entity: confirmed,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn copy_node(&mut self, source: NodeKey, target_parent: NodeKey) -> PlannerResult<AnyEntity> {
        if !self.cache.contains(source) {
            return Err(self.fail(ModelError::NotFound(source)));
        }
        if !can_contain(target_parent.kind, source.kind) {
            return Err(self.fail(ModelError::IllegalNesting {
                parent: target_parent.kind,
                child: source.kind,
            }));
        }
        let order = next_sort_order(&self.cache, target_parent).map_err(|e| self.fail(e))?;

        let request = CopyRequest::new(source, target_parent, order);
        let copy = self
            .api
            .copy_entity(&request)
            .await
            .map_err(|e| self.fail(e))?;
        self.cache.upsert(copy.clone());

        // the response carries the root only
        if source.kind.is_container() {
            self.load_course(copy.course_id()).await?;
        }

        self.toast(format!("Copied \"{}\"", copy.title()));
        Ok(copy)
    }

    pub async fn special_days(&self, course_id: i64) -> PlannerResult<Vec<SpecialDay>> {
        self.api
            .special_days(course_id)
            .await
            .map_err(|e| self.fail(e))
    }

    pub async fn save_special_day(&self, day: SpecialDay) -> PlannerResult<SpecialDay> {
        if !self.cache.contains(NodeKey::course(day.course_id)) {
            return Err(self.fail(ModelError::ParentNotFound(NodeKey::course(day.course_id))));
        }
        let saved = self
            .api
            .save_special_day(&day)
            .await
            .map_err(|e| self.fail(e))?;
        self.toast(format!("Saved schedule override for {}", saved.date));
        Ok(saved)
    }
}
