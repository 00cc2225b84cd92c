use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{EntityKind, NodeKey};
use crate::tree::{MoveKind, MovePlan, SiblingPosition};

/// Body of `POST /{resource}/{id}/move`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub entity_id: i64,
    pub entity_type: EntityKind,
    pub target_parent_id: i64,
    pub target_parent_type: EntityKind,
    pub move_kind: MoveKind,
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<RelativeTo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeTo {
    pub sibling_id: i64,
    pub sibling_type: EntityKind,
    pub position: SiblingPosition,
}

impl MoveRequest {
    pub fn source(&self) -> NodeKey {
        NodeKey::new(self.entity_type, self.entity_id)
    }

    pub fn target_parent(&self) -> NodeKey {
        NodeKey::new(self.target_parent_type, self.target_parent_id)
    }
}

impl From<&MovePlan> for MoveRequest {
    fn from(plan: &MovePlan) -> Self {
        Self {
            entity_id: plan.source.id,
            entity_type: plan.source.kind,
            target_parent_id: plan.target_parent.id,
            target_parent_type: plan.target_parent.kind,
            move_kind: plan.kind,
            sort_order: plan.sort_order,
            relative_to: plan.anchor.map(|hint| RelativeTo {
                sibling_id: hint.sibling.id,
                sibling_type: hint.sibling.kind,
                position: hint.position,
            }),
        }
    }
}

/// Body of `POST /{resource}/{id}/copy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyRequest {
    pub entity_id: i64,
    pub entity_type: EntityKind,
    pub target_parent_id: i64,
    pub target_parent_type: EntityKind,
    pub sort_order: i32,
}

impl CopyRequest {
    pub fn new(source: NodeKey, target_parent: NodeKey, sort_order: i32) -> Self {
        Self {
            entity_id: source.id,
            entity_type: source.kind,
            target_parent_id: target_parent.id,
            target_parent_type: target_parent.kind,
            sort_order,
        }
    }

    pub fn source(&self) -> NodeKey {
        NodeKey::new(self.entity_type, self.entity_id)
    }

    pub fn target_parent(&self) -> NodeKey {
        NodeKey::new(self.target_parent_type, self.target_parent_id)
    }
}

/// A schedule override for one calendar day of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialDay {
    #[serde(default)]
    pub id: Option<i64>,
    pub course_id: i64,
    pub date: NaiveDate,
    pub label: String,
    /// No lessons are scheduled on this day.
    #[serde(default)]
    pub cancels_lessons: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}
