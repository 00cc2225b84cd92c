//! Drag classification and validation.
//!
//! A drop raised by the tree widget is turned into a [`MovePlan`] or rejected
//! before anything is sent to the backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Curriculum, EntityKind, ModelError, NodeKey};
use crate::tree::sort_order::{self, SiblingPosition, next_sort_order, positional_sort_order};

pub const DEFAULT_MIN_DRAG_DISTANCE_PX: f64 = 5.0;

const NESTING: [(EntityKind, EntityKind); 4] = [
    (EntityKind::Course, EntityKind::Topic),
    (EntityKind::Topic, EntityKind::SubTopic),
    (EntityKind::Topic, EntityKind::Lesson),
    (EntityKind::SubTopic, EntityKind::Lesson),
];

pub fn can_contain(parent: EntityKind, child: EntityKind) -> bool {
    NESTING.contains(&(parent, child))
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pointer travel of a drag, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragGesture {
    pub start: Point,
    pub end: Point,
}

impl DragGesture {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn distance(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPolicy {
    pub min_distance_px: f64,
}

impl Default for DragPolicy {
    fn default() -> Self {
        Self {
            min_distance_px: DEFAULT_MIN_DRAG_DISTANCE_PX,
        }
    }
}

impl DragPolicy {
    pub fn new(min_distance_px: f64) -> Self {
        Self { min_distance_px }
    }

    pub fn accepts(&self, gesture: &DragGesture) -> bool {
        gesture.distance() >= self.min_distance_px
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropPosition {
    Before,
    After,
    Inside,
}

impl DropPosition {
    pub fn sibling(&self) -> Option<SiblingPosition> {
        match self {
            Self::Before => Some(SiblingPosition::Before),
            Self::After => Some(SiblingPosition::After),
            Self::Inside => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropRequest {
    pub source: NodeKey,
    pub target: NodeKey,
    pub position: DropPosition,
    /// `None` for moves that did not come from a pointer, e.g. the CLI.
    pub gesture: Option<DragGesture>,
}

impl DropRequest {
    pub fn new(source: NodeKey, target: NodeKey, position: DropPosition) -> Self {
        Self {
            source,
            target,
            position,
            gesture: None,
        }
    }

    pub fn with_gesture(mut self, gesture: DragGesture) -> Self {
        self.gesture = Some(gesture);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveKind {
    Sort,
    /// Moving to a different parent, appended at the end.
    Regroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingHint {
    pub sibling: NodeKey,
    pub position: SiblingPosition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlan {
    pub source: NodeKey,
    pub kind: MoveKind,
    pub from_parent: NodeKey,
    pub target_parent: NodeKey,
    pub anchor: Option<SiblingHint>,
    pub sort_order: i32,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DragRejection {
    #[error("pointer moved {distance:.1}px, below the {min:.1}px threshold")]
    TooShort { distance: f64, min: f64 },
    #[error("node {0} is not loaded")]
    UnknownNode(NodeKey),
    #[error("node {0} was dropped onto itself")]
    OntoSelf(NodeKey),
    #[error("course {0} cannot be dragged")]
    RootNotDraggable(NodeKey),
    #[error("a {parent} cannot contain a {child}")]
    IllegalNesting { parent: EntityKind, child: EntityKind },
    #[error("node {0} has no parent")]
    NoParent(NodeKey),
    #[error("no sort order left after {0}")]
    SortOrderOverflow(NodeKey),
    #[error("drop leaves {0} where it is")]
    Unchanged(NodeKey),
}

impl From<ModelError> for DragRejection {
    fn from(value: ModelError) -> Self {
        match value {
            ModelError::ParentNotFound(key) | ModelError::NotFound(key) => Self::UnknownNode(key),
            ModelError::NotAContainer(key) => Self::IllegalNesting {
                parent: key.kind,
                child: key.kind,
            },
            ModelError::IllegalNesting { parent, child } => Self::IllegalNesting { parent, child },
            ModelError::SortOrderOverflow(key) => Self::SortOrderOverflow(key),
        }
    }
}

/// Validates a drop and classifies it as SORT or REGROUP.
///
/// `Inside` makes the target the new parent; `Before`/`After` make the
/// target's parent the new parent and the target the sibling anchor. A
/// REGROUP always appends, so any anchor is dropped for it.
pub fn classify(
    cache: &Curriculum,
    policy: &DragPolicy,
    request: &DropRequest,
) -> Result<MovePlan, DragRejection> {
    if let Some(gesture) = &request.gesture {
        if !policy.accepts(gesture) {
            return Err(DragRejection::TooShort {
                distance: gesture.distance(),
                min: policy.min_distance_px,
            });
        }
    }

    let source = request.source;
    let target = request.target;
    for key in [source, target] {
        if !cache.contains(key) {
            return Err(DragRejection::UnknownNode(key));
        }
    }
    if source == target {
        return Err(DragRejection::OntoSelf(source));
    }
    if source.kind == EntityKind::Course {
        return Err(DragRejection::RootNotDraggable(source));
    }

    let (target_parent, anchor) = match request.position.sibling() {
        None => (target, None),
        Some(position) => {
            let parent = cache
                .parent_of(target)
                .ok_or(DragRejection::NoParent(target))?;
            (
                parent,
                Some(SiblingHint {
                    sibling: target,
                    position,
                }),
            )
        }
    };

    if !can_contain(target_parent.kind, source.kind) {
        return Err(DragRejection::IllegalNesting {
            parent: target_parent.kind,
            child: source.kind,
        });
    }

    let from_parent = cache
        .parent_of(source)
        .ok_or(DragRejection::NoParent(source))?;

    if from_parent != target_parent {
        return Ok(MovePlan {
            source,
            kind: MoveKind::Regroup,
            from_parent,
            target_parent,
            anchor: None,
            sort_order: next_sort_order(cache, target_parent)?,
        });
    }

    let current: Vec<NodeKey> = cache
        .children_of(target_parent)
        .into_iter()
        .map(|e| e.key())
        .collect();
    let predicted: Vec<NodeKey> = sort_order::resequence(
        &current,
        source,
        anchor.map(|a| (a.sibling, a.position)),
    )
    .into_iter()
    .map(|(key, _)| key)
    .collect();
    if predicted == current {
        return Err(DragRejection::Unchanged(source));
    }

    let sort_order = match anchor {
        Some(hint) => positional_sort_order(cache, hint.sibling, hint.position)?,
        None => next_sort_order(cache, target_parent)?,
    };

    Ok(MovePlan {
        source,
        kind: MoveKind::Sort,
        from_parent,
        target_parent,
        anchor,
        sort_order,
    })
}
