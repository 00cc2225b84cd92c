//! Sort-order allocation.
//!
//! Sort orders are scoped to a parent container and only meaningful relative
//! to the siblings in that container.

use serde::{Deserialize, Serialize};

use crate::model::{Curriculum, CurriculumEntity, ModelError, ModelResult, NodeKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SiblingPosition {
    Before,
    After,
}

/// Append mode: one past the largest order in `container`, 0 when it is empty.
pub fn next_sort_order(cache: &Curriculum, container: NodeKey) -> ModelResult<i32> {
    if !container.kind.is_container() {
        return Err(ModelError::NotAContainer(container));
    }
    if !cache.contains(container) {
        tracing::warn!("parent container {} is not loaded", container);
        return Err(ModelError::ParentNotFound(container));
    }

    append_after(
        cache
            .children_of(container)
            .into_iter()
            .map(|e| (e.key(), e.sort_order())),
    )
}

pub fn next_course_order(cache: &Curriculum) -> ModelResult<i32> {
    append_after(cache.courses().into_iter().map(|c| (c.key(), c.sort_order())))
}

fn append_after<I: Iterator<Item = (NodeKey, i32)>>(siblings: I) -> ModelResult<i32> {
    match siblings.max_by_key(|(_, order)| *order) {
        None => Ok(0),
        Some((last, order)) => order
            .checked_add(1)
            .ok_or(ModelError::SortOrderOverflow(last)),
    }
}

/// Positional mode: `After` lands right behind `sibling`, `Before` takes its slot.
pub fn positional_sort_order(
    cache: &Curriculum,
    sibling: NodeKey,
    position: SiblingPosition,
) -> ModelResult<i32> {
    let order = cache
        .get(sibling)
        .ok_or(ModelError::NotFound(sibling))?
        .sort_order();
    match position {
        SiblingPosition::Before => Ok(order),
        SiblingPosition::After => order
            .checked_add(1)
            .ok_or(ModelError::SortOrderOverflow(sibling)),
    }
}

/// Predicts the sibling sequence after `moved` is placed relative to `anchor`.
///
/// `siblings` is the current display order of the target container and may or
/// may not contain `moved`. Without an anchor `moved` goes last. Orders in the
/// result are dense, starting at 0.
pub fn resequence(
    siblings: &[NodeKey],
    moved: NodeKey,
    anchor: Option<(NodeKey, SiblingPosition)>,
) -> Vec<(NodeKey, i32)> {
    let mut sequence: Vec<NodeKey> = siblings.iter().copied().filter(|k| *k != moved).collect();

    let index = anchor
        .and_then(|(sibling, position)| {
            sequence
                .iter()
                .position(|k| *k == sibling)
                .map(|idx| match position {
                    SiblingPosition::Before => idx,
                    SiblingPosition::After => idx + 1,
                })
        })
        .unwrap_or(sequence.len());
    sequence.insert(index, moved);

    sequence
        .into_iter()
        .zip(0..)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::entity::{Course, Lesson, SubTopic, Topic};

    fn sample() -> Curriculum {
        Curriculum::from_entities([
            Course::new(1, "Maths", 0).into(),
            Course::new(2, "Physics", 4).into(),
            Topic::new(10, 1, "Algebra", 0).into(),
            Topic::new(11, 1, "Geometry", 7).into(),
            SubTopic::new(20, 1, 10, "Linear", 2).into(),
            Lesson::new(30, 1, 10, None, "Variables", 5).into(),
        ])
    }

    #[test]
    fn append_is_max_plus_one() {
        let cache = sample();
        assert_eq!(next_sort_order(&cache, NodeKey::course(1)), Ok(8));
        // subtopics and direct lessons share the topic's sequence
        assert_eq!(next_sort_order(&cache, NodeKey::topic(10)), Ok(6));
        assert_eq!(next_course_order(&cache), Ok(5));
    }

    #[test]
    fn empty_container_starts_at_zero() {
        let cache = sample();
        assert_eq!(next_sort_order(&cache, NodeKey::sub_topic(20)), Ok(0));
        assert_eq!(next_sort_order(&cache, NodeKey::topic(11)), Ok(0));
        assert_eq!(next_course_order(&Curriculum::new()), Ok(0));
    }

    #[test]
    fn missing_parent_is_rejected() {
        let cache = sample();
        assert_eq!(
            next_sort_order(&cache, NodeKey::topic(99)),
            Err(ModelError::ParentNotFound(NodeKey::topic(99)))
        );
        assert_eq!(
            next_sort_order(&cache, NodeKey::lesson(30)),
            Err(ModelError::NotAContainer(NodeKey::lesson(30)))
        );
    }

    #[test]
    fn largest_order_has_no_successor() {
        let cache = Curriculum::from_entities([
            Course::new(1, "Maths", i32::MAX).into(),
            Topic::new(10, 1, "Algebra", 3).into(),
            Topic::new(11, 1, "Geometry", i32::MAX).into(),
        ]);

        assert_eq!(
            next_sort_order(&cache, NodeKey::course(1)),
            Err(ModelError::SortOrderOverflow(NodeKey::topic(11)))
        );
        assert_eq!(
            next_course_order(&cache),
            Err(ModelError::SortOrderOverflow(NodeKey::course(1)))
        );
        assert_eq!(
            positional_sort_order(&cache, NodeKey::topic(11), SiblingPosition::After),
            Err(ModelError::SortOrderOverflow(NodeKey::topic(11)))
        );
        assert_eq!(
            positional_sort_order(&cache, NodeKey::topic(11), SiblingPosition::Before),
            Ok(i32::MAX)
        );
    }

    #[test]
    fn positional_mode_is_relative_to_sibling() {
        let cache = sample();
        assert_eq!(
            positional_sort_order(&cache, NodeKey::sub_topic(20), SiblingPosition::After),
            Ok(3)
        );
        assert_eq!(
            positional_sort_order(&cache, NodeKey::sub_topic(20), SiblingPosition::Before),
            Ok(2)
        );
        assert!(positional_sort_order(&cache, NodeKey::lesson(99), SiblingPosition::After).is_err());
    }

    #[test]
    fn resequence_places_relative_to_anchor() {
        let a = NodeKey::lesson(1);
        let b = NodeKey::lesson(2);
        let c = NodeKey::lesson(3);
        let siblings = [a, b, c];

        let after_a = resequence(&siblings, c, Some((a, SiblingPosition::After)));
        assert_eq!(after_a, vec![(a, 0), (c, 1), (b, 2)]);

        let before_a = resequence(&siblings, c, Some((a, SiblingPosition::Before)));
        assert_eq!(before_a, vec![(c, 0), (a, 1), (b, 2)]);

        let appended = resequence(&siblings, a, None);
        assert_eq!(appended, vec![(b, 0), (c, 1), (a, 2)]);
    }

    #[test]
    fn resequence_with_unknown_anchor_appends() {
        let a = NodeKey::lesson(1);
        let d = NodeKey::lesson(4);
        let result = resequence(&[a], d, Some((NodeKey::lesson(9), SiblingPosition::Before)));
        assert_eq!(result, vec![(a, 0), (d, 1)]);
    }
}
