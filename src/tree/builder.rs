use serde::Serialize;
use termtree::Tree;

use crate::model::entity::{AnyEntity, Visibility};
use crate::model::{Curriculum, NodeKey};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub key: NodeKey,
    pub title: String,
    pub sort_order: i32,
    pub visibility: Visibility,
    pub archived: bool,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub show_archived: bool,
    pub course: Option<i64>,
}

impl TreeNode {
    fn from_entity(entity: &AnyEntity) -> Self {
        Self {
            key: entity.key(),
            title: entity.title().to_string(),
            sort_order: entity.sort_order(),
            visibility: entity.visibility(),
            archived: entity.archived(),
            children: Vec::new(),
        }
    }

    pub fn to_termtree(&self) -> Tree<String> {
        let mut label = format!("{} [{}] {}", self.key, self.sort_order, self.title);
        if self.archived {
            label.push_str(" (archived)");
        }
        let leaves: Vec<_> = self.children.iter().map(TreeNode::to_termtree).collect();
        Tree::new(label).with_leaves(leaves)
    }
}

/// Siblings are ordered by `sort_order`; ties fall back to kind and id so the
/// output is stable. Under a topic, subtopics and direct lessons share one
/// sequence.
pub fn build_tree(cache: &Curriculum, options: &TreeOptions) -> Vec<TreeNode> {
    cache
        .courses()
        .into_iter()
        .map(|c| AnyEntity::Course(c.clone()))
        .filter(|e| options.course.is_none_or(|id| id == e.id()))
        .filter(|e| options.show_archived || !e.archived())
        .map(|e| build_node(cache, &e, options))
        .collect()
}

fn build_node(cache: &Curriculum, entity: &AnyEntity, options: &TreeOptions) -> TreeNode {
    let mut node = TreeNode::from_entity(entity);
    node.children = cache
        .children_of(entity.key())
        .into_iter()
        .filter(|child| options.show_archived || !child.archived())
        .map(|child| build_node(cache, child, options))
        .collect();
    node
}
