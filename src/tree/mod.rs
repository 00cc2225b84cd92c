mod builder;
pub use builder::{TreeNode, TreeOptions, build_tree};

pub mod drag;
pub use drag::{
    DragGesture, DragPolicy, DragRejection, DropPosition, DropRequest, MoveKind, MovePlan, Point,
    SiblingHint, can_contain, classify,
};

pub mod sort_order;
pub use sort_order::{SiblingPosition, next_course_order, next_sort_order, positional_sort_order};
