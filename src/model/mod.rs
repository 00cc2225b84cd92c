mod kind;
pub use kind::{CurriculumEntity, EntityKind, NodeKey, ResourceTyped};

pub mod entity;

mod error;
pub use error::{ModelError, ModelResult};

mod curriculum;
pub use curriculum::Curriculum;
