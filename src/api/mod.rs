//! Seam to the REST backend, the system of record for the curriculum.

use async_trait::async_trait;

use crate::model::NodeKey;
use crate::model::entity::{AnyEntity, Course, CourseSnapshot, EntityDraft};

mod client;
pub use client::HttpApi;

pub mod dto;
pub use dto::{CopyRequest, MoveRequest, RelativeTo, SpecialDay};

mod error;
pub use error::{ApiError, ApiResult};

mod memory;
pub use memory::InMemoryApi;

#[async_trait]
pub trait CurriculumApi: Send + Sync {
    async fn list_courses(&self) -> ApiResult<Vec<Course>>;

    async fn load_course(&self, course_id: i64) -> ApiResult<CourseSnapshot>;

    async fn create(&self, draft: &EntityDraft) -> ApiResult<AnyEntity>;
    async fn update(&self, entity: &AnyEntity) -> ApiResult<AnyEntity>;
    async fn delete(&self, key: NodeKey) -> ApiResult<()>;

    /// Persists a move; the returned entity carries the authoritative sort order.
    async fn move_entity(&self, request: &MoveRequest) -> ApiResult<AnyEntity>;
    async fn copy_entity(&self, request: &CopyRequest) -> ApiResult<AnyEntity>;

    async fn special_days(&self, course_id: i64) -> ApiResult<Vec<SpecialDay>>;
    async fn save_special_day(&self, day: &SpecialDay) -> ApiResult<SpecialDay>;
}
