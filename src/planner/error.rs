use thiserror::Error;

use crate::api::ApiError;
use crate::model::ModelError;
use crate::tree::DragRejection;

pub type PlannerResult<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("model error: {0}")]
    ModelError(#[from] ModelError),
    #[error("api error: {0}")]
    ApiError(#[from] ApiError),
    #[error("invalid placement: {0}")]
    PlacementError(#[from] DragRejection),
}

impl PlannerError {
    pub fn client_display(&self) -> String {
        match self {
            Self::ModelError(ModelError::ParentNotFound(_)) => {
                String::from("The parent container no longer exists. Reload and try again.")
            }
            Self::ModelError(ModelError::NotFound(_)) => {
                String::from("This item no longer exists. Reload and try again.")
            }
            Self::ModelError(e) => e.to_string(),
            Self::ApiError(e) => e.client_display(),
            Self::PlacementError(e) => e.to_string(),
        }
    }
}
