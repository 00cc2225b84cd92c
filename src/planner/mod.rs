mod error;
pub use error::{PlannerError, PlannerResult};

pub mod notify;
pub use notify::{LogNotifier, Notifier, Toast, ToastLevel, ToastQueue};

mod service;
pub use service::{DropOutcome, PlannerService};
