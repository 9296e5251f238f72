pub use scholaris_models::transition::{
    AcademicYearQuery, CurrentAcademicYearResponse, PreviewRow, TransitionRequest,
    TransitionResult,
};

pub use super::error::TransitionError;
pub use super::service::StudentOutcome;
