//! Academic-year transition: resolves the current year, evaluates students,
//! places them in next-year classes and reports the outcome.

pub mod academic_year;
pub mod approval;
pub mod controller;
pub mod error;
pub mod model;
pub mod placement;
pub mod router;
pub mod service;

pub use academic_year::{current_academic_year, current_academic_year_now};
pub use model::*;
pub use router::init_transition_router;
pub use service::TransitionService;
