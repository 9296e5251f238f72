//! # Scholaris Models
//!
//! Domain models and DTOs for the Scholaris API.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity IDs
//! - [`classes`]: Classes, grade levels, periods and class listing DTOs
//! - [`courses`]: Courses
//! - [`students`]: Students and student status
//! - [`grades`]: Trimester grades
//! - [`records`]: Internship and final-work records
//! - [`transition`]: Academic-year transition requests and results

pub mod classes;
pub mod courses;
pub mod grades;
pub mod ids;
pub mod records;
pub mod students;
pub mod transition;

pub use classes::{
    Class, ClassFilter, ClassFilterParams, ClassPeriod, ClassWithStats, GradeLevel, NewClass,
    PaginatedClassesResponse,
};
pub use courses::Course;
pub use grades::Grade;
pub use records::{FinalWork, Internship, RecordStatus};
pub use students::{Student, StudentStatus, StudentUpdate};
pub use transition::{
    AcademicYearQuery, CurrentAcademicYearResponse, PreviewRow, TransitionRequest,
    TransitionResult,
};
