pub mod classes;
pub mod transition;
