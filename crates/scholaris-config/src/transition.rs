//! Academic-year transition configuration.
//!
//! # Environment Variables
//!
//! - `TRANSITION_PASSING_GRADE`: minimum average final mark to be approved (default: 10.0)
//! - `TRANSITION_DEFAULT_MAX_STUDENTS`: capacity used when a class has none set and for
//!   classes opened during a transition (default: 40)
//! - `TRANSITION_DEFAULT_PERIOD`: period of classes opened during a transition
//!   (`morning` or `afternoon`, default: `morning`)

use std::env;

use scholaris_models::ClassPeriod;

use crate::parse_var;

pub const DEFAULT_PASSING_GRADE: f64 = 10.0;
pub const DEFAULT_MAX_STUDENTS: i32 = 40;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionConfig {
    /// Inclusive lower bound of the average that counts as approved
    pub passing_grade: f64,
    pub default_max_students: i32,
    pub default_period: ClassPeriod,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            passing_grade: DEFAULT_PASSING_GRADE,
            default_max_students: DEFAULT_MAX_STUDENTS,
            default_period: ClassPeriod::Morning,
        }
    }
}

impl TransitionConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            passing_grade: parse_var(&lookup, "TRANSITION_PASSING_GRADE")
                .filter(|g: &f64| g.is_finite() && *g >= 0.0)
                .unwrap_or(DEFAULT_PASSING_GRADE),
            default_max_students: parse_var(&lookup, "TRANSITION_DEFAULT_MAX_STUDENTS")
                .filter(|n: &i32| *n > 0)
                .unwrap_or(DEFAULT_MAX_STUDENTS),
            default_period: parse_var(&lookup, "TRANSITION_DEFAULT_PERIOD")
                .unwrap_or(ClassPeriod::Morning),
        }
    }
}
