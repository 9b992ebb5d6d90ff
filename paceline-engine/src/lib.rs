//! Paceline Pace Engine
//!
//! Platform-agnostic pace simulation for multi-day endurance rides.
//! A [`Course`] of [`Segment`]s and [`Split`]s is folded into a
//! [`CourseDetail`] with per-split timing, sub-split breakdowns and
//! rest-stop hours resolved by arrival weekday. This crate performs no I/O.

pub mod calculator;
pub mod constants;
pub mod course;
pub mod cue_sheet;
pub mod detail;
pub mod error;
pub mod numbers;
pub mod rest_stop;
pub mod serde_hours;
pub mod simulation;
pub mod sub_split;

// Re-export commonly used types
pub use calculator::{EvenDownTimeCalculator, SubSplitCalculator, SubSplitContext};
pub use constants::CLOSED_HOURS;
pub use course::{Course, Segment, Split};
pub use cue_sheet::{CueKind, CueLine, RestStopLine, legend_entries};
pub use detail::{CourseDetail, CourseSummary, SegmentDetail, SplitDetail, SubSplitDetail};
pub use error::PlanError;
pub use rest_stop::{OpenHours, RestStop, open_hours_for};
pub use simulation::{
    SegmentSettings, SimulationCarry, compute_course_details, compute_course_details_with,
    resolve,
};
pub use sub_split::{SubSplitMode, sub_splits_for};

/// Trait for abstracting course loading.
/// Platform-specific implementations should provide this
pub trait CourseLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the course registered under `name`
    ///
    /// # Errors
    ///
    /// Returns an error if the course cannot be found or parsed.
    fn load_course(&self, name: &str) -> Result<Course, Self::Error>;
}

/// Planning facade binding a course source to a sub-split calculator
pub struct PlanningEngine<L, C = EvenDownTimeCalculator>
where
    L: CourseLoader,
    C: SubSplitCalculator,
{
    loader: L,
    calculator: C,
}

impl<L> PlanningEngine<L>
where
    L: CourseLoader,
{
    /// Create an engine using the even down-time calculator
    pub const fn new(loader: L) -> Self {
        Self {
            loader,
            calculator: EvenDownTimeCalculator,
        }
    }
}

impl<L, C> PlanningEngine<L, C>
where
    L: CourseLoader,
    C: SubSplitCalculator,
{
    /// Create an engine with a custom sub-split calculator
    pub const fn with_calculator(loader: L, calculator: C) -> Self {
        Self { loader, calculator }
    }

    /// Load a course without simulating it
    ///
    /// # Errors
    ///
    /// Returns an error if the loader fails.
    pub fn load(&self, name: &str) -> Result<Course, L::Error> {
        self.loader.load_course(name)
    }

    /// Simulate an already-loaded course
    ///
    /// # Errors
    ///
    /// Returns an error if the course is invalid or the simulation fails.
    pub fn plan_course(&self, course: &Course) -> Result<CourseDetail, PlanError> {
        compute_course_details_with(course, &self.calculator)
    }

    /// Load and simulate the named course
    ///
    /// # Errors
    ///
    /// Returns an error if loading, validation or simulation fails.
    pub fn plan(&self, name: &str) -> Result<CourseDetail, anyhow::Error> {
        let course = self.loader.load_course(name)?;
        let details = self.plan_course(&course)?;
        Ok(details)
    }
}
