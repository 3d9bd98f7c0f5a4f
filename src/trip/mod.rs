//! Trip planning — itinerary model, phase state machine and the planner.

pub mod model;
pub mod planner;
pub mod state;

pub use model::{DayPlan, Itinerary};
pub use planner::{FAILURE_NOTICE, IgnoreReason, SubmitOutcome, TripEvent, TripPlanner};
pub use state::{Phase, PhaseTransition, TripState};
