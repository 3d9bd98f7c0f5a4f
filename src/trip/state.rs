//! Trip planning state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Itinerary;

/// Maximum number of transitions kept in a state's history.
const MAX_TRANSITIONS: usize = 64;

/// Phase of the research -> plan workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for a query. Initial state and failure-recovery target.
    #[default]
    Input,
    /// Research call in flight.
    Researching,
    /// Planning call in flight.
    Planning,
    /// Itinerary available; stays here until reset.
    Done,
}

impl Phase {
    /// Check if this phase allows transitioning to another phase.
    pub fn can_transition_to(&self, target: Phase) -> bool {
        use Phase::*;

        matches!(
            (self, target),
            (Input, Researching)
                | (Researching, Planning)
                | (Planning, Done)
                // Failure recovery
                | (Researching, Input)
                | (Planning, Input)
                // Reset
                | (Done, Input)
        )
    }

    /// Check if a remote call is outstanding in this phase.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Researching | Self::Planning)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Input => "input",
            Self::Researching => "researching",
            Self::Planning => "planning",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// A phase transition event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Everything the rendering layer can see about the planner.
///
/// Invariant: `itinerary.is_some()` exactly when `phase == Phase::Done`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TripState {
    /// Trimmed query of the current or last completed run.
    pub query: Option<String>,
    pub phase: Phase,
    /// True while a run is in flight.
    pub loading: bool,
    pub itinerary: Option<Itinerary>,
    /// User-visible notice left by the last failed run.
    pub notice: Option<String>,
    /// Identifier of the current or last run, for log correlation.
    pub run_id: Option<Uuid>,
    pub transitions: Vec<PhaseTransition>,
}

impl TripState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run for `query`. Moves `Input -> Researching`.
    pub fn begin(&mut self, query: impl Into<String>, run_id: Uuid) -> Result<(), String> {
        self.transition_to(Phase::Researching, None)?;
        self.query = Some(query.into());
        self.run_id = Some(run_id);
        self.loading = true;
        self.notice = None;
        Ok(())
    }

    /// Research finished; the planning call is next.
    pub fn research_done(&mut self) -> Result<(), String> {
        self.transition_to(Phase::Planning, None)
    }

    /// Store the itinerary and finish the run.
    pub fn complete(&mut self, itinerary: Itinerary) -> Result<(), String> {
        self.transition_to(Phase::Done, None)?;
        self.itinerary = Some(itinerary);
        self.loading = false;
        Ok(())
    }

    /// Abandon the in-flight run and go back to `Input`.
    pub fn fail(&mut self, notice: impl Into<String>, reason: String) -> Result<(), String> {
        if !self.phase.is_in_flight() {
            return Err(format!("Cannot fail a run from {}", self.phase));
        }
        self.transition_to(Phase::Input, Some(reason))?;
        self.itinerary = None;
        self.loading = false;
        self.notice = Some(notice.into());
        Ok(())
    }

    /// Leave `Done`, clearing the itinerary and query.
    pub fn reset(&mut self) -> Result<(), String> {
        if self.phase != Phase::Done {
            return Err(format!("Cannot reset from {}", self.phase));
        }
        self.transition_to(Phase::Input, Some("reset".to_string()))?;
        self.itinerary = None;
        self.query = None;
        self.loading = false;
        Ok(())
    }

    /// Phases visited since the state was created, starting from `Input`.
    pub fn phase_path(&self) -> Vec<Phase> {
        let mut path = vec![self.transitions.first().map_or(self.phase, |t| t.from)];
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    fn transition_to(&mut self, new_phase: Phase, reason: Option<String>) -> Result<(), String> {
        if !self.phase.can_transition_to(new_phase) {
            return Err(format!(
                "Cannot transition from {} to {}",
                self.phase, new_phase
            ));
        }

        self.transitions.push(PhaseTransition {
            from: self.phase,
            to: new_phase,
            timestamp: Utc::now(),
            reason,
        });

        if self.transitions.len() > MAX_TRANSITIONS {
            let drain_count = self.transitions.len() - MAX_TRANSITIONS;
            self.transitions.drain(..drain_count);
        }

        self.phase = new_phase;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn itinerary() -> Itinerary {
        Itinerary::from_plan_json(r#"{"days":[{"day":1,"activities":["x"]}],"estimated_cost":"$1"}"#)
            .unwrap()
    }

    #[test]
    fn phase_transitions_valid() {
        assert!(Phase::Input.can_transition_to(Phase::Researching));
        assert!(Phase::Researching.can_transition_to(Phase::Planning));
        assert!(Phase::Planning.can_transition_to(Phase::Done));
        assert!(Phase::Researching.can_transition_to(Phase::Input));
        assert!(Phase::Planning.can_transition_to(Phase::Input));
        assert!(Phase::Done.can_transition_to(Phase::Input));
    }

    #[test]
    fn phase_transitions_invalid() {
        assert!(!Phase::Input.can_transition_to(Phase::Planning));
        assert!(!Phase::Input.can_transition_to(Phase::Done));
        assert!(!Phase::Researching.can_transition_to(Phase::Done));
        assert!(!Phase::Planning.can_transition_to(Phase::Researching));
        assert!(!Phase::Done.can_transition_to(Phase::Researching));
        assert!(!Phase::Input.can_transition_to(Phase::Input));
    }

    #[test]
    fn in_flight_phases() {
        assert!(Phase::Researching.is_in_flight());
        assert!(Phase::Planning.is_in_flight());
        assert!(!Phase::Input.is_in_flight());
        assert!(!Phase::Done.is_in_flight());
    }

    #[test]
    fn full_run_then_reset() {
        let mut state = TripState::new();
        assert_eq!(state.phase, Phase::Input);
        assert!(!state.loading);

        state.begin("Weekend trip to Kyoto", Uuid::new_v4()).unwrap();
        assert_eq!(state.phase, Phase::Researching);
        assert!(state.loading);

        state.research_done().unwrap();
        state.complete(itinerary()).unwrap();
        assert_eq!(state.phase, Phase::Done);
        assert!(!state.loading);
        assert!(state.itinerary.is_some());

        state.reset().unwrap();
        assert_eq!(state.phase, Phase::Input);
        assert!(state.itinerary.is_none());
        assert!(state.query.is_none());
        assert_eq!(
            state.phase_path(),
            vec![
                Phase::Input,
                Phase::Researching,
                Phase::Planning,
                Phase::Done,
                Phase::Input
            ]
        );
    }

    #[test]
    fn failure_returns_to_input_with_notice() {
        let mut state = TripState::new();
        state.begin("Lisbon", Uuid::new_v4()).unwrap();
        state.research_done().unwrap();
        state.fail("oops", "planning: 502".to_string()).unwrap();

        assert_eq!(state.phase, Phase::Input);
        assert!(!state.loading);
        assert!(state.itinerary.is_none());
        assert_eq!(state.notice.as_deref(), Some("oops"));
        assert_eq!(
            state.transitions.last().unwrap().reason.as_deref(),
            Some("planning: 502")
        );

        // Starting again clears the old notice.
        state.begin("Porto", Uuid::new_v4()).unwrap();
        assert!(state.notice.is_none());
    }

    #[test]
    fn out_of_order_calls_are_rejected() {
        let mut state = TripState::new();
        assert!(state.reset().is_err());
        assert!(state.research_done().is_err());
        assert!(state.complete(itinerary()).is_err());
        assert!(state.fail("x", "y".into()).is_err());
        assert!(state.transitions.is_empty());

        state.begin("a", Uuid::new_v4()).unwrap();
        assert!(state.begin("b", Uuid::new_v4()).is_err());
        assert_eq!(state.query.as_deref(), Some("a"));
    }

    #[test]
    fn transition_history_capped() {
        let mut state = TripState::new();
        for _ in 0..100 {
            state.begin("q", Uuid::new_v4()).unwrap();
            state.fail("x", "y".into()).unwrap();
        }
        assert_eq!(state.transitions.len(), MAX_TRANSITIONS);
    }

    #[test]
    fn phase_display_and_serde() {
        assert_eq!(Phase::Researching.to_string(), "researching");
        let json = serde_json::to_string(&Phase::Done).unwrap();
        assert_eq!(json, "\"done\"");
        let parsed: Phase = serde_json::from_str("\"planning\"").unwrap();
        assert_eq!(parsed, Phase::Planning);
    }
}
