//! Trip planner — single-flight research -> plan orchestration.
//!
//! One `submit` runs the two remote calls strictly in sequence. The loading
//! flag in [`TripState`] is the only mutual exclusion: a submit that arrives
//! while a run is in flight (or while an itinerary is waiting to be reset) is
//! dropped, never queued.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::model::Itinerary;
use super::state::{Phase, TripState};
use crate::backend::TripBackend;
use crate::error::TripError;

/// The one message users see for any failed run.
pub const FAILURE_NOTICE: &str =
    "Something went wrong while planning your trip. Please try again.";

const EVENT_CAPACITY: usize = 64;

/// State changes pushed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TripEvent {
    /// The planner moved between phases.
    PhaseChanged { from: Phase, to: Phase },
    /// A run finished with an itinerary.
    Completed { itinerary: Itinerary },
    /// A run failed; only the generic notice is exposed.
    Failed { notice: String },
    /// The itinerary was cleared.
    Reset,
}

/// Why a submit did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Query was empty after trimming.
    EmptyQuery,
    /// Another run is still in flight.
    InFlight,
    /// An itinerary is shown; `reset` must be called first.
    AwaitingReset,
    /// The run's state was changed by someone else while it was in flight,
    /// so its result was thrown away.
    Superseded,
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    Completed(Itinerary),
    /// The run failed and the planner is back in `Input`. The error is kept
    /// for callers and tests; users only ever see [`FAILURE_NOTICE`].
    Failed(TripError),
}

/// Why a started run stopped short of an itinerary.
enum RunError {
    /// A remote step failed; reported to the user.
    Trip(TripError),
    /// The state left the phase this run expects. Only `submit` moves an
    /// in-flight run, so this is an invariant breach, not a trip failure.
    StateLost(String),
}

impl From<TripError> for RunError {
    fn from(err: TripError) -> Self {
        Self::Trip(err)
    }
}

/// Owns the trip state and drives the research -> plan sequence.
pub struct TripPlanner {
    backend: Arc<dyn TripBackend>,
    state: RwLock<TripState>,
    tx: broadcast::Sender<TripEvent>,
}

impl TripPlanner {
    pub fn new(backend: Arc<dyn TripBackend>) -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            state: RwLock::new(TripState::new()),
            tx,
        }
    }

    /// Subscribe to state change events.
    pub fn subscribe(&self) -> broadcast::Receiver<TripEvent> {
        self.tx.subscribe()
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> TripState {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase
    }

    /// Run research then planning for `query`.
    pub async fn submit(&self, query: &str) -> SubmitOutcome {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty query");
            return SubmitOutcome::Ignored(IgnoreReason::EmptyQuery);
        }

        let run_id = Uuid::new_v4();
        {
            let mut state = self.state.write().await;
            if state.loading || state.phase.is_in_flight() {
                debug!(phase = %state.phase, "Run already in flight, dropping submit");
                return SubmitOutcome::Ignored(IgnoreReason::InFlight);
            }
            if state.phase == Phase::Done {
                debug!("Itinerary not reset yet, dropping submit");
                return SubmitOutcome::Ignored(IgnoreReason::AwaitingReset);
            }
            if let Err(e) = state.begin(query, run_id) {
                warn!(run_id = %run_id, error = %e, "Could not start run");
                return SubmitOutcome::Ignored(IgnoreReason::InFlight);
            }
        }
        self.emit(TripEvent::PhaseChanged {
            from: Phase::Input,
            to: Phase::Researching,
        });
        info!(run_id = %run_id, query = %query, "Trip run started");

        match self.run(run_id, query).await {
            Ok(itinerary) => self.finish(run_id, itinerary).await,
            Err(RunError::Trip(err)) => self.abort(run_id, err).await,
            Err(RunError::StateLost(reason)) => discard(run_id, &reason),
        }
    }

    /// Clear a finished itinerary and return to `Input`.
    ///
    /// Returns `false` (and changes nothing) unless the planner is in `Done`.
    pub async fn reset(&self) -> bool {
        {
            let mut state = self.state.write().await;
            if let Err(e) = state.reset() {
                debug!(error = %e, "Reset ignored");
                return false;
            }
        }
        info!("Trip planner reset");
        self.emit(TripEvent::PhaseChanged {
            from: Phase::Done,
            to: Phase::Input,
        });
        self.emit(TripEvent::Reset);
        true
    }

    async fn run(&self, run_id: Uuid, query: &str) -> Result<Itinerary, RunError> {
        let research = self.backend.research(query).await?;
        debug!(run_id = %run_id, research_len = research.len(), "Research complete");

        {
            let mut state = self.state.write().await;
            state.research_done().map_err(RunError::StateLost)?;
        }
        self.emit(TripEvent::PhaseChanged {
            from: Phase::Researching,
            to: Phase::Planning,
        });

        let raw_plan = self.backend.plan(&research, query).await?;
        let itinerary = Itinerary::from_plan_json(&raw_plan)?;

        let dupes = itinerary.duplicate_days();
        if !dupes.is_empty() {
            warn!(run_id = %run_id, duplicate_days = ?dupes, "Itinerary repeats day numbers");
        }

        Ok(itinerary)
    }

    async fn finish(&self, run_id: Uuid, itinerary: Itinerary) -> SubmitOutcome {
        {
            let mut state = self.state.write().await;
            if let Err(e) = state.complete(itinerary.clone()) {
                return discard(run_id, &e);
            }
        }

        info!(
            run_id = %run_id,
            days = itinerary.days.len(),
            activities = itinerary.activity_count(),
            "Trip run completed"
        );
        self.emit(TripEvent::PhaseChanged {
            from: Phase::Planning,
            to: Phase::Done,
        });
        self.emit(TripEvent::Completed {
            itinerary: itinerary.clone(),
        });
        SubmitOutcome::Completed(itinerary)
    }

    async fn abort(&self, run_id: Uuid, err: TripError) -> SubmitOutcome {
        error!(run_id = %run_id, kind = err.kind(), error = %err, "Trip run failed");

        let from = {
            let mut state = self.state.write().await;
            let from = state.phase;
            if let Err(e) = state.fail(FAILURE_NOTICE, format!("{}: {err}", err.kind())) {
                warn!(run_id = %run_id, error = %e, "Failed run left state untouched");
            }
            from
        };

        if from != Phase::Input {
            self.emit(TripEvent::PhaseChanged {
                from,
                to: Phase::Input,
            });
        }
        self.emit(TripEvent::Failed {
            notice: FAILURE_NOTICE.to_string(),
        });
        SubmitOutcome::Failed(err)
    }

    fn emit(&self, event: TripEvent) {
        // ok if nobody is listening
        let _ = self.tx.send(event);
    }
}

/// Drop the result of a run whose state was changed under it. The state is
/// left to whoever changed it.
fn discard(run_id: Uuid, reason: &str) -> SubmitOutcome {
    error!(run_id = %run_id, reason = %reason, "Run state invariant broken, result discarded");
    SubmitOutcome::Ignored(IgnoreReason::Superseded)
}
