//! CLI front end — stdin/stdout loop around a [`TripPlanner`].

use std::io::Write;
use std::sync::Arc;

use futures::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::Result;
use crate::render::{phase_banner, render_itinerary};
use crate::trip::{Phase, SubmitOutcome, TripEvent, TripPlanner};

const QUIT_COMMAND: &str = "/quit";
const BUSY_NOTICE: &str = "Still working on your last trip, ignoring input.";

/// What the front end did with one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    /// A run was started for the line.
    Submitted,
    /// The shown itinerary was cleared.
    Reset,
    /// A run is in flight; the line was thrown away.
    Dropped,
    /// Blank line while waiting for a query.
    Skipped,
}

/// Reads queries line by line and prints planner progress to the terminal.
pub struct CliFrontend {
    planner: Arc<TripPlanner>,
    /// The last submit started from this front end.
    pending: Option<JoinHandle<SubmitOutcome>>,
}

impl CliFrontend {
    pub fn new(planner: Arc<TripPlanner>) -> Self {
        Self {
            planner,
            pending: None,
        }
    }

    /// Read stdin, print itineraries to stdout.
    pub async fn run(&mut self) -> Result<()> {
        self.run_lines(stdin_lines(), std::io::stdout()).await
    }

    /// Run until the input ends or `/quit` is read.
    ///
    /// At end of input the in-flight run, if any, is awaited and its
    /// itinerary or failure notice is printed before returning. `/quit`
    /// returns immediately and abandons an in-flight run.
    pub async fn run_lines<S, W>(&mut self, lines: S, out: W) -> Result<()>
    where
        S: Stream<Item = std::io::Result<String>>,
        W: Write + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let printer = spawn_event_printer(self.planner.subscribe(), out, shutdown_rx);
        let mut lines = Box::pin(lines);

        eprint!("> ");
        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    printer.abort();
                    return Err(e.into());
                }
            };
            if line.trim() == QUIT_COMMAND {
                printer.abort();
                return Ok(());
            }
            self.handle_line(line).await;
        }

        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Trip run task did not finish");
            }
        }
        // The run's events are already queued; the printer drains them first.
        let _ = shutdown_tx.send(());
        if let Err(e) = printer.await {
            warn!(error = %e, "Event printer did not finish");
        }
        Ok(())
    }

    /// React to one input line according to the planner's phase.
    pub async fn handle_line(&mut self, line: String) -> LineAction {
        if self.pending.as_ref().is_some_and(|h| !h.is_finished()) {
            eprintln!("{BUSY_NOTICE}");
            return LineAction::Dropped;
        }

        match self.planner.phase().await {
            Phase::Done => {
                if !self.planner.reset().await {
                    return LineAction::Dropped;
                }
                eprint!("> ");
                LineAction::Reset
            }
            Phase::Researching | Phase::Planning => {
                eprintln!("{BUSY_NOTICE}");
                LineAction::Dropped
            }
            Phase::Input => {
                if line.trim().is_empty() {
                    eprint!("> ");
                    return LineAction::Skipped;
                }
                // Runs in the background so input typed meanwhile hits the
                // single-flight guard instead of queueing.
                let planner = Arc::clone(&self.planner);
                self.pending = Some(tokio::spawn(async move { planner.submit(&line).await }));
                LineAction::Submitted
            }
        }
    }
}

/// Print banners, itineraries and failure notices as the planner emits them.
///
/// Stops on `shutdown` once every queued event has been printed.
fn spawn_event_printer<W>(
    mut rx: broadcast::Receiver<TripEvent>,
    mut out: W,
    mut shutdown: oneshot::Receiver<()>,
) -> JoinHandle<()>
where
    W: Write + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                biased;
                event = rx.recv() => event,
                _ = &mut shutdown => break,
            };
            match event {
                Ok(TripEvent::PhaseChanged { to, .. }) => {
                    if let Some(banner) = phase_banner(to) {
                        eprintln!("⏳ {banner}");
                    }
                }
                Ok(TripEvent::Completed { itinerary }) => {
                    let written = writeln!(out, "\n{}", render_itinerary(&itinerary))
                        .and_then(|()| out.flush());
                    if let Err(e) = written {
                        warn!(error = %e, "Could not write itinerary");
                    }
                    eprint!("Press Enter to plan another trip (or {QUIT_COMMAND}): ");
                }
                Ok(TripEvent::Failed { notice }) => {
                    eprintln!("❌ {notice}");
                    eprint!("> ");
                }
                Ok(TripEvent::Reset) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "Event printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn stdin_lines() -> impl Stream<Item = std::io::Result<String>> {
    let reader = BufReader::new(tokio::io::stdin());
    stream::unfold(reader.lines(), |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((Ok(line), lines)),
            Ok(None) => None,
            Err(e) => Some((Err(e), lines)),
        }
    })
}
