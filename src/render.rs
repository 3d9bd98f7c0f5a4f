//! Plain-text rendering of planner state.

use std::fmt;

use crate::trip::{Itinerary, Phase};

/// Progress line shown while a call is in flight.
pub fn phase_banner(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Researching => Some("Researching destinations..."),
        Phase::Planning => Some("Crafting your itinerary..."),
        Phase::Input | Phase::Done => None,
    }
}

/// Text view of an itinerary. Days and activities keep their order.
pub struct ItineraryView<'a>(pub &'a Itinerary);

impl fmt::Display for ItineraryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your Itinerary")?;
        writeln!(f, "Est. Cost: {}", self.0.estimated_cost)?;

        for day in &self.0.days {
            writeln!(f)?;
            writeln!(f, "Day {}", day.day)?;
            for activity in &day.activities {
                writeln!(f, "  ✓ {activity}")?;
            }
        }
        Ok(())
    }
}

/// Render an itinerary as a text block.
pub fn render_itinerary(itinerary: &Itinerary) -> String {
    ItineraryView(itinerary).to_string()
}
