//! WanderAI — research a travel query, then plan an itinerary from the research.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod trip;
