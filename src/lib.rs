// Core of the reading coach: storage, progress, gamification, analytics,
// annotation, validation and the games. The terminal front end in main.rs
// and the helper binaries drive it through this crate's public API.

pub mod annotate;
pub mod auth;
pub mod clock;
pub mod config;
pub mod curriculum;
pub mod dictionary;
pub mod engine;
pub mod feedback;
pub mod markup;
pub mod paraphrase;
pub mod progress;
pub mod session;
pub mod store;
