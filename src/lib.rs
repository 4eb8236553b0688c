//! Client for the Endomondo mobile API: authenticate, list and fetch
//! workouts, and upload tracks with the mobile app's point-streaming protocol.

pub mod codec;
pub mod config;
pub mod error;
pub mod gateway;
pub mod gpx;
pub mod mapper;
pub mod session;
pub mod sport;
pub mod tracker;
pub mod transport;
pub mod types;
pub mod upload;
pub mod utils;

pub use error::{Error, Result, TransportError};
pub use session::Session;
pub use tracker::EndomondoTracker;
