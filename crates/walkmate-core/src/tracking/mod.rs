//! Live tracking domain module.
//!
//! This module contains the presence/location bus, the controller that gates
//! bus access by session state, and the latest-position board consumers use
//! to display counterpart positions.
//!
//! # Module Structure
//!
//! - `sample`: Position sample types (`PositionSample`, `ParticipantRole`)
//! - `bus`: The in-process presence/location bus (`PresenceBus`,
//!   `Subscription`)
//! - `controller`: Session-state gate onto the bus (`TrackingController`,
//!   `ChannelGrant`)
//! - `board`: Per-publisher latest-sample arena (`PositionBoard`)

mod board;
mod bus;
mod controller;
mod sample;

// Re-export public API
pub use board::PositionBoard;
pub use bus::{PresenceBus, Subscription};
pub use controller::{ChannelGrant, TrackingController, position_topic};
pub use sample::{ParticipantRole, PositionSample};
