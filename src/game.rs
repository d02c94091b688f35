//! Game service integration for the year-guessing backend
//!
//! This module provides:
//! - Visitor identity (one id per session, sent with every request)
//! - Wire types for the three game endpoints
//! - A transport seam with the reqwest-backed HTTP implementation
//! - GameClient for starting games, asking questions and guessing

mod client;
mod response;
mod transport;
mod visitor;

pub use client::{GameClient, GameError};
pub use transport::GameTransport;
pub use visitor::VisitorId;
