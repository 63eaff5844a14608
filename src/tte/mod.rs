// tabletop.events API module.
// Provides the client, session handling, and response types.

pub mod client;
pub mod session;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use client::{TTE_BASE_URL, TteClient, Transport};
pub use session::{create_session, restore_session};
pub use types::*;
