//! Ethos Store
//!
//! Durable local storage of one [`Session`](ethos_session::Session) blob
//! under a fixed key.
//!
//! # Architecture
//!
//! ```text
//! Session → snapshot::encode → SessionStore::put → disk / memory
//!                ↑___________________________________↓
//!        Persistence::load (decode, rebind against catalog, fail open)
//! ```
//!
//! [`SessionStore`] implementations report every failure. [`Persistence`]
//! sits on top and turns those failures into log lines: local saving is
//! best-effort and never blocks the flow.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod persistence;
pub mod snapshot;
pub mod store;

pub use error::StoreError;
pub use persistence::Persistence;
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use store::{FileStore, MemoryStore, SessionStore, DEFAULT_KEY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
