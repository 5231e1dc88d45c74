//! Surface-side library for the prize wheel: the optimistic sync store
//! used by the admin panel, the spin signal channel, and the overlay's
//! polling worker. All gateway traffic degrades to a logged no-op on
//! failure; nothing here ever takes down a surface.

pub mod error;
pub mod signal;
pub mod sync_store;
pub mod worker;

pub use error::ClientError;
pub use signal::SpinSignalChannel;
pub use sync_store::{ConfigUpdate, PrizeUpdate, SyncStore};
pub use worker::{OverlayEvent, OverlayWorker};
