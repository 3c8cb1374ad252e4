//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `remote`: REST client for the managed backend (feature `remote-repo`)
pub mod local;
#[cfg(feature = "remote-repo")]
pub mod remote;

pub use local::LocalRepository;
#[cfg(feature = "remote-repo")]
pub use remote::RemoteRepository;
