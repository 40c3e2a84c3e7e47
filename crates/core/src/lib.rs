//! Entryflow core library.
//!
//! Domain logic for running browser-automation jobs: website profiles,
//! upload staging, worker process launching, output multiplexing, and
//! client-side completion detection. No HTTP dependencies -- the `api`
//! crate owns the transport layer.

pub mod detector;
pub mod error;
pub mod pipeline;
pub mod staging;
pub mod stream;
pub mod website;
pub mod worker;
