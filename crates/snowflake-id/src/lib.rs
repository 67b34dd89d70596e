//! Monotonic, coordination-free 63-bit Snowflake IDs.
//!
//! An ID packs three fields into the low 63 bits of an `i64`, so every value
//! is non-negative:
//!
//! ```text
//! | 0 | timestamp (ticks since epoch) | generator id | sequence |
//! ```
//!
//! - [`Structure`] validates the bit split and reports capacities and the
//!   point at which the timestamp field wraps around.
//! - [`TimeSource`] supplies ticks. [`MonotonicClock`] is immune to wall-clock
//!   adjustments; [`ManualClock`] is a settable double for tests.
//! - [`SnowflakeIdGenerator`] hands out strictly increasing IDs for one
//!   generator id, from any number of threads, and applies an
//!   [`OverflowStrategy`] when a tick runs out of sequence numbers.
//!
//! ```
//! use snowflake_id::{
//!     MonotonicClock, Options, OverflowStrategy, SnowflakeIdGenerator, Structure,
//! };
//!
//! let structure = Structure::new(45, 2, 16)?;
//! let clock = MonotonicClock::default();
//! assert_eq!(structure.max_generators(), 4);
//!
//! let options = Options::new(OverflowStrategy::Sleep);
//! let generator = SnowflakeIdGenerator::new(3, clock, structure, options)?;
//! let id = generator.next()?;
//! assert_eq!((id >> 16) & 0b11, 3);
//! # Ok::<(), snowflake_id::Error>(())
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): instrument generation and log clock anomalies.
//! - `parking-lot`: use a non-poisoning `parking_lot::Mutex` for the state.
//! - `cache-padded`: pad the state to a cache line to avoid false sharing.
//! - `serde`: (de)serialize [`Structure`] and [`Options`] from configuration.
//! - `async-tokio`: [`SnowflakeIdGenerator::next_async`] on the Tokio runtime.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
#[cfg(feature = "async-tokio")]
mod futures;
mod generator;
mod options;
mod structure;
mod time;

pub use crate::error::*;
#[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
#[cfg(feature = "async-tokio")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::options::*;
pub use crate::structure::*;
pub use crate::time::*;
