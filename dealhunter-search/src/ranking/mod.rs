//! Deterministic post-processing of raw provider responses.
//!
//! Everything here is a pure function of its input: no I/O, no shared state,
//! and no failure mode. Malformed fields degrade to `None`/zero and the
//! functions always return a (possibly empty) list.

pub mod coerce;
pub mod duration;
pub mod flights;
pub mod hotels;

/// Shortlist length when the caller does not choose one.
pub const DEFAULT_TOP_N: usize = 3;

pub use coerce::{FieldPath, FieldChain, try_parse_number};
pub use duration::{format_duration, format_minutes};
pub use flights::{RankedFlight, rank_flights};
pub use hotels::{RankedHotel, rank_hotels};
