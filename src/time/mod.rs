//! Calendar-day time handling.
//!
//! All scheduling in the engine is day-granular. The [`Day`] type wraps a
//! plain calendar date and is the only time representation the schedule
//! math ever compares, so instant-in-time conversions (and the
//! timezone-induced off-by-one-day bugs they invite) cannot reach it.

pub mod day;

pub use day::{Day, DayParseError};
