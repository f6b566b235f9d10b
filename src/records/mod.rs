//! Typed records for the backend's student and payment listings.
//!
//! The backend owns these shapes. They are validated here at the boundary:
//! structural problems (a payment without an `id`) are parse errors, while
//! amounts and dates are coerced so one bad value cannot sink a whole listing.

mod payment;
mod student;

pub use payment::{parse_timestamp, Payment};
pub use student::{GroupRef, Student};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
