//! ID generation utilities.

use uuid::Uuid;

/// Generates a new time-ordered request identifier (UUID v7).
///
/// Ids sort by creation time, which keeps recorded exchanges in the
/// order their requests were built.
#[must_use]
pub fn generate_id() -> Uuid {
    Uuid::now_v7()
}
