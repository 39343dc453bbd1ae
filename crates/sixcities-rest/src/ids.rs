//! Entity identifiers.
//!
//! Ids are 24 lowercase hex characters: 8 for the creation time in Unix
//! seconds, 16 random. This is the format `ValidateObjectIdMiddleware`
//! accepts.

use chrono::Utc;
use uuid::Uuid;

/// Generates a new entity id.
pub fn new_id() -> String {
    let seconds = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
    let random = Uuid::new_v4().as_u64_pair().0;
    format!("{seconds:08x}{random:016x}")
}
