use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use super::Flashcard;

pub const ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Card id for `now`: the second it was created, e.g. `20261019_101500`.
///
/// A second card in the same second gets `_001`, the next `_002`, and so on.
/// The suffix is zero padded so ids still sort in creation order.
pub fn generate_id(now: DateTime<Utc>, existing: &[Flashcard]) -> String {
    let base = now.format(ID_FORMAT).to_string();
    let taken: HashSet<&str> = existing.iter().map(|card| card.id.as_str()).collect();
    if !taken.contains(base.as_str()) {
        return base;
    }

    let mut suffix = 1u32;
    loop {
        let candidate = format!("{base}_{suffix:03}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// `now`, nudged forward when needed so it lands strictly after the newest card.
pub fn next_created_at(now: DateTime<Utc>, existing: &[Flashcard]) -> DateTime<Utc> {
    match existing.iter().map(|card| card.created_at).max() {
        Some(latest) if now <= latest => latest + Duration::microseconds(1),
        _ => now,
    }
}
