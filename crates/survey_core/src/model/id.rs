//! Identifier generation for series and projects.
//!
//! # Invariants
//! - Two calls to `new_id()` in one process never return equal values.
//! - Identifiers are opaque; callers must not parse them.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Returns a fresh opaque identifier.
///
/// Shape is `id-<sequence>-<uuid>`; the sequence alone guarantees
/// in-process uniqueness, the UUID suffix keeps ids distinct across sessions.
pub fn new_id() -> String {
    let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("id-{sequence}-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::new_id;
    use std::collections::HashSet;

    #[test]
    fn new_id_never_repeats() {
        let ids = (0..1_000).map(|_| new_id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn new_id_has_stable_prefix() {
        assert!(new_id().starts_with("id-"));
    }
}
