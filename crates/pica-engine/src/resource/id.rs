use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a fresh cache id. Never 0 and never repeated within the process.
pub(crate) fn next_cache_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_nonzero() {
        let a = next_cache_id();
        let b = next_cache_id();
        assert_ne!(a, 0);
        assert!(b > a);
    }
}
