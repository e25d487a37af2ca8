use std::sync::atomic::{AtomicU64, Ordering};

/// Counters collected during a graph build. Atomic so the parallel
/// extraction pass can update them without locking.
#[derive(Default)]
pub struct BuildStats {
    pub pages_registered: AtomicU64,
    pub references_found: AtomicU64,
    pub edges_recorded: AtomicU64,
    pub ambiguous_references: AtomicU64,
    pub unresolved_references: AtomicU64,
}

impl BuildStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_pages(&self) {
        self.pages_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_references(&self, count: u64) {
        self.references_found.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_edges(&self) {
        self.edges_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ambiguous(&self) {
        self.ambiguous_references.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unresolved(&self) {
        self.unresolved_references.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages(&self) -> u64 {
        self.pages_registered.load(Ordering::Relaxed)
    }

    pub fn references(&self) -> u64 {
        self.references_found.load(Ordering::Relaxed)
    }

    pub fn edges(&self) -> u64 {
        self.edges_recorded.load(Ordering::Relaxed)
    }

    pub fn ambiguous(&self) -> u64 {
        self.ambiguous_references.load(Ordering::Relaxed)
    }

    pub fn unresolved(&self) -> u64 {
        self.unresolved_references.load(Ordering::Relaxed)
    }

    pub fn warnings(&self) -> u64 {
        self.ambiguous() + self.unresolved()
    }
}
