use std::num::NonZero;
use std::sync::atomic::{AtomicU64, Ordering};

/// One result slot per worker, holding the hit ratio that worker produced in the latest iteration.
///
/// Slots store the bit pattern of an `f64` in an [`AtomicU64`]. All accesses are `Relaxed`: the
/// buffer does not order anything by itself. Correctness relies on the phase barrier that every
/// writer crosses after writing and every reader crosses before reading, which establishes the
/// happens-before edge between the two.
///
/// The buffer is allocated once, zero-initialized, and never resized.
#[derive(Debug)]
pub(crate) struct ResultSlots {
    slots: Box<[AtomicU64]>,
}

impl ResultSlots {
    pub(crate) fn new(len: NonZero<usize>) -> Self {
        let slots = (0..len.get())
            .map(|_| AtomicU64::new(0.0_f64.to_bits()))
            .collect();

        Self { slots }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// # Panics
    ///
    /// Panics if `index` is not the index of a slot. Worker indexes are assigned from the same
    /// count the buffer was sized with, so this indicates a bug in the caller.
    pub(crate) fn store(&self, index: usize, value: f64) {
        self.slots
            .get(index)
            .expect("worker index is always within the result buffer")
            .store(value.to_bits(), Ordering::Relaxed);
    }

    #[cfg(test)]
    pub(crate) fn load(&self, index: usize) -> Option<f64> {
        self.slots
            .get(index)
            .map(|slot| f64::from_bits(slot.load(Ordering::Relaxed)))
    }

    /// Copies all slots out, in worker index order.
    pub(crate) fn snapshot(&self) -> Vec<f64> {
        self.slots
            .iter()
            .map(|slot| f64::from_bits(slot.load(Ordering::Relaxed)))
            .collect()
    }
}
