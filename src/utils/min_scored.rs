use std::cmp::Ordering;

/// Entry of a [`BinaryHeap`](std::collections::BinaryHeap) that pops the *smallest* score first.
/// Ties are broken by the payload so the pop order is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct MinScored<T>(pub f64, pub T);

impl<T: Ord> PartialEq for MinScored<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Ord> Eq for MinScored<T> {}

impl<T: Ord> PartialOrd for MinScored<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for MinScored<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed for min-heap behavior
        other
            .0
            .total_cmp(&self.0)
            .then_with(|| other.1.cmp(&self.1))
    }
}
