/// Deterministic ordinal-modulo assignment of rows to workers.
///
/// Every worker scans the whole file on its own reopened handle and
/// filters by ordinal, so no read cursor is ever shared and no
/// inter-worker coordination is needed. For a fixed worker count every
/// ordinal is owned by exactly one worker.
#[derive(Debug, Clone, Copy)]
pub struct Partition {
    worker_index: usize,
    worker_count: usize,
}

impl Partition {
    pub fn new(worker_index: usize, worker_count: usize) -> Self {
        debug_assert!(worker_count >= 1);
        debug_assert!(worker_index < worker_count);
        Partition {
            worker_index,
            worker_count,
        }
    }

    pub fn owns(&self, ordinal: usize) -> bool {
        ordinal % self.worker_count == self.worker_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_worker_owns_every_ordinal() {
        let partition = Partition::new(0, 1);
        assert!((0..100).all(|ordinal| partition.owns(ordinal)));
    }

    #[test]
    fn assignment_is_total_non_overlapping_and_covering() {
        for worker_count in 1..=8 {
            let partitions: Vec<Partition> = (0..worker_count)
                .map(|i| Partition::new(i, worker_count))
                .collect();

            for ordinal in 0..1000 {
                let owners = partitions.iter().filter(|p| p.owns(ordinal)).count();
                assert_eq!(
                    owners, 1,
                    "ordinal {ordinal} owned by {owners} of {worker_count} workers"
                );
            }
        }
    }

    #[test]
    fn modulo_assignment_interleaves_rows() {
        let partition = Partition::new(2, 8);
        assert!(partition.owns(2));
        assert!(partition.owns(10));
        assert!(partition.owns(18));
        assert!(!partition.owns(3));
    }
}
