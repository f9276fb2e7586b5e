//! Most-free-capacity selection with a newest-node bias.

/// A node as seen by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub index: usize,
    /// Predicted free capacity.
    pub free: i64,
    /// False once the node has been marked unreachable.
    pub alive: bool,
}

/// Pick the node with the most predicted free capacity.
///
/// `candidates` must be in increasing index order. The node at
/// `highest_index` is only considered when no earlier live node has positive
/// free capacity. Returns `None` when no live candidate exists.
pub fn pick_target<I>(candidates: I, highest_index: usize) -> Option<usize>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut best: Option<usize> = None;
    let mut best_free = i64::MIN;

    for candidate in candidates {
        if candidate.index > highest_index {
            break;
        }
        if !candidate.alive {
            continue;
        }
        if candidate.index == highest_index && best_free > 0 {
            break;
        }
        if best.is_none() || candidate.free > best_free {
            best = Some(candidate.index);
            best_free = candidate.free;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(frees: &[(usize, i64, bool)]) -> Vec<Candidate> {
        frees
            .iter()
            .map(|&(index, free, alive)| Candidate { index, free, alive })
            .collect()
    }

    #[test]
    fn test_prefers_most_free_but_not_newest() {
        let c = nodes(&[(0, 5, true), (1, 10, true), (2, 1, true)]);
        assert_eq!(pick_target(c, 2), Some(1));

        let c = nodes(&[(0, 5, true), (1, 10, false), (2, 1, true)]);
        assert_eq!(pick_target(c, 2), Some(0));
    }

    #[test]
    fn test_newest_wins_when_others_are_full() {
        let c = nodes(&[(0, 0, true), (1, -3, true), (2, 4, true)]);
        assert_eq!(pick_target(c, 2), Some(2));

        let c = nodes(&[(0, 5, false), (1, 10, false), (2, 1, true)]);
        assert_eq!(pick_target(c, 2), Some(2));
    }

    #[test]
    fn test_newest_skipped_even_if_freer() {
        let c = nodes(&[(0, 1, true), (1, 100, true)]);
        assert_eq!(pick_target(c, 1), Some(0));
    }

    #[test]
    fn test_ties_keep_lowest_index() {
        let c = nodes(&[(0, 3, true), (1, 3, true), (2, 3, true)]);
        assert_eq!(pick_target(c, 2), Some(0));
    }

    #[test]
    fn test_negative_predictions_still_selectable() {
        let c = nodes(&[(0, -2, true), (1, -1, true), (2, -5, true)]);
        assert_eq!(pick_target(c, 2), Some(1));
    }

    #[test]
    fn test_sparse_indices() {
        let c = nodes(&[(1, 2, true), (4, 9, true)]);
        assert_eq!(pick_target(c, 4), Some(1));
    }

    #[test]
    fn test_single_node() {
        assert_eq!(pick_target(nodes(&[(0, 0, true)]), 0), Some(0));
    }

    #[test]
    fn test_all_dead() {
        let c = nodes(&[(0, 5, false), (1, 10, false)]);
        assert_eq!(pick_target(c, 1), None);
        assert_eq!(pick_target(Vec::new(), 0), None);
    }
}
