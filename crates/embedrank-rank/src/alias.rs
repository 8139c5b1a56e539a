//! Alias grouping of unselected candidates.

use ndarray::ArrayView2;

use crate::similarity::cosine_similarity;

/// For each selected row, in selection order, claim every still-unclaimed,
/// unselected row whose cosine similarity to it is at least `threshold`.
///
/// Returned alias lists hold row indices in ascending order and are disjoint.
pub fn group_aliases(
    selected: &[usize],
    embeddings: ArrayView2<'_, f32>,
    threshold: f64,
) -> Vec<Vec<usize>> {
    let mut pool: Vec<usize> = (0..embeddings.nrows())
        .filter(|i| !selected.contains(i))
        .collect();

    selected
        .iter()
        .map(|&s| {
            let anchor = embeddings.row(s);
            let (aliases, rest): (Vec<usize>, Vec<usize>) = pool
                .iter()
                .partition(|&&i| cosine_similarity(embeddings.row(i), anchor) >= threshold);
            pool = rest;
            aliases
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::collections::HashSet;

    #[test]
    fn test_aliases_above_threshold() {
        let emb = array![
            [1.0f32, 0.0],
            [0.0, 1.0],
            [0.95, 0.05],
            [0.1, 0.9],
            [0.7, 0.7],
        ];
        let aliases = group_aliases(&[0, 1], emb.view(), 0.9);
        assert_eq!(aliases, vec![vec![2], vec![3]]);
    }

    #[test]
    fn test_first_selected_claims_shared_alias() {
        // Row 2 is close to both selected rows; the earlier selection wins
        let emb = array![[1.0f32, 0.2], [1.0, -0.2], [1.0, 0.0]];
        let aliases = group_aliases(&[1, 0], emb.view(), 0.9);
        assert_eq!(aliases, vec![vec![2], vec![]]);
    }

    #[test]
    fn test_selected_rows_never_aliases() {
        let emb = array![[1.0f32, 0.0], [1.0, 0.0], [1.0, 0.0]];
        let aliases = group_aliases(&[0, 1], emb.view(), 0.7);
        assert_eq!(aliases, vec![vec![2], vec![]]);
    }

    #[test]
    fn test_disjoint() {
        let emb = array![
            [1.0f32, 0.0, 0.0],
            [0.9, 0.1, 0.0],
            [0.8, 0.2, 0.1],
            [0.0, 1.0, 0.0],
            [0.1, 0.9, 0.1],
            [0.5, 0.5, 0.0],
        ];
        let aliases = group_aliases(&[0, 3], emb.view(), 0.5);
        let mut seen = HashSet::new();
        for group in &aliases {
            for i in group {
                assert!(seen.insert(*i), "row {} aliased twice", i);
                assert!(![0, 3].contains(i));
            }
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let emb = array![[1.0f32, 0.0], [1.0, 0.0]];
        assert_eq!(group_aliases(&[0], emb.view(), 1.0), vec![vec![1]]);
    }
}
