//! In-rank ordering by iterated barycenter sweeps.

use std::cmp::Ordering;

use crate::graph::LayoutGraph;

/// Result of crossing reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankOrder {
    /// `ranks[r]` lists the nodes of rank `r` from the first cross position.
    pub ranks: Vec<Vec<usize>>,
    /// Crossings between adjacent ranks in the kept ordering.
    pub crossings: usize,
    /// Sweep passes run.
    pub passes: usize,
}

/// Reorder nodes within ranks to reduce edge crossings.
///
/// Only edges joining adjacent ranks take part. Each pass sweeps down then
/// up; the best ordering seen is kept, and sweeping stops at the first pass
/// that does not improve on it.
pub(crate) fn reduce_crossings(
    mut ranks: Vec<Vec<usize>>,
    node_ranks: &[usize],
    edges: &[(usize, usize)],
    max_passes: usize,
) -> RankOrder {
    let n = node_ranks.len();
    let adjacent: Vec<(usize, usize)> = edges
        .iter()
        .copied()
        .filter(|&(u, v)| node_ranks[v] == node_ranks[u] + 1)
        .collect();
    let succ = LayoutGraph::successors(n, &adjacent);
    let pred = LayoutGraph::predecessors(n, &adjacent);

    let mut best_crossings = total_crossings(&ranks, &succ, n);
    let mut best = ranks.clone();
    let mut passes = 0;

    while passes < max_passes && best_crossings > 0 && ranks.len() > 1 {
        passes += 1;

        for r in 1..ranks.len() {
            let (fixed, free) = ranks.split_at_mut(r);
            sweep(&mut free[0], &fixed[r - 1], &pred, n);
        }
        for r in (0..ranks.len() - 1).rev() {
            let (free, fixed) = ranks.split_at_mut(r + 1);
            sweep(&mut free[r], &fixed[0], &succ, n);
        }

        let crossings = total_crossings(&ranks, &succ, n);
        if crossings < best_crossings {
            best_crossings = crossings;
            best.clone_from(&ranks);
        } else {
            break;
        }
    }

    RankOrder {
        ranks: best,
        crossings: best_crossings,
        passes,
    }
}

/// Reorder `free` by the mean position of each node's neighbours in
/// `fixed`. Nodes without neighbours there keep their own position as
/// their key; ties keep the current order.
fn sweep(free: &mut [usize], fixed: &[usize], neighbours: &[Vec<usize>], n: usize) {
    let fixed_pos = positions(fixed, n);

    let mut keyed: Vec<(f64, usize, usize)> = free
        .iter()
        .enumerate()
        .map(|(current, &node)| {
            let key = barycenter(&fixed_pos, &neighbours[node]).unwrap_or(current as f64);
            (key, current, node)
        })
        .collect();

    keyed.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    for (slot, (_, _, node)) in free.iter_mut().zip(keyed) {
        *slot = node;
    }
}

fn positions(order: &[usize], n: usize) -> Vec<Option<usize>> {
    let mut pos = vec![None; n];
    for (i, &node) in order.iter().enumerate() {
        pos[node] = Some(i);
    }
    pos
}

fn barycenter(positions: &[Option<usize>], neighbours: &[usize]) -> Option<f64> {
    let (sum, count) = neighbours
        .iter()
        .filter_map(|&nb| positions[nb])
        .fold((0usize, 0usize), |(sum, count), pos| (sum + pos, count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Crossings summed over every pair of adjacent ranks.
pub(crate) fn total_crossings(ranks: &[Vec<usize>], succ: &[Vec<usize>], n: usize) -> usize {
    ranks
        .windows(2)
        .map(|pair| count_crossings(&pair[0], &pair[1], succ, n))
        .sum()
}

fn count_crossings(upper: &[usize], lower: &[usize], succ: &[Vec<usize>], n: usize) -> usize {
    let lower_pos = positions(lower, n);
    let segments: Vec<(usize, usize)> = upper
        .iter()
        .enumerate()
        .flat_map(|(i, &u)| {
            let lower_pos = &lower_pos;
            succ[u]
                .iter()
                .filter_map(move |&v| lower_pos[v].map(|j| (i, j)))
        })
        .collect();

    let mut crossings = 0;
    for (k, &(a1, b1)) in segments.iter().enumerate() {
        for &(a2, b2) in &segments[k + 1..] {
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}
