//! Combination solver.
//!
//! Picks up to `max_blocks` pairwise non-overlapping candidates whose
//! combined leave fits the allowance. A table `best[i][k][w]` holds the
//! most days off reachable using exactly `k` blocks drawn from candidates
//! `i..` (sorted by start) with at most `w` leave days, or `-1` when no
//! such selection exists. Each candidate either is skipped or taken, in
//! which case the search resumes at the first later candidate that starts
//! after it ends.

use rust_decimal::Decimal;
use tracing::trace;

use super::expander::Candidate;

const INFEASIBLE: i32 = -1;

struct Table {
    blocks: usize,
    budget: usize,
    cells: Vec<i32>,
}

impl Table {
    fn new(items: usize, blocks: usize, budget: usize) -> Self {
        Self {
            blocks,
            budget,
            cells: vec![INFEASIBLE; (items + 1) * (blocks + 1) * (budget + 1)],
        }
    }

    fn at(&self, i: usize, k: usize, w: usize) -> usize {
        (i * (self.blocks + 1) + k) * (self.budget + 1) + w
    }

    fn get(&self, i: usize, k: usize, w: usize) -> i32 {
        self.cells[self.at(i, k, w)]
    }

    fn set(&mut self, i: usize, k: usize, w: usize, value: i32) {
        let at = self.at(i, k, w);
        self.cells[at] = value;
    }
}

/// Ranking used to choose between feasible selections of different sizes:
/// days off dominate, then efficiency, then fewer leave days.
fn score(selection: &[&Candidate]) -> Decimal {
    let days_off: u32 = selection.iter().map(|c| c.total_days_off).sum();
    let leave: u32 = selection.iter().map(|c| c.leave_days).sum();
    if leave == 0 {
        return Decimal::ZERO;
    }
    let efficiency = Decimal::from(days_off) / Decimal::from(leave);
    Decimal::from(days_off) * Decimal::from(1000) + efficiency * Decimal::from(10)
        - Decimal::from(leave)
}

/// Selects the best combination of at most `max_blocks` non-overlapping
/// candidates using no more than `allowance` leave days.
///
/// Returns the chosen candidates sorted by start. The result is empty when
/// the pool is empty, the allowance is zero, or no candidate fits.
pub fn solve(pool: &[Candidate], allowance: u32, max_blocks: usize) -> Vec<Candidate> {
    if pool.is_empty() || allowance == 0 || max_blocks == 0 {
        return Vec::new();
    }

    let mut items: Vec<&Candidate> = pool.iter().collect();
    items.sort_by_key(|c| (c.start, c.end));
    let n = items.len();
    let budget = allowance as usize;

    // First candidate starting strictly after each candidate ends
    let next: Vec<usize> = items
        .iter()
        .map(|c| items.partition_point(|other| other.start <= c.end))
        .collect();

    let mut table = Table::new(n, max_blocks, budget);
    for w in 0..=budget {
        table.set(n, 0, w, 0);
    }

    for i in (0..n).rev() {
        let cost = items[i].leave_days as usize;
        let gain = items[i].total_days_off as i32;
        for k in 0..=max_blocks {
            for w in 0..=budget {
                let skip = table.get(i + 1, k, w);
                let take = if k > 0 && cost <= w {
                    match table.get(next[i], k - 1, w - cost) {
                        INFEASIBLE => INFEASIBLE,
                        rest => gain + rest,
                    }
                } else {
                    INFEASIBLE
                };
                table.set(i, k, w, skip.max(take));
            }
        }
    }

    let mut best: Option<(Decimal, Vec<usize>)> = None;
    for k in (1..=max_blocks).rev() {
        for w in 1..=budget {
            if table.get(0, k, w) == INFEASIBLE {
                continue;
            }
            let chosen = reconstruct(&table, &items, &next, k, w);
            let picked: Vec<&Candidate> = chosen.iter().map(|&i| items[i]).collect();
            let candidate_score = score(&picked);
            if best.as_ref().is_none_or(|(s, _)| candidate_score > *s) {
                best = Some((candidate_score, chosen));
            }
        }
    }

    let Some((best_score, chosen)) = best else {
        return Vec::new();
    };
    trace!(candidates = n, blocks = chosen.len(), score = %best_score, "Solved combination");

    chosen.into_iter().map(|i| items[i].clone()).collect()
}

fn reconstruct(
    table: &Table,
    items: &[&Candidate],
    next: &[usize],
    mut k: usize,
    mut w: usize,
) -> Vec<usize> {
    let mut chosen = Vec::with_capacity(k);
    let mut i = 0;
    while k > 0 && i < items.len() {
        let target = table.get(i, k, w);
        let cost = items[i].leave_days as usize;
        let taken = cost <= w && {
            let rest = table.get(next[i], k - 1, w - cost);
            rest != INFEASIBLE && items[i].total_days_off as i32 + rest == target
        };
        if taken {
            chosen.push(i);
            i = next[i];
            k -= 1;
            w -= cost;
        } else {
            i += 1;
        }
    }
    chosen
}
