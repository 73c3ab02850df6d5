//! Candidate generation and pruning.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::calendar::{BookedMask, DayTypeIndex};

use super::expander::{Candidate, expand_from};

/// Enumerates every distinct block reachable by booking between
/// `min_leave_days` and `max_leave_days` workdays from each unbooked
/// workday of the year.
///
/// Blocks are deduplicated by their `(start, end)` span; the first one
/// generated wins. Once a starting day runs out of workdays in the year,
/// longer bookings from it are not attempted.
pub fn generate_candidates(
    index: &DayTypeIndex,
    booked: &BookedMask,
    min_leave_days: u32,
    max_leave_days: u32,
) -> Vec<Candidate> {
    let min_leave_days = min_leave_days.max(1);
    if max_leave_days < min_leave_days {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for offset in index.workday_offsets().filter(|&o| !booked.is_booked(o)) {
        for leave_days in min_leave_days..=max_leave_days {
            let Some(candidate) = expand_from(index, booked, offset, leave_days) else {
                break;
            };
            if seen.insert((candidate.start, candidate.end)) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

/// Best-first ordering: efficiency descending, then days off descending,
/// then earliest start.
pub fn rank_by_efficiency(a: &Candidate, b: &Candidate) -> Ordering {
    b.efficiency
        .cmp(&a.efficiency)
        .then_with(|| b.total_days_off.cmp(&a.total_days_off))
        .then_with(|| a.start.cmp(&b.start))
}

fn rank_by_duration(a: &Candidate, b: &Candidate) -> Ordering {
    b.total_days_off
        .cmp(&a.total_days_off)
        .then_with(|| b.efficiency.cmp(&a.efficiency))
        .then_with(|| a.start.cmp(&b.start))
}

/// Keeps the union of the `top_by_efficiency` most efficient and the
/// `top_by_duration` longest candidates, ordered by [`rank_by_efficiency`].
pub fn prune_candidates(
    candidates: Vec<Candidate>,
    top_by_efficiency: usize,
    top_by_duration: usize,
) -> Vec<Candidate> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();

    order.sort_by(|&a, &b| rank_by_efficiency(&candidates[a], &candidates[b]));
    let mut keep: HashSet<usize> = order.iter().copied().take(top_by_efficiency).collect();

    order.sort_by(|&a, &b| rank_by_duration(&candidates[a], &candidates[b]));
    keep.extend(order.iter().copied().take(top_by_duration));

    let mut spans = HashSet::new();
    let mut pruned: Vec<Candidate> = candidates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, c)| c)
        .filter(|c| spans.insert((c.start, c.end)))
        .collect();

    pruned.sort_by(rank_by_efficiency);
    pruned
}
