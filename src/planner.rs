//! The planning entry points.
//!
//! [`Planner`] holds only reference data (settings, locations, holiday
//! dataset) plus memo tables. Every call takes a [`PlanningContext`]
//! describing the inputs; cache entries are keyed by every input that can
//! change the result, so a changed input always misses.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::calendar::{BookedMask, DayTypeIndex, resolve_holidays};
use crate::config::{EngineConfig, EngineSettings, HolidayDataset, LocationCatalog};
use crate::models::{
    DayInsight, HolidayCoverage, HolidaySource, LeaveBlock, Notice, Plan, PlanningContext,
    WeekendPattern, YearComparison,
};
use crate::optimizer::{
    Candidate, compare_plans, day_insight, generate_candidates, prune_candidates, solve,
};

/// Entries kept per memo table before it is cleared.
const MAX_CACHE_ENTRIES: usize = 20_000;

/// Identifies one [`DayTypeIndex`] build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    /// Indexed year.
    pub year: i32,
    /// Location id.
    pub location: String,
    /// Weekend pattern.
    pub weekend: WeekendPattern,
    /// Content hash of the custom holidays.
    pub custom_revision: u64,
    /// Content hash of the holiday dataset.
    pub dataset_revision: u64,
}

/// Identifies one memoised day insight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InsightKey {
    /// The calendar the insight was computed against.
    pub index: IndexKey,
    /// Content hash of the booked set.
    pub booked_revision: u64,
    /// The day evaluated.
    pub date: NaiveDate,
}

/// Identifies one memoised year comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComparisonKey {
    /// The calendar of the current year.
    pub index: IndexKey,
    /// Allowance used for both years.
    pub allowance: u32,
}

/// A built calendar for one year and how complete its holiday data was.
#[derive(Debug)]
struct IndexedYear {
    index: DayTypeIndex,
    coverage: HolidayCoverage,
}

struct MemoTable<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> MemoTable<K, V> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= MAX_CACHE_ENTRIES {
            entries.clear();
        }
        entries.insert(key, value);
    }

    fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(cached) = self.get(&key) {
            return cached;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Leave planning engine.
///
/// `Planner` is `Send + Sync`; share it behind an `Arc`.
///
/// # Example
///
/// ```
/// use leave_optimizer::config::EngineConfig;
/// use leave_optimizer::models::PlanningContext;
/// use leave_optimizer::planner::Planner;
///
/// let planner = Planner::new(EngineConfig::builtin());
/// let ctx = PlanningContext::resolve(planner.catalog(), 2024, "england-wales", None, 10);
/// let plan = planner.compute_plan(&ctx);
///
/// assert!(!plan.is_empty());
/// assert!(plan.total_leave_days <= 10);
/// ```
pub struct Planner {
    settings: EngineSettings,
    catalog: LocationCatalog,
    dataset: Arc<HolidayDataset>,
    indexes: MemoTable<IndexKey, Arc<IndexedYear>>,
    insights: MemoTable<InsightKey, Option<DayInsight>>,
    comparisons: MemoTable<ComparisonKey, Option<YearComparison>>,
}

impl Planner {
    /// Creates a planner over a loaded configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            settings: config.settings().clone(),
            catalog: config.catalog().clone(),
            dataset: Arc::new(config.dataset().clone()),
            indexes: MemoTable::new(),
            insights: MemoTable::new(),
            comparisons: MemoTable::new(),
        }
    }

    /// The supported locations.
    pub fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    /// The engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Cache key of the calendar a context plans against.
    pub fn index_key(&self, ctx: &PlanningContext) -> IndexKey {
        IndexKey {
            year: ctx.year,
            location: ctx.location.id.clone(),
            weekend: ctx.weekend,
            custom_revision: ctx.custom_revision(),
            dataset_revision: self.dataset.revision(),
        }
    }

    /// Number of calendars currently memoised.
    pub fn cached_indexes(&self) -> usize {
        self.indexes.len()
    }

    /// Computes the best plan for the context.
    ///
    /// Booked days count as off and are deducted from the allowance; the
    /// returned blocks only consume unbooked workdays. An allowance that
    /// leaves nothing to spend yields an empty plan.
    pub fn compute_plan(&self, ctx: &PlanningContext) -> Plan {
        let indexed = self.indexed_year(ctx);
        let booked = self.booked_mask(ctx, &indexed.index);
        let notices = self.notices(ctx, indexed.coverage);

        let already_used = indexed
            .index
            .workday_offsets()
            .filter(|&o| booked.is_booked(o))
            .count() as u32;
        let remaining = ctx.allowance.saturating_sub(already_used);
        if remaining == 0 {
            debug!(year = ctx.year, allowance = ctx.allowance, "No allowance left to plan");
            return Plan::empty(indexed.coverage, notices);
        }

        let pool = self.candidate_pool(
            &indexed.index,
            &booked,
            self.settings.plan_min_leave_days,
            remaining,
        );
        let chosen = solve(&pool, remaining, self.settings.max_blocks);
        let blocks = to_blocks(&indexed.index, &chosen);

        debug!(
            year = ctx.year,
            location = %ctx.location.id,
            weekend = %ctx.weekend,
            pool = pool.len(),
            blocks = blocks.len(),
            "Computed plan"
        );
        Plan::new(blocks, indexed.coverage, notices)
    }

    /// What booking `date` alone would achieve given the context's bookings.
    ///
    /// `None` when the date is not a workday of the context's year or is
    /// already booked.
    pub fn day_insight(&self, ctx: &PlanningContext, date: NaiveDate) -> Option<DayInsight> {
        let key = InsightKey {
            index: self.index_key(ctx),
            booked_revision: ctx.booked_revision(),
            date,
        };
        self.insights.get_or_insert_with(key, || {
            let indexed = self.indexed_year(ctx);
            let booked = self.booked_mask(ctx, &indexed.index);
            day_insight(&indexed.index, &booked, date)
        })
    }

    /// Compares the longest planned block of the context's year against the
    /// previous year, both planned from a clean slate.
    pub fn year_comparison(&self, ctx: &PlanningContext) -> Option<YearComparison> {
        let current_ctx = ctx.for_year(ctx.year);
        let key = ComparisonKey {
            index: self.index_key(&current_ctx),
            allowance: ctx.allowance,
        };
        self.comparisons.get_or_insert_with(key, || {
            let current = self.compute_plan(&current_ctx);
            let previous = self.compute_plan(&ctx.for_year(ctx.year - 1));
            let comparison = compare_plans(ctx.year, &current, &previous);
            if comparison.is_none() {
                debug!(year = ctx.year, "No baseline for year comparison");
            }
            comparison
        })
    }

    /// The best single blocks available, most efficient first.
    pub fn top_opportunities(&self, ctx: &PlanningContext, limit: usize) -> Vec<LeaveBlock> {
        if ctx.allowance == 0 || limit == 0 {
            return Vec::new();
        }
        let indexed = self.indexed_year(ctx);
        let booked = self.booked_mask(ctx, &indexed.index);
        let min_leave_days = self.settings.opportunity_min_leave_days.min(ctx.allowance);
        let pool = self.candidate_pool(&indexed.index, &booked, min_leave_days, ctx.allowance);

        pool.iter()
            .take(limit)
            .filter_map(|c| c.to_block(&indexed.index))
            .collect()
    }

    /// Insight for every bookable workday of the context's year.
    pub fn calendar_heatmap(&self, ctx: &PlanningContext) -> Vec<(NaiveDate, DayInsight)> {
        let index_key = self.index_key(ctx);
        let booked_revision = ctx.booked_revision();
        let indexed = self.indexed_year(ctx);
        let booked = self.booked_mask(ctx, &indexed.index);

        indexed
            .index
            .workday_offsets()
            .filter_map(|o| indexed.index.date_of(o))
            .filter_map(|date| {
                let key = InsightKey {
                    index: index_key.clone(),
                    booked_revision,
                    date,
                };
                self.insights
                    .get_or_insert_with(key, || day_insight(&indexed.index, &booked, date))
                    .map(|insight| (date, insight))
            })
            .collect()
    }

    fn candidate_pool(
        &self,
        index: &DayTypeIndex,
        booked: &BookedMask,
        min_leave_days: u32,
        max_leave_days: u32,
    ) -> Vec<Candidate> {
        let candidates = generate_candidates(index, booked, min_leave_days, max_leave_days);
        let generated = candidates.len();
        let pool = prune_candidates(
            candidates,
            self.settings.top_by_efficiency,
            self.settings.top_by_duration,
        );
        debug!(generated, kept = pool.len(), "Pruned candidates");
        pool
    }

    fn booked_mask(&self, ctx: &PlanningContext, index: &DayTypeIndex) -> BookedMask {
        match &ctx.booked {
            Some(booked) => BookedMask::build(index, booked),
            None => BookedMask::empty(index),
        }
    }

    fn notices(&self, ctx: &PlanningContext, coverage: HolidayCoverage) -> Vec<Notice> {
        let mut notices = ctx.notices.clone();
        if coverage == HolidayCoverage::Unavailable {
            if let HolidaySource::Dataset { country_code } = &ctx.location.holidays {
                notices.push(Notice::HolidayDataUnavailable {
                    country_code: country_code.clone(),
                    year: ctx.year,
                });
            }
        }
        notices
    }

    fn indexed_year(&self, ctx: &PlanningContext) -> Arc<IndexedYear> {
        self.indexes
            .get_or_insert_with(self.index_key(ctx), || Arc::new(self.build_index(ctx)))
    }

    fn build_index(&self, ctx: &PlanningContext) -> IndexedYear {
        let mut holidays = Vec::new();
        let mut coverage = HolidayCoverage::Unavailable;
        for year in [ctx.year - 1, ctx.year, ctx.year + 1] {
            let resolved = resolve_holidays(
                year,
                &ctx.location,
                ctx.weekend,
                &ctx.custom_holidays,
                &self.dataset,
            );
            if year == ctx.year {
                coverage = resolved.coverage;
            }
            holidays.extend(resolved.entries);
        }
        if coverage.is_degraded() {
            warn!(year = ctx.year, location = %ctx.location.id, "Planning with degraded holiday data");
        }

        debug!(
            year = ctx.year,
            location = %ctx.location.id,
            holidays = holidays.len(),
            "Built day type index"
        );
        IndexedYear {
            index: DayTypeIndex::build(ctx.year, ctx.weekend, &holidays),
            coverage,
        }
    }
}

fn to_blocks(index: &DayTypeIndex, chosen: &[Candidate]) -> Vec<LeaveBlock> {
    chosen.iter().filter_map(|c| c.to_block(index)).collect()
}
