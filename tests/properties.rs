//! Property tests for the planning engine.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use leave_optimizer::calendar::{DayTypeIndex, resolve_holidays};
use leave_optimizer::config::{EngineConfig, HolidayDataset};
use leave_optimizer::models::{BookedDays, PlanningContext, WeekendPattern};
use leave_optimizer::planner::Planner;

const REGIONS: [&str; 3] = ["england-wales", "scotland", "northern-ireland"];

fn arb_weekend() -> impl Strategy<Value = WeekendPattern> {
    prop::sample::select(WeekendPattern::ALL.to_vec())
}

fn arb_region() -> impl Strategy<Value = &'static str> {
    prop::sample::select(REGIONS.to_vec())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2015i32..2035, 0u32..365).prop_map(|(year, ordinal0)| {
        NaiveDate::from_yo_opt(year, ordinal0 + 1).unwrap()
    })
}

fn context(planner: &Planner, year: i32, region: &str, weekend: WeekendPattern, allowance: u32) -> PlanningContext {
    PlanningContext::resolve(planner.catalog(), year, region, Some(weekend.key()), allowance)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn plan_blocks_never_overlap_and_fit_allowance(
        year in 2015i32..2035,
        region in arb_region(),
        weekend in arb_weekend(),
        allowance in 1u32..40,
    ) {
        let planner = Planner::new(EngineConfig::builtin());
        let plan = planner.compute_plan(&context(&planner, year, region, weekend, allowance));

        prop_assert!(plan.blocks.len() <= 3);
        prop_assert!(plan.total_leave_days <= allowance);
        for pair in plan.blocks.windows(2) {
            prop_assert!(pair[0].end_date < pair[1].start_date);
        }
        for block in &plan.blocks {
            prop_assert_eq!(block.booked_dates.len() as u32, block.leave_days_used);
            prop_assert!(block.booked_dates.iter().all(|d| d.year() == year));
            let span = (block.end_date - block.start_date).num_days() as u32 + 1;
            prop_assert_eq!(span, block.total_days_off);
        }
    }

    #[test]
    fn plan_is_idempotent(
        year in 2015i32..2035,
        region in arb_region(),
        allowance in 1u32..30,
    ) {
        let planner = Planner::new(EngineConfig::builtin());
        let ctx = context(&planner, year, region, WeekendPattern::SatSun, allowance);
        let first = planner.compute_plan(&ctx);

        let fresh = Planner::new(EngineConfig::builtin());
        prop_assert_eq!(&first, &planner.compute_plan(&ctx));
        prop_assert_eq!(&first, &fresh.compute_plan(&ctx));
    }

    #[test]
    fn day_type_is_pure(date in arb_date(), region in arb_region(), weekend in arb_weekend()) {
        let config = EngineConfig::builtin();
        let location = config.catalog().get(region).unwrap();
        let build = || {
            let holidays = resolve_holidays(date.year(), location, weekend, &[], &HolidayDataset::default());
            DayTypeIndex::build(date.year(), weekend, &holidays.entries)
        };
        prop_assert_eq!(build().day_type_of(date), build().day_type_of(date));
    }

    #[test]
    fn bridge_holds_exactly_when_both_neighbours_are_off(
        date in arb_date(),
        region in arb_region(),
    ) {
        let planner = Planner::new(EngineConfig::builtin());
        let base = context(&planner, date.year(), region, WeekendPattern::SatSun, 25);
        let (Some(prev), Some(next)) = (date.pred_opt(), date.succ_opt()) else {
            return Ok(());
        };
        prop_assume!(planner.day_insight(&base, date).is_some());
        prop_assume!(prev.year() == date.year() && next.year() == date.year());

        let both: BookedDays = [prev, next].into_iter().collect();
        let one: BookedDays = [prev].into_iter().collect();
        let with_both = planner.day_insight(&base.clone().with_booked(both), date).unwrap();
        let with_one = planner.day_insight(&base.clone().with_booked(one), date).unwrap();

        prop_assert!(with_both.bridge);
        // The next day is off without a booking only on a weekend or holiday
        let next_is_free = planner.day_insight(&base, next).is_none();
        prop_assert_eq!(with_one.bridge, next_is_free);
    }
}
