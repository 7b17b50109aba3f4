/// Property tests for the streak calculator
use chrono::{Duration, NaiveDate};
use habit_streaks_mcp::Streak;
use proptest::prelude::*;
use std::collections::BTreeSet;

const WINDOW: i64 = 60;

fn created_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn days(offsets: &BTreeSet<i64>) -> Vec<NaiveDate> {
    offsets.iter().map(|&o| created_on() + Duration::days(o)).collect()
}

proptest! {
    #[test]
    fn longest_is_never_below_current(
        offsets in proptest::collection::btree_set(0..WINDOW, 0..40),
        evaluation in 0..WINDOW,
    ) {
        let evaluation_day = created_on() + Duration::days(evaluation);
        let streak = Streak::calculate(days(&offsets), created_on(), evaluation_day);

        prop_assert!(streak.longest_streak >= streak.current_streak);
    }

    #[test]
    fn unmarked_evaluation_day_has_no_current_streak(
        offsets in proptest::collection::btree_set(0..WINDOW, 0..40),
        evaluation in 0..WINDOW,
    ) {
        prop_assume!(!offsets.contains(&evaluation));
        let evaluation_day = created_on() + Duration::days(evaluation);

        let streak = Streak::calculate(days(&offsets), created_on(), evaluation_day);
        prop_assert_eq!(streak.current_streak, 0);
    }

    #[test]
    fn adding_a_day_never_lowers_longest(
        offsets in proptest::collection::btree_set(0..WINDOW, 0..40),
        extra in 0..WINDOW,
    ) {
        let evaluation_day = created_on() + Duration::days(WINDOW - 1);
        let before = Streak::calculate(days(&offsets), created_on(), evaluation_day);

        let mut extended = offsets.clone();
        extended.insert(extra);
        let after = Streak::calculate(days(&extended), created_on(), evaluation_day);

        prop_assert!(after.longest_streak >= before.longest_streak);
    }

    #[test]
    fn input_order_and_duplicates_do_not_matter(
        offsets in proptest::collection::vec(0..WINDOW, 0..40),
    ) {
        let evaluation_day = created_on() + Duration::days(WINDOW - 1);
        let as_given: Vec<NaiveDate> = offsets.iter().map(|&o| created_on() + Duration::days(o)).collect();
        let mut reversed = as_given.clone();
        reversed.reverse();
        reversed.extend(as_given.iter().copied());

        prop_assert_eq!(
            Streak::calculate(as_given, created_on(), evaluation_day),
            Streak::calculate(reversed, created_on(), evaluation_day)
        );
    }

    #[test]
    fn full_run_counts_every_day(length in 1..WINDOW) {
        let offsets: BTreeSet<i64> = (0..length).collect();
        let evaluation_day = created_on() + Duration::days(length - 1);

        let streak = Streak::calculate(days(&offsets), created_on(), evaluation_day);
        prop_assert_eq!(streak, Streak { current_streak: length as u32, longest_streak: length as u32 });
    }
}
