/// Streak and success-ratio behaviour checked through the public API
use std::collections::HashSet;

use chrono::{Duration, NaiveDate, Utc};
use habit_stats_mcp::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ones(dates: &[NaiveDate]) -> Vec<Completion> {
    dates.iter().map(|d| Completion::new(*d, 1)).collect()
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn test_daily_streak_walks_back_from_reference() {
        let r = day(2025, 8, 13);
        let three: HashSet<NaiveDate> = [r, r - Duration::days(1), r - Duration::days(2)].into();
        assert_eq!(current_daily_streak(&three, r), 3);

        let gap: HashSet<NaiveDate> = [r, r - Duration::days(2)].into();
        assert_eq!(current_daily_streak(&gap, r), 1);

        assert_eq!(current_daily_streak(&HashSet::new(), r), 0);
    }

    #[test]
    fn test_longest_daily_streak_ignores_order_and_duplicates() {
        let dates = [
            day(2025, 8, 3), day(2025, 8, 1), day(2025, 8, 2),
            day(2025, 8, 2), day(2025, 8, 10), day(2025, 8, 11),
        ];
        let mut reversed = ones(&dates);
        reversed.reverse();

        assert_eq!(longest_daily_streak(&completion_dates(&ones(&dates))), 3);
        assert_eq!(longest_daily_streak(&completion_dates(&reversed)), 3);
    }

    #[test]
    fn test_weekly_streak_with_target() {
        let r = day(2025, 8, 13);
        let completions = vec![
            Completion::new(day(2025, 8, 11), 3),
            Completion::new(day(2025, 8, 4), 1),
            Completion::new(day(2025, 8, 6), 2),
            Completion::new(day(2025, 7, 29), 1),
        ];

        assert_eq!(current_weekly_streak(&completions, 3, r).unwrap(), 2);
        let totals = weekly_totals(&completions).unwrap();
        assert_eq!(longest_weekly_streak(&totals, 3).unwrap(), 2);
        assert!(matches!(
            current_weekly_streak(&completions, 0, r),
            Err(DomainError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_daily_ratio() {
        let r = day(2025, 8, 13);
        let dates = completion_dates(&ones(&[day(2025, 8, 13), day(2025, 8, 10), day(2025, 8, 7), day(2025, 8, 6)]));
        let ratio = success_ratio_daily(&dates, 7, r).unwrap();
        assert!((ratio - 3.0 / 7.0).abs() < 1e-4);
        assert!(success_ratio_daily(&dates, 0, r).is_err());
    }

    #[test]
    fn test_weekly_ratio_short_window_is_binary() {
        let r = day(2025, 8, 13);
        let met = ones(&[day(2025, 8, 11), day(2025, 8, 12)]);
        assert_eq!(success_ratio_weekly(&met, 2, 7, r).unwrap(), 1.0);
        assert_eq!(success_ratio_weekly(&met, 3, 7, r).unwrap(), 0.0);
    }

    #[test]
    fn test_end_to_end_daily() {
        let habit = Habit::new("Reading".to_string(), Cadence::Daily, 1, Utc::now()).unwrap();
        let completions = ones(&[day(2025, 8, 11), day(2025, 8, 12), day(2025, 8, 13)]);

        let stats = compute_habit_stats(&habit, &completions, day(2025, 8, 13)).unwrap();
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
        assert!((stats.success_7d - 0.4286).abs() < 1e-4);
        assert!((stats.success_30d - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_end_to_end_weekly() {
        let habit = Habit::new("Running".to_string(), Cadence::Weekly, 3, Utc::now()).unwrap();
        let completions = ones(&[
            day(2025, 8, 11), day(2025, 8, 12), day(2025, 8, 13),
            day(2025, 8, 4), day(2025, 8, 5), day(2025, 8, 6),
            day(2025, 7, 31),
        ]);

        let stats = compute_habit_stats(&habit, &completions, day(2025, 8, 13)).unwrap();
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.success_7d, 1.0);
        assert!((stats.success_30d - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_reference_before_any_data() {
        let habit = Habit::new("Reading".to_string(), Cadence::Daily, 1, Utc::now()).unwrap();
        let completions = ones(&[day(2025, 8, 11)]);
        let stats = compute_habit_stats(&habit, &completions, day(2025, 1, 1)).unwrap();
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.success_30d, 0.0);
    }

    #[test]
    fn test_streak_messages() {
        assert!(streak_message(Cadence::Daily, 0).contains("Ready to start"));
        assert!(streak_message(Cadence::Weekly, 1).contains("week"));
        assert!(streak_message(Cadence::Daily, 3).contains("3 days"));
    }
}
