/// Basic unit tests to verify core functionality through the public API
use chrono::{NaiveDate, Utc};
use habit_stats_mcp::*;
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new("  Test Habit ".to_string(), Cadence::Weekly, 3, Utc::now());

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.cadence, Cadence::Weekly);
        assert_eq!(habit.goal_display(), "3x per week");
    }

    #[test]
    fn test_habit_validation() {
        assert!(matches!(
            Habit::new("".to_string(), Cadence::Daily, 1, Utc::now()),
            Err(DomainError::InvalidHabitName(_))
        ));
        assert!(matches!(
            Habit::new("a".repeat(101), Cadence::Daily, 1, Utc::now()),
            Err(DomainError::InvalidHabitName(_))
        ));
        assert!(matches!(
            Habit::new("Run".to_string(), Cadence::Weekly, 0, Utc::now()),
            Err(DomainError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_habit_log_creation() {
        let habit_id = HabitId::new();
        let today = day(2025, 8, 13);

        let log = HabitLog::new(habit_id.clone(), today, 2, today, Utc::now());

        assert!(log.is_ok());
        let log = log.unwrap();
        assert_eq!(log.habit_id, habit_id);
        assert_eq!(log.completion(), Completion::new(today, 2));
    }

    #[test]
    fn test_habit_log_rejects_future_date() {
        let today = day(2025, 8, 13);
        let result = HabitLog::new(HabitId::new(), day(2025, 8, 14), 1, today, Utc::now());
        assert!(matches!(result, Err(DomainError::InvalidDate(_))));
    }

    #[test]
    fn test_cadence_parsing() {
        assert_eq!("daily".parse::<Cadence>().unwrap(), Cadence::Daily);
        assert_eq!("Weekly".parse::<Cadence>().unwrap(), Cadence::Weekly);
        assert!("monthly".parse::<Cadence>().is_err());
    }

    #[test]
    fn test_calendar_helpers() {
        let monday = start_of_week(day(2025, 8, 17));
        assert_eq!(monday, day(2025, 8, 11));
        assert_eq!(start_of_week(monday), monday);

        let window = last_n_days(7, day(2025, 8, 13)).unwrap();
        let dates: Vec<NaiveDate> = window.iter().collect();
        assert_eq!(dates.first(), Some(&day(2025, 8, 7)));
        assert_eq!(dates.last(), Some(&day(2025, 8, 13)));
        assert_eq!(dates.len(), 7);

        assert!(matches!(last_n_days(0, day(2025, 8, 13)), Err(DomainError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitStatsServer::new(temp_file.path().to_path_buf()).await;
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
        assert!(storage.unwrap().list_habits().unwrap().is_empty());
    }
}
