/// Basic integration tests: tools and stats over a real SQLite file
use chrono::NaiveDate;
use habit_stats_mcp::tools::*;
use habit_stats_mcp::*;
use tempfile::{tempdir, NamedTempFile};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create(storage: &SqliteStorage, name: &str, cadence: &str, target: Option<u32>) -> HabitId {
    let response = create_habit(
        storage,
        CreateHabitParams {
            name: name.to_string(),
            cadence: Some(cadence.to_string()),
            target_per_period: target,
        },
    )
    .expect("Failed to create habit");
    HabitId::from_string(&response.habit_id).unwrap()
}

fn log(storage: &SqliteStorage, habit_id: &HabitId, date: &str, today: NaiveDate) {
    log_habit(
        storage,
        LogHabitParams {
            habit_id: habit_id.to_string(),
            date: Some(date.to_string()),
            value: None,
        },
        today,
    )
    .expect("Failed to log habit");
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_basic_workflow() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitStatsServer::new(temp_file.path().to_path_buf())
            .await
            .expect("Failed to create server");

        let today = day(2025, 8, 13);
        let reading = create(server.storage(), "Reading", "daily", None);
        for date in ["2025-08-11", "2025-08-12", "2025-08-13"] {
            log(server.storage(), &reading, date, today);
        }

        let stats = server.analytics().all_stats(server.storage(), today).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].current_streak, 3);
        assert_eq!(stats[0].longest_streak, 3);
        assert_eq!(stats[0].success_7d, 0.4286);
        assert_eq!(stats[0].success_30d, 0.1);
    }

    #[test]
    fn test_weekly_scenario_through_tools() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::new(temp_dir.path().join("habits.db")).unwrap();
        let today = day(2025, 8, 13);

        let running = create(&storage, "Running", "weekly", Some(3));
        for date in [
            "2025-08-11", "2025-08-12", "2025-08-13",
            "2025-08-04", "2025-08-05", "2025-08-06",
            "2025-07-31",
        ] {
            log(&storage, &running, date, today);
        }

        let response = get_habit_stats(
            &storage,
            StatsParams { habit_id: Some(running.to_string()), reference_date: None },
            today,
        )
        .unwrap();

        let stats = &response.habits[0];
        assert_eq!(stats.cadence, Cadence::Weekly);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.success_7d, 1.0);
        assert_eq!(stats.success_30d, 0.4);
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("habits.db");
        let today = day(2025, 8, 13);

        let habit_id = {
            let server = HabitStatsServer::new(db_path.clone())
                .await
                .expect("Failed to create first server");
            let id = create(server.storage(), "Meditate", "daily", None);
            log(server.storage(), &id, "2025-08-12", today);
            log(server.storage(), &id, "2025-08-13", today);
            id
        };

        let server = HabitStatsServer::new(db_path)
            .await
            .expect("Failed to create second server");

        let habit = server.storage().get_habit(&habit_id).unwrap();
        assert_eq!(habit.name, "Meditate");

        let stats = server.analytics().habit_stats(server.storage(), &habit, today).unwrap();
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn test_toggle_and_history_edits_move_stats() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let today = day(2025, 8, 13);
        let reading = create(&storage, "Reading", "daily", None);
        log(&storage, &reading, "2025-08-12", today);

        let toggled = toggle_today(&storage, ToggleTodayParams { habit_id: reading.to_string() }, today).unwrap();
        assert!(toggled.logged);
        assert_eq!(toggled.current_streak, 2);

        let logs = list_logs(
            &storage,
            ListLogsParams { habit_id: Some(reading.to_string()), ordering: Some("date".to_string()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(logs.count, 2);
        assert_eq!(logs.logs[0].date, day(2025, 8, 12));

        unlog(&storage, UnlogParams { log_id: logs.logs[0].log_id.clone() }).unwrap();
        let stats = get_habit_stats(&storage, StatsParams::default(), today).unwrap();
        assert_eq!(stats.habits[0].current_streak, 1);
        assert_eq!(stats.habits[0].longest_streak, 1);
    }

    #[test]
    fn test_switching_cadence_recomputes_history() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let today = day(2025, 8, 13);
        let habit = create(&storage, "Gym", "daily", None);
        log(&storage, &habit, "2025-08-11", today);
        log(&storage, &habit, "2025-08-13", today);

        let daily = get_habit_stats(&storage, StatsParams::default(), today).unwrap();
        assert_eq!(daily.habits[0].current_streak, 1);

        update_habit(
            &storage,
            UpdateHabitParams {
                habit_id: habit.to_string(),
                name: None,
                cadence: Some("weekly".to_string()),
                target_per_period: Some(2),
            },
        )
        .unwrap();

        let weekly = get_habit_stats(&storage, StatsParams::default(), today).unwrap();
        assert_eq!(weekly.habits[0].cadence, Cadence::Weekly);
        assert_eq!(weekly.habits[0].current_streak, 1);
        assert_eq!(weekly.habits[0].success_7d, 1.0);
    }

    #[test]
    fn test_delete_habit_cascades() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let today = day(2025, 8, 13);
        let keep = create(&storage, "Keep", "daily", None);
        let gone = create(&storage, "Drop", "daily", None);
        log(&storage, &keep, "2025-08-13", today);
        log(&storage, &gone, "2025-08-13", today);

        delete_habit(&storage, DeleteHabitParams { habit_id: gone.to_string() }).unwrap();

        let logs = list_logs(&storage, ListLogsParams::default()).unwrap();
        assert_eq!(logs.count, 1);
        assert_eq!(logs.logs[0].habit_id, keep.to_string());
        assert_eq!(list_habits(&storage, ListHabitsParams::default(), today).unwrap().habits.len(), 1);
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf())
            .expect("Failed to create storage");

        let _: &dyn HabitStorage = &storage;
        assert!(storage.completions_up_to(&HabitId::new(), day(2025, 8, 13)).unwrap().is_empty());
    }
}
