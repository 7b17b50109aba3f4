/// Basic unit tests to verify core functionality
use chrono::{Duration, NaiveDate, Utc};
use habit_streaks_mcp::*;
use tempfile::NamedTempFile;

fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n - 1)
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let user = UserId::new("tester").unwrap();
        let habit = Habit::new(user.clone(), "Test Habit", Utc::now());

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.user_id, user);
        assert_eq!(habit.streak(), Streak::new());
    }

    #[test]
    fn test_completion_creation() {
        let habit = Habit::new(UserId::new("tester").unwrap(), "Read", FixedClock::on(day(1)).now()).unwrap();

        let completion = Completion::new(&habit, day(2), Utc::now(), day(3)).unwrap();
        assert_eq!(completion.habit_id, habit.id);
        assert_eq!(completion.date_done, day(2));

        assert!(Completion::new(&habit, day(4), Utc::now(), day(3)).is_err());
    }

    #[test]
    fn test_blank_user_is_rejected() {
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new(" local ").unwrap().as_str(), "local");
    }

    #[test]
    fn test_gap_scenario() {
        let streak = Streak::calculate([day(1), day(2), day(3), day(5)], day(1), day(5));
        assert_eq!(streak, Streak { current_streak: 1, longest_streak: 3 });
    }

    #[test]
    fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let config = ServerConfig {
            db_path: temp_file.path().to_path_buf(),
            user_id: UserId::new("tester").unwrap(),
        };

        let server = tokio_test::block_on(StreakServer::new(config));
        assert!(server.is_ok());
        assert_eq!(server.unwrap().user_id().as_str(), "tester");
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_tool_error_statuses() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let user = UserId::new("tester").unwrap();

        let missing = delete_habit(&storage, &user, DeleteHabitParams::default()).unwrap_err();
        assert_eq!(missing.status(), 400);

        let unknown = delete_habit(
            &storage,
            &user,
            DeleteHabitParams { id: Some(HabitId::new().to_string()) },
        )
        .unwrap_err();
        assert_eq!(unknown.status(), 404);
    }
}
