/// Basic integration tests against a file-backed database
use chrono::{Duration, NaiveDate};
use habit_streaks_mcp::*;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n - 1)
}

fn user() -> UserId {
    UserId::new("integration").unwrap()
}

fn create(storage: &SqliteStorage, created_on: NaiveDate) -> Habit {
    let params = CreateHabitParams { name: Some("Meditate".to_string()) };
    create_habit(storage, &user(), params, &FixedClock::on(created_on))
        .expect("Failed to create habit")
        .data
}

fn mark_on(storage: &SqliteStorage, habit: &Habit, today: NaiveDate) -> Result<MarkDoneResponse, ToolError> {
    let params = MarkDoneParams { habit_id: Some(habit.id.to_string()), date_done: None };
    mark_done(storage, &user(), params, &FixedClock::on(today))
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let habit = {
            let storage = SqliteStorage::new(&db_path).expect("Failed to open storage");
            let habit = create(&storage, day(1));
            mark_on(&storage, &habit, day(1)).unwrap();
            mark_on(&storage, &habit, day(2)).unwrap();
            habit
        };

        // A second server over the same file sees the log and the counters
        let config = ServerConfig { db_path, user_id: user() };
        let server = StreakServer::with_clock(config, Box::new(FixedClock::on(day(2))))
            .expect("Failed to reopen server");

        let stored = server.storage().get_habit(&habit.id, &user()).unwrap();
        assert_eq!(stored.streak(), Streak { current_streak: 2, longest_streak: 2 });
        assert_eq!(server.storage().list_completions(&habit.id, &user()).unwrap().len(), 2);
    }

    #[test]
    fn test_hundred_day_workflow() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");
        let habit = create(&storage, day(1));

        let mut last = Streak::new();
        for n in 1..=100 {
            last = mark_on(&storage, &habit, day(n)).unwrap().updated_streaks;
            assert_eq!(last.current_streak, n as u32);
        }

        assert_eq!(last, Streak { current_streak: 100, longest_streak: 100 });

        // Skipping a day resets current but the best survives
        let after_gap = mark_on(&storage, &habit, day(102)).unwrap().updated_streaks;
        assert_eq!(after_gap, Streak { current_streak: 1, longest_streak: 100 });
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");
        let habit = create(&storage, day(1));
        for n in [1, 2, 3, 5, 6] {
            mark_on(&storage, &habit, day(n)).unwrap();
        }

        let clock = FixedClock::on(day(6));
        let params = || RecomputeParams { habit_id: Some(habit.id.to_string()) };
        let first = recompute_streaks(&storage, &user(), params(), &clock).unwrap();
        let second = recompute_streaks(&storage, &user(), params(), &clock).unwrap();

        assert_eq!(first.updated_streaks, Streak { current_streak: 2, longest_streak: 3 });
        assert_eq!(first, second);
    }

    #[test]
    fn test_delete_removes_habit_and_log() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");
        let kept = create(&storage, day(1));
        let dropped = create(&storage, day(1));
        mark_on(&storage, &kept, day(1)).unwrap();
        mark_on(&storage, &dropped, day(1)).unwrap();

        delete_habit(&storage, &user(), DeleteHabitParams { id: Some(dropped.id.to_string()) }).unwrap();

        let remaining = list_all_done(&storage, &user()).unwrap().data;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].habit_id, kept.id);
        assert!(matches!(mark_on(&storage, &dropped, day(2)), Err(ToolError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_gap_scenario_over_json_rpc() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let habit = create(&storage, day(1));
        let streaks = StreakServer::from_parts(storage, user(), Box::new(FixedClock::on(day(5))));
        let mut server = McpServer::new(streaks);

        let mut next_id = 0;
        let mut request = |arguments: Value| {
            next_id += 1;
            json!({
                "jsonrpc": "2.0",
                "id": next_id,
                "method": "tools/call",
                "params": { "name": "habit_mark_done", "arguments": arguments }
            })
            .to_string()
        };

        for n in [1, 2, 3] {
            let line = request(json!({ "habit_id": habit.id.to_string(), "date_done": day(n).to_string() }));
            let reply = server.handle_line(&line).await.unwrap().unwrap();
            assert!(!reply.contains("\"error\""));
        }

        let line = request(json!({ "habit_id": habit.id.to_string() }));
        let reply: Value = serde_json::from_str(&server.handle_line(&line).await.unwrap().unwrap()).unwrap();
        let text = reply["result"]["content"][0]["text"].as_str().unwrap();
        let body: Value = serde_json::from_str(text).unwrap();

        assert_eq!(body["date_done"], json!("2024-01-05"));
        assert_eq!(body["updated_streaks"], json!({ "current_streak": 1, "longest_streak": 3 }));

        let future = request(json!({ "habit_id": habit.id.to_string(), "date_done": day(6).to_string() }));
        let reply: Value = serde_json::from_str(&server.handle_line(&future).await.unwrap().unwrap()).unwrap();
        assert_eq!(reply["error"]["data"]["status"], json!(400));
    }
}
