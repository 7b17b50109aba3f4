/// Competing mark-done calls over separate connections to one database file
use chrono::NaiveDate;
use futures::future::join_all;
use habit_streaks_mcp::*;
use std::path::PathBuf;
use std::sync::{Arc, Barrier};
use tempfile::NamedTempFile;

fn user() -> UserId {
    UserId::new("racer").unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 10).unwrap()
}

fn setup() -> (NamedTempFile, Habit) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");
    let created_on = today().pred_opt().unwrap();
    let habit = Habit::new(user(), "Push-ups", FixedClock::on(created_on).now()).unwrap();
    storage.create_habit(&habit).unwrap();
    (temp_file, habit)
}

/// Mark `habit` done on each day from its own connection and thread
async fn mark_concurrently(
    db_path: PathBuf,
    habit: &Habit,
    days: Vec<NaiveDate>,
) -> Vec<Result<MarkDoneResponse, ToolError>> {
    let tasks = days.into_iter().map(|date| {
        let db_path = db_path.clone();
        let habit_id = habit.id.to_string();
        tokio::task::spawn_blocking(move || {
            let storage = SqliteStorage::new(&db_path).expect("Failed to open connection");
            let params = MarkDoneParams {
                habit_id: Some(habit_id),
                date_done: Some(date.to_string()),
            };
            mark_done(&storage, &user(), params, &FixedClock::on(today()))
        })
    });

    join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("mark-done task panicked"))
        .collect()
}

#[cfg(test)]
mod concurrency_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_same_day_race_records_once() {
        let (temp_file, habit) = setup();

        let results = mark_concurrently(temp_file.path().to_path_buf(), &habit, vec![today(), today()]).await;

        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(ToolError::AlreadyMarked { .. })))
            .count();
        assert_eq!(succeeded, 1);
        assert_eq!(duplicates, 1);

        let storage = SqliteStorage::new(temp_file.path()).unwrap();
        assert_eq!(storage.list_completions(&habit.id, &user()).unwrap().len(), 1);
        assert_eq!(
            storage.get_habit(&habit.id, &user()).unwrap().streak(),
            Streak { current_streak: 1, longest_streak: 1 }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_different_days_both_land() {
        let (temp_file, habit) = setup();
        let yesterday = today().pred_opt().unwrap();

        let results = mark_concurrently(temp_file.path().to_path_buf(), &habit, vec![yesterday, today()]).await;
        assert!(results.iter().all(|r| r.is_ok()));

        let storage = SqliteStorage::new(temp_file.path()).unwrap();
        let params = RecomputeParams { habit_id: Some(habit.id.to_string()) };
        let recomputed = recompute_streaks(&storage, &user(), params, &FixedClock::on(today())).unwrap();

        assert_eq!(recomputed.updated_streaks, Streak { current_streak: 2, longest_streak: 2 });
        assert_eq!(storage.list_completions(&habit.id, &user()).unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_connections_opening_fresh_file_together_all_succeed() {
        const CONNECTIONS: usize = 4;
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        for round in 0..20 {
            let db_path = dir.path().join(format!("fresh-{}.db", round));
            let barrier = Arc::new(Barrier::new(CONNECTIONS));

            let opens = (0..CONNECTIONS).map(|_| {
                let db_path = db_path.clone();
                let barrier = Arc::clone(&barrier);
                tokio::task::spawn_blocking(move || {
                    barrier.wait();
                    SqliteStorage::new(&db_path).map(|_| ())
                })
            });

            for opened in join_all(opens).await {
                let opened = opened.expect("open task panicked");
                assert!(opened.is_ok(), "round {}: {:?}", round, opened);
            }

            // Schema was applied once and is usable
            let storage = SqliteStorage::new(&db_path).unwrap();
            let habit = Habit::new(user(), "Plank", FixedClock::on(today()).now()).unwrap();
            storage.create_habit(&habit).unwrap();
            assert_eq!(storage.list_habits(&user()).unwrap().len(), 1);
        }
    }
}
