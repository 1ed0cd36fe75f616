use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::modules::feed::{CarRef, UserRef};
use crate::modules::helpers::timing::Timing;
use crate::modules::models::car::Car;
use crate::modules::models::game::Game;
use crate::modules::models::lap_time::LapTime;
use crate::modules::models::track::Track;
use crate::modules::models::user::User;

/// one ranked row, derived at read time and never stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub position: i32,
    /// None for the leader, "+s.mmm" behind the leader otherwise.
    pub gap: Option<String>,
    pub time_formatted: String,
    pub time_ms: i32,
    pub user: UserRef,
    pub car: CarRef,
    pub car_class: Option<String>,
    pub weather: Option<String>,
    pub assists: Option<String>,
    pub verified: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub time_ms: i32,
    pub time_formatted: String,
    pub user: UserRef,
    pub car: CarRef,
    pub set_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView {
    pub game: Game,
    pub track: Track,
    pub leaderboard: Vec<LeaderboardRow>,
    pub track_record: Option<TrackRecord>,
    pub available_classes: Vec<String>,
}

/// # rank a set of lap time entries
/// expects the entries ordered ascending by time (ties by submission date then
/// id, the way `LapTime::for_board` returns them). each user is represented by
/// their best entry only; later entries of an already ranked user are skipped.
pub fn build_rows(
    entries: &[LapTime],
    users: &HashMap<i32, User>,
    cars: &HashMap<i32, Car>,
) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = Vec::new();
    let mut ranked_users: HashSet<i32> = HashSet::new();
    let mut leader_time: Option<i32> = None;

    for entry in entries {
        if !ranked_users.insert(entry.user_id) {
            continue;
        }

        let (user, car) = match (users.get(&entry.user_id), cars.get(&entry.car_id)) {
            (Some(user), Some(car)) => (user, car),
            _ => continue,
        };

        let gap = match leader_time {
            None => {
                leader_time = Some(entry.time_ms);
                None
            }
            Some(leader) => Some(Timing::format_gap(entry.time_ms - leader)),
        };

        rows.push(LeaderboardRow {
            position: rows.len() as i32 + 1,
            gap,
            time_formatted: Timing::format_lap_time(entry.time_ms),
            time_ms: entry.time_ms,
            user: user_ref(user),
            car: car_ref(car),
            car_class: entry.car_class.clone(),
            weather: entry.weather.clone(),
            assists: entry.assists.clone(),
            verified: entry.verified,
        });
    }

    rows
}

/// # assemble a leaderboard view
/// fetches the entries for the game/track (optionally one class), ranks them,
/// and derives the track record (verified entries only, ignoring the class
/// filter) and the class list.
pub fn assemble(
    conn: &mut PgConnection,
    game_id: i32,
    track_id: i32,
    class: Option<&str>,
) -> QueryResult<LeaderboardView> {
    let game = Game::get_by_id(conn, game_id)?;
    let track = Track::get_by_id(conn, track_id)?;

    let entries = LapTime::for_board(conn, game_id, track_id, class)?;
    let record_entry = LapTime::track_record(conn, game_id, track_id)?;

    let mut user_ids: Vec<i32> = entries.iter().map(|e| e.user_id).collect();
    let mut car_ids: Vec<i32> = entries.iter().map(|e| e.car_id).collect();
    if let Some(record) = &record_entry {
        user_ids.push(record.user_id);
        car_ids.push(record.car_id);
    }
    user_ids.sort_unstable();
    user_ids.dedup();
    car_ids.sort_unstable();
    car_ids.dedup();

    let users = User::as_map(User::from_ids(conn, &user_ids)?);
    let cars = Car::as_map(Car::from_ids(conn, &car_ids)?);

    let track_record = record_entry.and_then(|record| {
        let user = users.get(&record.user_id)?;
        let car = cars.get(&record.car_id)?;
        Some(TrackRecord {
            time_ms: record.time_ms,
            time_formatted: Timing::format_lap_time(record.time_ms),
            user: user_ref(user),
            car: car_ref(car),
            set_at: record.created_at,
        })
    });

    Ok(LeaderboardView {
        leaderboard: build_rows(&entries, &users, &cars),
        track_record,
        available_classes: LapTime::available_classes(conn, game_id, track_id)?,
        game,
        track,
    })
}

fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id,
        username: user.username.clone(),
        display_name: user.display_name.clone(),
    }
}

fn car_ref(car: &Car) -> CarRef {
    CarRef {
        id: car.id,
        name: car.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(seconds: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + chrono::Duration::seconds(seconds)
    }

    fn entry(id: i32, user_id: i32, time_ms: i32, seconds: i64) -> LapTime {
        LapTime {
            id,
            user_id,
            car_id: 1,
            track_id: 1,
            game_id: 1,
            time_ms,
            car_class: Some("GT3".to_string()),
            weather: None,
            assists: None,
            proof_url: None,
            setup_notes: None,
            verified: false,
            created_at: at(seconds),
        }
    }

    fn lookup_tables(user_ids: &[i32]) -> (HashMap<i32, User>, HashMap<i32, Car>) {
        let users = user_ids
            .iter()
            .map(|id| {
                (
                    *id,
                    User {
                        id: *id,
                        username: format!("driver{}", id),
                        display_name: format!("Driver {}", id),
                        created_at: at(0),
                    },
                )
            })
            .collect();

        let mut cars = HashMap::new();
        cars.insert(
            1,
            Car {
                id: 1,
                owner_id: 1,
                name: "992 GT3".to_string(),
                is_public: true,
                created_at: at(0),
            },
        );

        (users, cars)
    }

    #[test]
    fn ranks_ascending_with_gap_to_leader() {
        let entries = vec![entry(1, 1, 95_320, 0), entry(2, 2, 97_000, 10)];
        let (users, cars) = lookup_tables(&[1, 2]);

        let rows = build_rows(&entries, &users, &cars);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].gap, None);
        assert_eq!(rows[0].time_formatted, "1:35.320");
        assert_eq!(rows[1].position, 2);
        assert_eq!(rows[1].gap, Some("+1.680".to_string()));
    }

    #[test]
    fn positions_are_a_strict_1_based_sequence() {
        let entries = vec![
            entry(1, 1, 90_000, 0),
            entry(2, 2, 91_500, 5),
            entry(3, 3, 93_250, 9),
        ];
        let (users, cars) = lookup_tables(&[1, 2, 3]);

        let rows = build_rows(&entries, &users, &cars);

        for (index, row) in rows.iter().enumerate() {
            assert_eq!(row.position, index as i32 + 1);
            if index > 0 {
                assert!(row.time_ms >= rows[index - 1].time_ms);
                let expected = rows[index].time_ms - rows[0].time_ms;
                assert_eq!(row.gap, Some(Timing::format_gap(expected)));
            }
        }
    }

    #[test]
    fn only_a_users_best_entry_is_ranked() {
        // user 1 submitted twice, the slower run must not appear
        let entries = vec![
            entry(1, 1, 90_000, 0),
            entry(2, 2, 91_000, 2),
            entry(3, 1, 92_000, 4),
        ];
        let (users, cars) = lookup_tables(&[1, 2]);

        let rows = build_rows(&entries, &users, &cars);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user.id, 1);
        assert_eq!(rows[0].time_ms, 90_000);
        assert_eq!(rows[1].user.id, 2);
    }

    #[test]
    fn equal_times_keep_submission_order() {
        // for_board orders ties by created_at then id, build_rows must not
        // reorder them
        let entries = vec![entry(1, 1, 90_000, 0), entry(2, 2, 90_000, 60)];
        let (users, cars) = lookup_tables(&[1, 2]);

        let rows = build_rows(&entries, &users, &cars);

        assert_eq!(rows[0].user.id, 1);
        assert_eq!(rows[1].user.id, 2);
        assert_eq!(rows[1].gap, Some("+0.000".to_string()));
    }

    #[test]
    fn empty_board_has_no_rows() {
        let (users, cars) = lookup_tables(&[]);
        assert!(build_rows(&[], &users, &cars).is_empty());
    }
}
