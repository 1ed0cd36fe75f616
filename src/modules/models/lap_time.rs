use std::thread;

use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use crate::schema::*;

use crate::macros::redis::clear_cache_pattern;
use crate::models::NewLapTime;
use crate::modules::redis::Redis;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct LapTime {
    pub id: i32,
    pub user_id: i32,
    pub car_id: i32,
    pub track_id: i32,
    pub game_id: i32,
    pub time_ms: i32,
    pub car_class: Option<String>,
    pub weather: Option<String>,
    pub assists: Option<String>,
    pub proof_url: Option<String>,
    pub setup_notes: Option<String>,
    pub verified: bool,
    pub created_at: NaiveDateTime,
}

impl LapTime {
    /************ INSERTERS ************/
    /// # Insert a new lap time into the database
    /// insert a new lap time submission from a NewLapTime object.
    /// cached leaderboard responses for the game/track go stale, so they are
    /// dropped in the background.
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `new_lap_time` - The new submission to insert
    ///
    /// ## Returns
    /// * `LapTime` - The inserted entry
    pub fn new(conn: &mut PgConnection, new_lap_time: NewLapTime) -> QueryResult<LapTime> {
        use crate::schema::lap_times::dsl::*;

        let lap_time: LapTime = match diesel::insert_into(lap_times)
            .values(&new_lap_time)
            .get_result::<LapTime>(conn)
        {
            Ok(lap_time) => lap_time,
            Err(error) => {
                error!(target:"models/lap_time:new", "Error inserting new lap time: {}", error);
                return Err(error);
            }
        };

        thread::spawn(move || {
            let r_conn = &mut match Redis::connect() {
                Ok(rc) => rc,
                Err(error) => {
                    error!(target:"models/lap_time:new", "Error connecting to redis: {}", error);
                    return;
                }
            };

            clear_cache_pattern!(r_conn, "/api/simracing/leaderboard*", "models/lap_time:new");
        });

        Ok(lap_time)
    }

    /************ GETTERS ************/
    /// # get the entries behind a leaderboard
    /// all lap times for a game/track tuple, optionally narrowed to one car
    /// class, ordered ascending by elapsed time. ties on time order by
    /// submission date then id so the ranking is deterministic.
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `game_id_in` - The game to rank
    /// * `track_id_in` - The track to rank
    /// * `class_in` - Optional car class filter
    ///
    /// ## Returns
    /// * `Vec<LapTime>` - The matching entries, fastest first
    pub fn for_board(
        conn: &mut PgConnection,
        game_id_in: i32,
        track_id_in: i32,
        class_in: Option<&str>,
    ) -> QueryResult<Vec<LapTime>> {
        use crate::schema::lap_times::dsl::*;

        let mut query = lap_times
            .filter(game_id.eq(game_id_in))
            .filter(track_id.eq(track_id_in))
            .into_boxed();

        if let Some(class) = class_in {
            query = query.filter(car_class.eq(class.to_string()));
        }

        query
            .order((time_ms.asc(), created_at.asc(), id.asc()))
            .load::<LapTime>(conn)
    }

    /// # get the track record
    /// the single fastest verified entry for the game/track, independent of
    /// any class filter. None when nothing verified exists yet.
    pub fn track_record(
        conn: &mut PgConnection,
        game_id_in: i32,
        track_id_in: i32,
    ) -> QueryResult<Option<LapTime>> {
        use crate::schema::lap_times::dsl::*;

        lap_times
            .filter(game_id.eq(game_id_in))
            .filter(track_id.eq(track_id_in))
            .filter(verified.eq(true))
            .order((time_ms.asc(), created_at.asc(), id.asc()))
            .first::<LapTime>(conn)
            .optional()
    }

    /// distinct non-null classes present among the entries for a game/track.
    pub fn available_classes(
        conn: &mut PgConnection,
        game_id_in: i32,
        track_id_in: i32,
    ) -> QueryResult<Vec<String>> {
        use crate::schema::lap_times::dsl::*;

        let classes: Vec<Option<String>> = lap_times
            .filter(game_id.eq(game_id_in))
            .filter(track_id.eq(track_id_in))
            .select(car_class)
            .distinct()
            .load::<Option<String>>(conn)?;

        let mut classes: Vec<String> = classes.into_iter().flatten().collect();
        classes.sort();
        Ok(classes)
    }
}
