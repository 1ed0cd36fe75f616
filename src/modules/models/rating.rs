use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct Rating {
    pub id: i32,
    pub user_id: i32,
    pub car_id: i32,
    pub score: i32,
    pub created_at: NaiveDateTime,
}

impl Rating {
    pub fn recent(conn: &mut PgConnection, window: i64) -> QueryResult<Vec<Rating>> {
        use crate::schema::ratings::dsl::*;
        ratings
            .order(created_at.desc())
            .limit(window)
            .load::<Rating>(conn)
    }

    /// ratings given by a followed user or received by a followed car.
    pub fn recent_from_circle(
        conn: &mut PgConnection,
        user_ids: &[i32],
        car_ids: &[i32],
        window: i64,
    ) -> QueryResult<Vec<Rating>> {
        use crate::schema::ratings::dsl::*;
        ratings
            .filter(
                user_id
                    .eq_any(user_ids.to_vec())
                    .or(car_id.eq_any(car_ids.to_vec())),
            )
            .order(created_at.desc())
            .limit(window)
            .load::<Rating>(conn)
    }
}
