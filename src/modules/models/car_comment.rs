use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct CarComment {
    pub id: i32,
    pub user_id: i32,
    pub car_id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl CarComment {
    pub fn recent(conn: &mut PgConnection, window: i64) -> QueryResult<Vec<CarComment>> {
        use crate::schema::car_comments::dsl::*;
        car_comments
            .order(created_at.desc())
            .limit(window)
            .load::<CarComment>(conn)
    }

    pub fn recent_from_circle(
        conn: &mut PgConnection,
        user_ids: &[i32],
        car_ids: &[i32],
        window: i64,
    ) -> QueryResult<Vec<CarComment>> {
        use crate::schema::car_comments::dsl::*;
        car_comments
            .filter(
                user_id
                    .eq_any(user_ids.to_vec())
                    .or(car_id.eq_any(car_ids.to_vec())),
            )
            .order(created_at.desc())
            .limit(window)
            .load::<CarComment>(conn)
    }
}
