use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct UserFollow {
    pub id: i32,
    pub follower_id: i32,
    pub followed_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct CarFollow {
    pub id: i32,
    pub follower_id: i32,
    pub car_id: i32,
    pub created_at: NaiveDateTime,
}

impl UserFollow {
    /// ids of the users the viewer follows.
    pub fn followed_user_ids(conn: &mut PgConnection, viewer_id: i32) -> QueryResult<Vec<i32>> {
        use crate::schema::user_follows::dsl::*;
        user_follows
            .filter(follower_id.eq(viewer_id))
            .select(followed_id)
            .load::<i32>(conn)
    }
}

impl CarFollow {
    /// ids of the cars the viewer follows.
    pub fn followed_car_ids(conn: &mut PgConnection, viewer_id: i32) -> QueryResult<Vec<i32>> {
        use crate::schema::car_follows::dsl::*;
        car_follows
            .filter(follower_id.eq(viewer_id))
            .select(car_id)
            .load::<i32>(conn)
    }
}
