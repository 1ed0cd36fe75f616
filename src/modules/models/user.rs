use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<User> {
        use crate::schema::users::dsl::*;
        users.filter(id.eq(id_in)).first::<User>(conn)
    }

    /// # get users by ids
    /// batch lookup used to denormalize author names into derived views.
    pub fn from_ids(conn: &mut PgConnection, ids_in: &[i32]) -> QueryResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        users
            .filter(id.eq_any(ids_in.to_vec()))
            .load::<User>(conn)
    }

    pub fn as_map(users_in: Vec<User>) -> HashMap<i32, User> {
        users_in.into_iter().map(|u| (u.id, u)).collect()
    }
}
