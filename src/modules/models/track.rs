use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct Track {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
}

impl Track {
    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Track> {
        use crate::schema::tracks::dsl::*;
        tracks.filter(id.eq(id_in)).first::<Track>(conn)
    }

    pub fn exists(conn: &mut PgConnection, id_in: i32) -> QueryResult<bool> {
        use crate::schema::tracks::dsl::*;
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(tracks.filter(id.eq(id_in)))).get_result(conn)
    }
}
