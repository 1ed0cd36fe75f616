use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct Game {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl Game {
    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Game> {
        use crate::schema::games::dsl::*;
        games.filter(id.eq(id_in)).first::<Game>(conn)
    }

    pub fn exists(conn: &mut PgConnection, id_in: i32) -> QueryResult<bool> {
        use crate::schema::games::dsl::*;
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(games.filter(id.eq(id_in)))).get_result(conn)
    }
}
