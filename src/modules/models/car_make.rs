use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct CarMake {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl CarMake {
    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<CarMake>> {
        use crate::schema::car_makes::dsl::*;
        car_makes.order(name.asc()).load::<CarMake>(conn)
    }
}
