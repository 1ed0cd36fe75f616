use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct Car {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
}

impl Car {
    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Car> {
        use crate::schema::cars::dsl::*;
        cars.filter(id.eq(id_in)).first::<Car>(conn)
    }

    pub fn from_ids(conn: &mut PgConnection, ids_in: &[i32]) -> QueryResult<Vec<Car>> {
        use crate::schema::cars::dsl::*;
        cars.filter(id.eq_any(ids_in.to_vec())).load::<Car>(conn)
    }

    /// # newest public garage additions
    /// newest first, bounded window. feeds the "added a car" feed source.
    pub fn recent_public(conn: &mut PgConnection, window: i64) -> QueryResult<Vec<Car>> {
        use crate::schema::cars::dsl::*;
        cars.filter(is_public.eq(true))
            .order(created_at.desc())
            .limit(window)
            .load::<Car>(conn)
    }

    /// # newest public cars inside a follow circle
    /// a car is in the circle when its owner is followed or the car itself is.
    pub fn recent_from_circle(
        conn: &mut PgConnection,
        owner_ids: &[i32],
        car_ids: &[i32],
        window: i64,
    ) -> QueryResult<Vec<Car>> {
        use crate::schema::cars::dsl::*;
        cars.filter(is_public.eq(true))
            .filter(
                owner_id
                    .eq_any(owner_ids.to_vec())
                    .or(id.eq_any(car_ids.to_vec())),
            )
            .order(created_at.desc())
            .limit(window)
            .load::<Car>(conn)
    }

    pub fn as_map(cars_in: Vec<Car>) -> HashMap<i32, Car> {
        cars_in.into_iter().map(|c| (c.id, c)).collect()
    }
}
