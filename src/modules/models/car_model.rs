use diesel::pg::PgConnection;
use diesel::prelude::*;
use inflections::Inflect;
use serde::{Deserialize, Serialize};

use crate::models::NewCarModel;
use crate::modules::models::car_make::CarMake;
use crate::schema::car_models;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct CarModel {
    pub id: i32,
    pub make_id: i32,
    pub name: String,
    pub slug: String,
}

impl CarModel {
    /// # create a model row
    /// used by the reconciler to materialize a canonical family row. the slug
    /// is derived from the name.
    pub fn new(conn: &mut PgConnection, make_id_in: i32, name_in: &str) -> QueryResult<CarModel> {
        let new_model = NewCarModel {
            make_id: make_id_in,
            name: name_in.to_string(),
            slug: name_in.to_kebab_case(),
        };

        diesel::insert_into(car_models::table)
            .values(&new_model)
            .get_result(conn)
    }

    pub fn from_make(conn: &mut PgConnection, make: &CarMake) -> QueryResult<Vec<CarModel>> {
        use crate::schema::car_models::dsl::*;
        car_models
            .filter(make_id.eq(make.id))
            .order(id.asc())
            .load::<CarModel>(conn)
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<CarModel>> {
        use crate::schema::car_models::dsl::*;
        car_models.order(id.asc()).load::<CarModel>(conn)
    }

    pub fn generation_count(&self, conn: &mut PgConnection) -> QueryResult<i64> {
        use crate::schema::car_generations::dsl::*;
        car_generations
            .filter(model_id.eq(self.id))
            .count()
            .get_result::<i64>(conn)
    }

    pub fn delete(&self, conn: &mut PgConnection) -> QueryResult<usize> {
        use crate::schema::car_models::dsl::*;
        diesel::delete(car_models.filter(id.eq(self.id))).execute(conn)
    }
}
