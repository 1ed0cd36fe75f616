use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

use crate::modules::models::car_model::CarModel;

#[derive(
    Queryable, Serialize, Associations, Identifiable, PartialEq, Debug, Clone, Deserialize,
)]
#[diesel(belongs_to(CarModel, foreign_key = model_id))]
pub struct CarGeneration {
    pub id: i32,
    pub model_id: i32,
    pub name: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl CarGeneration {
    pub fn from_model(conn: &mut PgConnection, model: &CarModel) -> QueryResult<Vec<CarGeneration>> {
        use crate::schema::car_generations::dsl::id;
        CarGeneration::belonging_to(model)
            .order(id.asc())
            .load::<CarGeneration>(conn)
    }

    /// # move a generation onto another model
    /// only the owning-model foreign key (and on collision the name) change,
    /// the row id is preserved.
    pub fn reparent(
        &self,
        conn: &mut PgConnection,
        new_model_id: i32,
        new_name: Option<&str>,
    ) -> QueryResult<usize> {
        use crate::schema::car_generations::dsl::*;

        match new_name {
            Some(renamed) => diesel::update(car_generations.filter(id.eq(self.id)))
                .set((model_id.eq(new_model_id), name.eq(renamed.to_string())))
                .execute(conn),
            None => diesel::update(car_generations.filter(id.eq(self.id)))
                .set(model_id.eq(new_model_id))
                .execute(conn),
        }
    }
}
