use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = lap_times)]
pub struct NewLapTime {
    pub user_id: i32,
    pub car_id: i32,
    pub track_id: i32,
    pub game_id: i32,
    pub time_ms: i32,
    pub car_class: Option<String>,
    pub weather: Option<String>,
    pub assists: Option<String>,
    pub proof_url: Option<String>,
    pub setup_notes: Option<String>,
    pub verified: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = car_models)]
pub struct NewCarModel {
    pub make_id: i32,
    pub name: String,
    pub slug: String,
}
