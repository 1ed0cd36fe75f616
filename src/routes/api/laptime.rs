use log::{error, warn};
use rocket::http::Status;
use rocket::post;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Deserialize;

use crate::errors::{ApiErrorBody, Error};
use crate::models::NewLapTime;
use crate::modules::models::game::Game;
use crate::modules::models::general::establish_connection;
use crate::modules::models::lap_time::LapTime;
use crate::modules::models::session::CurrentUser;
use crate::modules::models::track::Track;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LapTimeSubmission {
    pub game_id: i32,
    pub track_id: i32,
    pub car_id: i32,
    pub time_ms: i32,
    pub car_class: Option<String>,
    pub weather: Option<String>,
    pub assists: Option<String>,
    pub proof_url: Option<String>,
    pub setup_notes: Option<String>,
}

type ApiError = Custom<Json<ApiErrorBody>>;

fn bad_request(error: &Error) -> ApiError {
    Custom(Status::BadRequest, Json(ApiErrorBody::new(error.code())))
}

fn server_error() -> ApiError {
    Custom(
        Status::InternalServerError,
        Json(ApiErrorBody::new("internal_error")),
    )
}

/// # submit a lap time
/// authenticated. validated server side regardless of what the client already
/// checked: the time must be positive and the game/track must exist. the
/// entry starts unverified.
#[post("/simracing/laptimes", data = "<submission>")]
pub fn submit(
    user: CurrentUser,
    submission: Json<LapTimeSubmission>,
) -> Result<Custom<Json<LapTime>>, ApiError> {
    let submission = submission.into_inner();

    if submission.time_ms < 1 {
        let rejected = Error::InvalidLapTime;
        warn!(target:"routes/api/laptime:submit", "rejected submission: {}", rejected);
        return Err(bad_request(&rejected));
    }

    let conn = &mut establish_connection();

    match Game::exists(conn, submission.game_id) {
        Ok(true) => {}
        Ok(false) => {
            return Err(bad_request(&Error::UnknownGame {
                id: submission.game_id,
            }))
        }
        Err(error) => {
            error!(target:"routes/api/laptime:submit", "Error checking game. (error: {})", error);
            return Err(server_error());
        }
    }

    match Track::exists(conn, submission.track_id) {
        Ok(true) => {}
        Ok(false) => {
            return Err(bad_request(&Error::UnknownTrack {
                id: submission.track_id,
            }))
        }
        Err(error) => {
            error!(target:"routes/api/laptime:submit", "Error checking track. (error: {})", error);
            return Err(server_error());
        }
    }

    let new_lap_time = NewLapTime {
        user_id: user.0.id,
        car_id: submission.car_id,
        track_id: submission.track_id,
        game_id: submission.game_id,
        time_ms: submission.time_ms,
        car_class: submission.car_class,
        weather: submission.weather,
        assists: submission.assists,
        proof_url: submission.proof_url,
        setup_notes: submission.setup_notes,
        verified: false,
        created_at: chrono::Utc::now().naive_utc(),
    };

    match LapTime::new(conn, new_lap_time) {
        Ok(entry) => Ok(Custom(Status::Created, Json(entry))),
        Err(error) => {
            error!(target:"routes/api/laptime:submit", "Error saving lap time. (error: {})", error);
            Err(server_error())
        }
    }
}
