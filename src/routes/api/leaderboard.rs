use rocket::get;
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::FromForm;

use crate::macros::database_error_handeler::db_handle_get_error_http;
use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::leaderboard::{self, LeaderboardView};
use crate::modules::models::general::establish_connection;
use crate::modules::redis::Redis;

#[derive(FromForm)]
pub struct LeaderboardParams {
    #[field(name = "gameId")]
    pub game_id: i32,
    #[field(name = "trackId")]
    pub track_id: i32,
    pub class: Option<String>,
}

/// # the ranked leaderboard for a game/track
/// 404 for an unknown game or track. cached until the next submission for the
/// tuple clears it.
#[get("/simracing/leaderboard?<params..>")]
pub fn board(params: LeaderboardParams, origin: &Origin) -> Result<Json<LeaderboardView>, Status> {
    read_cache_request!(origin);

    let conn = &mut establish_connection();
    let view = db_handle_get_error_http!(
        leaderboard::assemble(
            conn,
            params.game_id,
            params.track_id,
            params.class.as_deref()
        ),
        "routes/api/leaderboard:board",
        "leaderboard"
    );

    cache_response!(origin, view);
}
