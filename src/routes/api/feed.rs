use rocket::get;
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::FromForm;

use crate::macros::database_error_handeler::db_handle_get_error_http;
use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::feed::{self, FeedPage, FeedQuery, FeedType};
use crate::modules::models::general::establish_connection;
use crate::modules::models::session::CurrentUser;
use crate::modules::redis::Redis;

/// nothing invalidates feed responses (posts, cars and the rest are written
/// by other services), so cached pages expire on their own instead of being
/// cleared by a writer.
pub const FEED_CACHE_TTL_SECONDS: usize = 60;

#[derive(FromForm)]
pub struct FeedParams {
    #[field(name = "type")]
    pub feed_type: Option<String>,
    pub q: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// # the global activity feed
/// every public source merged newest first, optionally narrowed by type and
/// free text search, paginated by cursor.
#[get("/feed?<params..>")]
pub fn global(params: FeedParams, origin: &Origin) -> Result<Json<FeedPage>, Status> {
    read_cache_request!(origin);

    let conn = &mut establish_connection();
    let query = FeedQuery {
        feed_type: FeedType::from_param(params.feed_type.as_deref()),
        search: params.q,
        cursor: params.cursor,
        limit: feed::clamp_limit(params.limit),
    };

    let page = db_handle_get_error_http!(
        feed::global_feed(conn, &query),
        "routes/api/feed:global",
        "feed"
    );

    cache_response!(origin, page, FEED_CACHE_TTL_SECONDS);
}

/// # the following-only feed
/// requires a signed in viewer, 401 otherwise. per viewer, so never cached.
#[get("/feed/following?<limit>")]
pub fn following(user: CurrentUser, limit: Option<i64>) -> Result<Json<FeedPage>, Status> {
    let conn = &mut establish_connection();

    let page = db_handle_get_error_http!(
        feed::following_feed(conn, user.0.id, feed::clamp_limit(limit)),
        "routes/api/feed:following",
        "following feed"
    );

    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_cache_entries_carry_an_expiry() {
        // a zero ttl would make SETEX fail and the key would never be stored
        assert!(FEED_CACHE_TTL_SECONDS > 0);
        assert!(FEED_CACHE_TTL_SECONDS <= 300);
    }
}
