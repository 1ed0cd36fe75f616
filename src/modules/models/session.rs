use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use serde::{Deserialize, Serialize};

use crate::schema::*;

use crate::modules::models::general::establish_connection;
use crate::modules::models::user::User;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct Session {
    pub id: i32,
    pub token: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

impl Session {
    /// # resolve a session token to its user
    /// session management itself lives outside this service, we only look the
    /// token up.
    pub fn user_for_token(conn: &mut PgConnection, token_in: &str) -> QueryResult<User> {
        use crate::schema::sessions::dsl::*;

        let session = sessions
            .filter(token.eq(token_in))
            .first::<Session>(conn)?;

        User::get_by_id(conn, session.user_id)
    }
}

/// request guard for routes that need a signed in user.
/// reads the X-Session-Token header, 401 when missing or unknown.
pub struct CurrentUser(pub User);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match request.headers().get_one("X-Session-Token") {
            Some(token) => token.to_string(),
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        // diesel blocks, keep it off the async workers
        let lookup = rocket::tokio::task::spawn_blocking(move || {
            let conn = &mut establish_connection();
            Session::user_for_token(conn, &token)
        })
        .await;

        match lookup {
            Ok(Ok(user)) => Outcome::Success(CurrentUser(user)),
            Ok(Err(_)) | Err(_) => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}
