use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub content: String,
    pub like_count: i32,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
}

impl Post {
    pub fn recent_public(conn: &mut PgConnection, window: i64) -> QueryResult<Vec<Post>> {
        use crate::schema::posts::dsl::*;
        posts
            .filter(is_public.eq(true))
            .order(created_at.desc())
            .limit(window)
            .load::<Post>(conn)
    }

    pub fn recent_by_authors(
        conn: &mut PgConnection,
        author_ids: &[i32],
        window: i64,
    ) -> QueryResult<Vec<Post>> {
        use crate::schema::posts::dsl::*;
        posts
            .filter(is_public.eq(true))
            .filter(author_id.eq_any(author_ids.to_vec()))
            .order(created_at.desc())
            .limit(window)
            .load::<Post>(conn)
    }
}
