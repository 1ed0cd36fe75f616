pub mod models;

pub mod schema;
pub mod errors;
pub mod modules;

pub mod macros {
    pub mod database_error_handeler;
    pub mod redis;
    pub mod request_caching;
}

pub mod routes {
    pub mod api {
        pub mod feed;
        pub mod laptime;
        pub mod leaderboard;
    }
}
