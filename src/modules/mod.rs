pub mod feed;
pub mod leaderboard;
pub mod reconciler;
pub mod redis;

pub mod models {
    pub mod car;
    pub mod car_comment;
    pub mod car_generation;
    pub mod car_make;
    pub mod car_model;
    pub mod follow;
    pub mod game;
    pub mod lap_time;
    pub mod photo;
    pub mod post;
    pub mod rating;
    pub mod session;
    pub mod track;
    pub mod user;

    pub mod general;
}

pub mod helpers {
    pub mod logging;
    pub mod timing;

    pub mod fairings {
        pub mod cors;
    }
}
