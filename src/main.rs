use rocket::{Build, Rocket};

use motoverse::modules::helpers::fairings::cors::CORS;
use motoverse::modules::helpers::logging::setup_logging;
use motoverse::routes::api;

#[macro_use]
extern crate rocket;

#[launch]
fn rocket() -> Rocket<Build> {
    setup_logging().expect("Failed to setup logging");

    rocket::build().attach(CORS).mount(
        "/api",
        routes![
            // feed
            api::feed::global,
            api::feed::following,
            // sim racing
            api::leaderboard::board,
            api::laptime::submit,
        ],
    )
}
