use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// domain errors that surface on the api with a short machine readable code.
#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("lap time must be a positive number of milliseconds"))]
    InvalidLapTime,

    #[snafu(display("unknown game: {id}"))]
    UnknownGame { id: i32 },

    #[snafu(display("unknown track: {id}"))]
    UnknownTrack { id: i32 },
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidLapTime => "invalid_lap_time",
            Error::UnknownGame { .. } => "unknown_game",
            Error::UnknownTrack { .. } => "unknown_track",
        }
    }
}

/// json body returned alongside a 4xx/5xx status.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    pub fn new(code: &str) -> ApiErrorBody {
        ApiErrorBody {
            error: code.to_string(),
        }
    }
}
