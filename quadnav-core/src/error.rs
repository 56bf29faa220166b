use thiserror::Error;

use crate::model::PlaceId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown place id: {0}")]
    UnknownPlace(PlaceId),
    #[error("no route between {start} and {end}")]
    NoRoute { start: PlaceId, end: PlaceId },
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
