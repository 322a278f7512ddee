use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("feed stream failed: {0}")]
    Stream(#[from] std::io::Error),

    #[error("replay contains no timesteps")]
    EmptyReplay,

    #[error("replay timestep {time} repeats entity id {id:?}")]
    DuplicateEntity { time: f64, id: String },
}

pub type FeedResult<T> = Result<T, FeedError>;
