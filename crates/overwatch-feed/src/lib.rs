//! Feed plumbing for OVERWATCH: replay files, the live message feed and
//! the transmission log. Nothing here touches track state.

pub mod demo;
pub mod error;
pub mod log;
pub mod message;
pub mod replay;

pub use error::{FeedError, FeedResult};
pub use log::{ConnectionStatus, MessageLog};
pub use message::{decode_message, FeedMessage, MessageCategory};
pub use replay::{load_replay, parse_replay};
