pub use comments::{ANONYMOUS_NAME, COMMENT_MAX_LEN, Comment};
pub use complaints::{Complaint, ComplaintDraft, ComplaintStatus};
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, Statistics};

mod categories;
mod comments;
mod complaints;
mod error;
mod images;
mod locations;
mod ops;
mod support;

type ResultEngine<T> = Result<T, EngineError>;
