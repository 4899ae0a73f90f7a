pub mod comment;
pub mod pull_request;

pub use comment::*;
pub use pull_request::*;
