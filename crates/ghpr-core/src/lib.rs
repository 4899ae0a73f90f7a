pub mod aggregate;
pub mod error;
pub mod models;
pub mod pagination;
pub mod traits;

pub use aggregate::aggregate;
pub use error::{Result, ReviewError};
pub use models::*;
pub use pagination::{fetch_all_pages, get_max_results};
pub use traits::PullRequestSource;
