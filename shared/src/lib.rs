pub mod backend;
pub mod config;
pub mod error;
pub mod feed;

pub use backend::BackendClient;
pub use config::Config;
pub use error::FetchError;
pub use feed::{PriceBook, PriceFeedClient};
