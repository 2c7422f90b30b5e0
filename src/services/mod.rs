pub mod cache;
pub mod sentiment;
pub mod signals;

pub use cache::{Cache, CacheStore, NoCache};
pub use sentiment::{format_age, SentimentStore};
pub use signals::SignalStore;
