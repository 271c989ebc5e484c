pub mod client;
pub mod error;
pub mod normalize;
pub mod store;
pub mod types;

pub use client::PromoClient;
pub use error::PromoError;
pub use normalize::normalize_promos;
pub use store::{FetchOutcome, FetchStatus, PromoState, PromoStore};
pub use types::{PromoMap, PromoRecord};
