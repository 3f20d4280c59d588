pub mod asset_fetcher;
pub mod asset_locator;
pub mod key_derivation;

pub use asset_fetcher::{output_file_name, sanitize_key, AssetFetcher, FailedItem, FetchReport};
pub use asset_locator::AssetLocator;
pub use key_derivation::derive_search_keys;
