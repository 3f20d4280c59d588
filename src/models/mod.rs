pub mod asset;
pub mod order;

pub use asset::{KeyMatches, LocatedAsset, SearchKey};
pub use order::{AdvancedOptions, LineItem, Order, OrderList};
