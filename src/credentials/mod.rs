//! 凭证加载
//!
//! 两个凭证文件都在发起任何远程请求之前检查完毕。

pub mod key_file;
pub mod oauth;

pub use key_file::{load_api_keys, ApiKeys, KEY_FILE_TEMPLATE};
pub use oauth::{
    load_client_secret, AccessTokenProvider, InstalledFlowTokenProvider, StaticTokenProvider,
};
