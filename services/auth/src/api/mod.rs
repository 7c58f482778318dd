//! API 层

mod extract;
pub mod http;

pub use extract::JsonBody;
