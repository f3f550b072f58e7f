pub mod blocks;
pub mod covers;
pub mod notion;
pub mod sync;

pub use crate::client::covers::CoverClient;
pub use crate::client::notion::NotionClient;
