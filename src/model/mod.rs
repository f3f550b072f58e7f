pub mod group;
pub mod item;
pub mod matcher;
pub mod merge;
pub mod parser;

pub use item::{Clipping, GroupedBook, Highlight, SyncRecord};
