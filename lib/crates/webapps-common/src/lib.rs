pub mod meta;
pub mod types;

pub use meta::{AppMeta, MetaPatch, Options};
pub use types::*;
