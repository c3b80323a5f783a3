pub mod client;
pub mod fetch;
pub mod probe;

pub use crate::domain::model::{Author, Post, PostCount, Resource, Tag};
pub use crate::domain::ports::ContentSource;
pub use crate::utils::error::Result;
