use crate::core::fetch::Fetch;
use crate::domain::model::{Author, Post, Tag};
use async_trait::async_trait;

pub const DEFAULT_POSTS_LIMIT: u32 = 10;
pub const DEFAULT_TAG_POSTS_LIMIT: u32 = 20;
pub const DEFAULT_AUTHOR_POSTS_LIMIT: u32 = 10;
pub const DEFAULT_TAGS_LIMIT: u32 = 20;
pub const DEFAULT_AUTHORS_LIMIT: u32 = 20;
pub const DEFAULT_PAGE: u32 = 1;

/// Read-only access to CMS content. Every operation yields a value; failures
/// surface as [`Fetch::Fallback`] rather than as errors.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn list_posts(&self, limit: u32, page: u32, filter: Option<&str>) -> Fetch<Vec<Post>>;
    async fn get_post_by_slug(&self, slug: &str) -> Fetch<Option<Post>>;
    async fn list_posts_by_tag(&self, tag_slug: &str, limit: u32, page: u32) -> Fetch<Vec<Post>>;
    async fn list_tags(&self, limit: u32) -> Fetch<Vec<Tag>>;
    async fn get_tag_by_slug(&self, slug: &str) -> Fetch<Option<Tag>>;
    async fn list_authors(&self, limit: u32) -> Fetch<Vec<Author>>;
    async fn get_author_by_slug(&self, slug: &str) -> Fetch<Option<Author>>;
    async fn list_posts_by_author(
        &self,
        author_slug: &str,
        limit: u32,
        page: u32,
    ) -> Fetch<Vec<Post>>;
}
