use crate::core::fetch::Fetch;
use crate::domain::model::{Author, Post, Tag};
use crate::domain::ports::{
    ContentSource, DEFAULT_AUTHORS_LIMIT, DEFAULT_AUTHOR_POSTS_LIMIT, DEFAULT_PAGE,
    DEFAULT_POSTS_LIMIT, DEFAULT_TAGS_LIMIT, DEFAULT_TAG_POSTS_LIMIT,
};
use serde::Serialize;

pub const FEATURED_FILTER: &str = "featured:true";
pub const NEWS_TAG: &str = "news";
pub const TECHNOLOGY_TAG: &str = "technology";

/// Outcome of resolving a routed page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Page<T> {
    Found(T),
    /// The content lives under another path; the caller should redirect.
    Redirect(String),
    NotFound,
}

impl<T> Page<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Page::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub featured_posts: Vec<Post>,
    pub news_posts: Vec<Post>,
    pub tech_posts: Vec<Post>,
    pub tags: Vec<Tag>,
    /// True when any section was filled from a fallback.
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagPage {
    pub tag: Tag,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorPage {
    pub author: Author,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugSnapshot {
    pub posts: Vec<Post>,
    pub tags: Vec<Tag>,
    pub authors: Vec<Author>,
    pub errors: Vec<String>,
}

/// Gathers the data each site page needs from a [`ContentSource`].
pub struct SiteService<C: ContentSource> {
    source: C,
}

impl<C: ContentSource> SiteService<C> {
    pub fn new(source: C) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub async fn home(&self) -> HomePage {
        let featured = self
            .source
            .list_posts(5, DEFAULT_PAGE, Some(FEATURED_FILTER))
            .await;

        let mut news = self.source.list_posts_by_tag(NEWS_TAG, 6, DEFAULT_PAGE).await;
        let news_tag_failed = news.is_fallback();
        if news.value().is_empty() {
            tracing::debug!("No '{}' posts, falling back to latest posts", NEWS_TAG);
            news = self.source.list_posts(6, DEFAULT_PAGE, None).await;
        }

        let tech = self
            .source
            .list_posts_by_tag(TECHNOLOGY_TAG, 3, DEFAULT_PAGE)
            .await;
        let tags = self.source.list_tags(6).await;

        // a failed news-tag fetch still counts even when latest posts filled the section
        let degraded = news_tag_failed
            || featured.is_fallback()
            || news.is_fallback()
            || tech.is_fallback()
            || tags.is_fallback();
        if degraded {
            tracing::warn!("⚠️ Home page rendered with missing sections");
        }

        HomePage {
            featured_posts: featured.into_value(),
            news_posts: news.into_value(),
            tech_posts: tech.into_value(),
            tags: tags.into_value(),
            degraded,
        }
    }

    pub async fn post(&self, slug: &str) -> Page<Post> {
        match self.source.get_post_by_slug(slug).await.into_value() {
            Some(post) => Page::Found(post),
            None => Page::NotFound,
        }
    }

    /// Some CMS instances store tag slugs with a trailing slash. When the bare
    /// slug misses but `slug/` exists, the caller is told to redirect.
    pub async fn tag(&self, slug: &str) -> Page<TagPage> {
        tracing::info!("Rendering tag page for slug: \"{}\"", slug);

        let tag = match self.source.get_tag_by_slug(slug).await.into_value() {
            Some(tag) => tag,
            None => {
                tracing::info!("Tag not found for slug: \"{}\"", slug);
                let with_slash = format!("{}/", slug);
                if self
                    .source
                    .get_tag_by_slug(&with_slash)
                    .await
                    .into_value()
                    .is_some()
                {
                    tracing::info!("Found tag with trailing slash: \"{}\"", with_slash);
                    return Page::Redirect(format!("/tag/{}/", slug));
                }
                return Page::NotFound;
            }
        };

        let posts = self
            .source
            .list_posts_by_tag(&tag.slug, DEFAULT_TAG_POSTS_LIMIT, DEFAULT_PAGE)
            .await
            .into_value();
        tracing::info!("Found {} posts for tag: {}", posts.len(), tag.name);

        Page::Found(TagPage { tag, posts })
    }

    pub async fn author(&self, slug: &str) -> Page<AuthorPage> {
        let Some(author) = self.source.get_author_by_slug(slug).await.into_value() else {
            return Page::NotFound;
        };

        let posts = self
            .source
            .list_posts_by_author(&author.slug, DEFAULT_AUTHOR_POSTS_LIMIT, DEFAULT_PAGE)
            .await
            .into_value();

        Page::Found(AuthorPage { author, posts })
    }

    pub async fn debug_snapshot(&self) -> DebugSnapshot {
        let posts = self.source.list_posts(DEFAULT_POSTS_LIMIT, DEFAULT_PAGE, None).await;
        let tags = self.source.list_tags(DEFAULT_TAGS_LIMIT).await;
        let authors = self.source.list_authors(DEFAULT_AUTHORS_LIMIT).await;

        let mut errors = Vec::new();
        collect_error("posts", &posts, &mut errors);
        collect_error("tags", &tags, &mut errors);
        collect_error("authors", &authors, &mut errors);

        DebugSnapshot {
            posts: posts.into_value(),
            tags: tags.into_value(),
            authors: authors.into_value(),
            errors,
        }
    }
}

fn collect_error<T>(label: &str, fetch: &Fetch<T>, errors: &mut Vec<String>) {
    if let Some(cause) = fetch.cause() {
        errors.push(format!("{}: {}", label, cause));
    }
}
