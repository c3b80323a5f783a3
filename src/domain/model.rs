use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ghost `count` include: `{ "posts": 12 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostCount {
    #[serde(default)]
    pub posts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Routing key; unique within the CMS.
    pub slug: String,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub feature_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub primary_author: Option<Author>,
    #[serde(default)]
    pub primary_tag: Option<Tag>,
    /// Estimated reading time in minutes.
    #[serde(default)]
    pub reading_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub feature_image: Option<String>,
    #[serde(default)]
    pub count: Option<PostCount>,
}

impl Tag {
    pub fn post_count(&self) -> Option<u32> {
        self.count.map(|c| c.posts)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub count: Option<PostCount>,
}

impl Author {
    pub fn post_count(&self) -> Option<u32> {
        self.count.map(|c| c.posts)
    }
}

/// Resources exposed by the content API, keyed by their envelope name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Posts,
    Tags,
    Authors,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Posts => "posts",
            Resource::Tags => "tags",
            Resource::Authors => "authors",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
