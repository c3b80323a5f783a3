use crate::config::GhostConfig;
use crate::core::fetch::Fetch;
use crate::domain::model::{Author, Post, Resource, Tag};
use crate::domain::ports::ContentSource;
use crate::utils::error::{ErrorCategory, GhostError, Result};
use crate::utils::validation::validate_slug;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const POST_INCLUDE: &str = "tags,authors";
pub const COUNT_INCLUDE: &str = "count.posts";
pub const POST_LIST_FIELDS: &str =
    "id,title,slug,html,excerpt,feature_image,published_at,updated_at,reading_time";
pub const TAG_POST_FIELDS: &str =
    "id,title,slug,feature_image,published_at,excerpt,primary_tag,primary_author,reading_time";

/// 移除結尾的斜線（只移除一個）
pub fn clean_slug(slug: &str) -> &str {
    slug.strip_suffix('/').unwrap_or(slug)
}

/// Ghost Content API client.
///
/// Cheap to clone: the connection pool and config are shared, nothing is
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct GhostClient {
    config: GhostConfig,
    client: Client,
}

impl GhostClient {
    pub fn new(config: GhostConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GhostConfig::from_env())
    }

    pub fn config(&self) -> &GhostConfig {
        &self.config
    }

    /// `<api_base>/<endpoint>/`, then `key` (when configured), then `params`
    /// in the given order.
    pub fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url> {
        self.url_for(&[endpoint], params)
    }

    /// `<api_base>/<resource>/slug/<slug>/`; the slug is one percent-encoded
    /// path segment, so `?`, `#` and `/` inside it stay part of the slug.
    pub fn build_slug_url(
        &self,
        resource: Resource,
        slug: &str,
        params: &[(&str, String)],
    ) -> Result<Url> {
        self.url_for(&[resource.as_str(), "slug", slug], params)
    }

    fn url_for(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Url> {
        let base = format!("{}/", self.config.api_base());
        let mut url = Url::parse(&base)?;

        url.path_segments_mut()
            .map_err(|_| GhostError::InvalidConfigValueError {
                field: "api_url".to_string(),
                value: self.config.api_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments)
            .push("");

        if self.config.has_api_key() || !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if self.config.has_api_key() {
                pairs.append_pair("key", &self.config.content_api_key);
            }
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        tracing::debug!("🔗 Building URL: {}", redacted(&url));
        Ok(url)
    }

    async fn request_envelope<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: Resource,
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        tracing::debug!("📡 API response status: {}", response.status());

        let status = response.status();
        if !status.is_success() {
            return Err(GhostError::Status {
                status: status.as_u16(),
                url: redacted(&url),
            });
        }

        let body = response.text().await?;
        decode_envelope(&body, resource)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        params: &[(&str, String)],
        context: &str,
    ) -> Fetch<Vec<T>> {
        let result = match self.build_url(resource.as_str(), params) {
            Ok(url) => self.request_envelope::<T>(url, resource).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(items) => {
                tracing::debug!("📥 Received {} {} for {}", items.len(), resource, context);
                Fetch::Fetched(items)
            }
            Err(e) => {
                tracing::warn!("❌ Error fetching {}: {}", context, e);
                Fetch::fallback(e)
            }
        }
    }

    async fn fetch_by_slug<T: DeserializeOwned>(
        &self,
        resource: Resource,
        slug: &str,
        params: &[(&str, String)],
    ) -> Fetch<Option<T>> {
        // no CMS slug can be empty or a dot segment; answering without a
        // request keeps `..` from resolving to the list endpoint
        if let Err(e) = validate_slug("slug", slug) {
            tracing::debug!("🔍 {} lookup skipped: {}", resource, e);
            return Fetch::Fetched(None);
        }

        let result = match self.build_slug_url(resource, slug, params) {
            Ok(url) => self.request_envelope::<T>(url, resource).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(items) => {
                let found = items.into_iter().next();
                if found.is_none() {
                    tracing::debug!("🔍 {} '{}' not found", resource, slug);
                }
                Fetch::Fetched(found)
            }
            Err(e) if e.category() == ErrorCategory::NotFound => {
                tracing::debug!("🔍 {} '{}' not found", resource, slug);
                Fetch::Fetched(None)
            }
            Err(e) => {
                tracing::warn!("❌ Error fetching {} '{}': {}", resource, slug, e);
                Fetch::fallback(e)
            }
        }
    }
}

#[async_trait]
impl ContentSource for GhostClient {
    async fn list_posts(&self, limit: u32, page: u32, filter: Option<&str>) -> Fetch<Vec<Post>> {
        let mut params = vec![
            ("limit", limit.to_string()),
            ("page", page.to_string()),
            ("include", POST_INCLUDE.to_string()),
            ("fields", POST_LIST_FIELDS.to_string()),
        ];
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            params.push(("filter", filter.to_string()));
        }

        tracing::info!(
            "Fetching posts with limit: {}, page: {}, filter: {}",
            limit,
            page,
            filter.unwrap_or("none")
        );
        self.fetch_list(Resource::Posts, &params, "posts").await
    }

    async fn get_post_by_slug(&self, slug: &str) -> Fetch<Option<Post>> {
        let params = [("include", POST_INCLUDE.to_string())];
        self.fetch_by_slug(Resource::Posts, slug, &params).await
    }

    async fn list_posts_by_tag(&self, tag_slug: &str, limit: u32, page: u32) -> Fetch<Vec<Post>> {
        let slug = clean_slug(tag_slug);
        let params = [
            ("limit", limit.to_string()),
            ("page", page.to_string()),
            ("filter", format!("tag:{}", slug)),
            ("include", POST_INCLUDE.to_string()),
            ("fields", TAG_POST_FIELDS.to_string()),
        ];

        tracing::info!("Fetching posts for tag '{}'", slug);
        self.fetch_list(Resource::Posts, &params, &format!("posts tagged '{}'", slug))
            .await
    }

    async fn list_tags(&self, limit: u32) -> Fetch<Vec<Tag>> {
        let params = [
            ("limit", limit.to_string()),
            ("include", COUNT_INCLUDE.to_string()),
        ];
        self.fetch_list(Resource::Tags, &params, "tags").await
    }

    async fn get_tag_by_slug(&self, slug: &str) -> Fetch<Option<Tag>> {
        let slug = clean_slug(slug);
        let params = [("include", COUNT_INCLUDE.to_string())];

        let result = self.fetch_by_slug::<Tag>(Resource::Tags, slug, &params).await;
        if let Some(tag) = result.value() {
            tracing::info!("Found tag '{}': {}", slug, tag.name);
        }
        result
    }

    async fn list_authors(&self, limit: u32) -> Fetch<Vec<Author>> {
        let params = [
            ("limit", limit.to_string()),
            ("include", COUNT_INCLUDE.to_string()),
        ];
        self.fetch_list(Resource::Authors, &params, "authors").await
    }

    async fn get_author_by_slug(&self, slug: &str) -> Fetch<Option<Author>> {
        let params = [("include", COUNT_INCLUDE.to_string())];
        self.fetch_by_slug(Resource::Authors, slug, &params).await
    }

    async fn list_posts_by_author(
        &self,
        author_slug: &str,
        limit: u32,
        page: u32,
    ) -> Fetch<Vec<Post>> {
        let params = [
            ("limit", limit.to_string()),
            ("page", page.to_string()),
            ("filter", format!("author:{}", author_slug)),
            ("include", POST_INCLUDE.to_string()),
        ];
        self.fetch_list(
            Resource::Posts,
            &params,
            &format!("posts by author '{}'", author_slug),
        )
        .await
    }
}

/// 解開 `{ "<resource>": [...] }` 外層
pub fn decode_envelope<T: DeserializeOwned>(body: &str, resource: Resource) -> Result<Vec<T>> {
    let mut value: serde_json::Value = serde_json::from_str(body)?;

    let items = value
        .get_mut(resource.as_str())
        .map(serde_json::Value::take)
        .filter(serde_json::Value::is_array)
        .ok_or_else(|| GhostError::Envelope {
            key: resource.as_str().to_string(),
        })?;

    Ok(serde_json::from_value(items)?)
}

/// URL for logs and error messages, with the API key masked.
pub(crate) fn redacted(url: &Url) -> String {
    if !url.query_pairs().any(|(name, _)| name == "key") {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_key(key: &str) -> GhostClient {
        GhostClient::new(GhostConfig::new("http://cms.test/").with_content_api_key(key)).unwrap()
    }

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_clean_slug() {
        assert_eq!(clean_slug("news/"), "news");
        assert_eq!(clean_slug("news"), "news");
        assert_eq!(clean_slug("news//"), "news/");
        assert_eq!(clean_slug(""), "");
    }

    #[test]
    fn test_build_url_key_first_then_params_in_order() {
        let client = client_with_key("abc123");
        let url = client
            .build_url(
                "posts",
                &[("limit", "5".to_string()), ("page", "2".to_string())],
            )
            .unwrap();

        assert_eq!(url.path(), "/ghost/api/content/posts/");
        assert_eq!(
            query(&url),
            vec![
                ("key".to_string(), "abc123".to_string()),
                ("limit".to_string(), "5".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_url_without_key() {
        let client = client_with_key("");
        let url = client
            .build_url("tags", &[("limit", "20".to_string())])
            .unwrap();

        assert!(query(&url).iter().all(|(k, _)| k != "key"));
        assert_eq!(url.as_str(), "http://cms.test/ghost/api/content/tags/?limit=20");
    }

    #[test]
    fn test_build_url_without_any_params_has_no_query() {
        let client = client_with_key("");
        let url = client.build_slug_url(Resource::Authors, "ada", &[]).unwrap();
        assert_eq!(url.as_str(), "http://cms.test/ghost/api/content/authors/slug/ada/");
    }

    #[test]
    fn test_build_slug_url_encodes_reserved_characters() {
        let client = client_with_key("abc123");
        let url = client
            .build_slug_url(
                Resource::Tags,
                "news?draft",
                &[("include", COUNT_INCLUDE.to_string())],
            )
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://cms.test/ghost/api/content/tags/slug/news%3Fdraft/?key=abc123&include=count.posts"
        );

        let nested = client_with_key("")
            .build_slug_url(Resource::Posts, "a/b#c", &[])
            .unwrap();
        assert_eq!(nested.path(), "/ghost/api/content/posts/slug/a%2Fb%23c/");
        assert_eq!(nested.query(), None);
    }

    #[test]
    fn test_build_url_keeps_origin_path_prefix() {
        let client =
            GhostClient::new(GhostConfig::new("http://cms.test/blog/")).unwrap();
        let url = client.build_url("posts", &[]).unwrap();
        assert_eq!(url.as_str(), "http://cms.test/blog/ghost/api/content/posts/");
    }

    #[test]
    fn test_build_url_encodes_filter() {
        let client = client_with_key("");
        let url = client
            .build_url("posts", &[("filter", "tag:news".to_string())])
            .unwrap();
        assert_eq!(query(&url), vec![("filter".to_string(), "tag:news".to_string())]);
    }

    #[test]
    fn test_decode_envelope() {
        let body = r#"{"tags":[{"id":"1","name":"News","slug":"news"}],"meta":{}}"#;
        let tags: Vec<Tag> = decode_envelope(body, Resource::Tags).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].slug, "news");
    }

    #[test]
    fn test_decode_envelope_wrong_key() {
        let body = r#"{"posts":[]}"#;
        let err = decode_envelope::<Tag>(body, Resource::Tags).unwrap_err();
        assert!(matches!(err, GhostError::Envelope { ref key } if key == "tags"));
    }

    #[test]
    fn test_decode_envelope_not_an_array() {
        let body = r#"{"authors":{"id":"1"}}"#;
        assert!(decode_envelope::<Author>(body, Resource::Authors).is_err());
    }

    #[test]
    fn test_decode_envelope_malformed_json() {
        let err = decode_envelope::<Post>("<html>", Resource::Posts).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
    }

    #[test]
    fn test_redacted_masks_key() {
        let client = client_with_key("secret");
        let url = client
            .build_url("posts", &[("limit", "1".to_string())])
            .unwrap();
        let shown = redacted(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("key=***"));
        assert!(shown.contains("limit=1"));
    }
}
