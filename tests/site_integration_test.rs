use anyhow::Result;
use ghost_content::{GhostClient, GhostConfig, Page, SiteService};
use httpmock::prelude::*;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

const API: &str = "/ghost/api/content";

fn site_for(server: &MockServer) -> Result<SiteService<GhostClient>> {
    let client = GhostClient::new(GhostConfig::new(server.base_url()))?;
    Ok(SiteService::new(client))
}

#[tokio::test]
async fn test_tag_page_end_to_end() -> Result<()> {
    let server = MockServer::start();
    let tag_mock = server.mock(|when, then| {
        when.method(GET).path(format!("{}/tags/slug/travel/", API));
        then.status(200).json_body(json!({
            "tags": [{"id": "t9", "name": "Travel", "slug": "travel", "description": "Trips"}]
        }));
    });
    let posts_mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("{}/posts/", API))
            .query_param("filter", "tag:travel")
            .query_param("limit", "20");
        then.status(200).json_body(json!({
            "posts": [
                {"id": "1", "title": "Lisbon", "slug": "lisbon", "primary_tag": {"id": "t9", "name": "Travel", "slug": "travel"}},
                {"id": "2", "title": "Porto", "slug": "porto"}
            ]
        }));
    });

    let site = site_for(&server)?;
    let page = site.tag("travel").await;

    tag_mock.assert();
    posts_mock.assert();
    let page = page.found().expect("tag page should be found");
    assert_eq!(page.tag.description.as_deref(), Some("Trips"));
    assert_eq!(page.posts.len(), 2);
    assert_eq!(page.posts[0].primary_tag.as_ref().map(|t| t.slug.as_str()), Some("travel"));
    Ok(())
}

#[tokio::test]
async fn test_tag_page_is_not_found_when_cms_down() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(502);
    });

    let site = site_for(&server)?;
    let page = site.tag("travel").await;

    assert_eq!(page, Page::NotFound);
    // bare slug, then the slash probe; both requests normalize to the same path
    api_mock.assert_hits(2);
    Ok(())
}

#[tokio::test]
async fn test_author_page_end_to_end() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("{}/authors/slug/ada/", API))
            .query_param("include", "count.posts");
        then.status(200).json_body(json!({
            "authors": [{
                "id": "a1",
                "name": "Ada",
                "slug": "ada",
                "bio": null,
                "location": "London",
                "count": {"posts": 1}
            }]
        }));
    });
    let posts_mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("{}/posts/", API))
            .query_param("filter", "author:ada")
            .query_param("limit", "10")
            .query_param("page", "1");
        then.status(200).json_body(json!({
            "posts": [{"id": "1", "title": "Engines", "slug": "engines", "html": "<p>Notes</p>"}]
        }));
    });

    let site = site_for(&server)?;
    let page = site.author("ada").await.found().expect("author page should be found");

    posts_mock.assert();
    assert_eq!(page.author.location.as_deref(), Some("London"));
    assert_eq!(page.author.post_count(), Some(1));
    assert_eq!(page.posts[0].html.as_deref(), Some("<p>Notes</p>"));
    Ok(())
}

#[tokio::test]
async fn test_config_file_drives_client() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("{}/authors/", API))
            .query_param("key", "from-file")
            .query_param("limit", "20");
        then.status(200).json_body(json!({"authors": []}));
    });

    let mut file = NamedTempFile::new()?;
    write!(
        file,
        "[ghost]\napi_url = \"{}\"\ncontent_api_key = \"from-file\"\ntimeout_seconds = 2\n",
        server.base_url()
    )?;

    let config = GhostConfig::from_file(file.path())?;
    let site = SiteService::new(GhostClient::new(config)?);
    let snapshot = site.debug_snapshot().await;

    api_mock.assert();
    assert!(snapshot.authors.is_empty());
    // posts and tags were not mocked, so those two fall back
    assert_eq!(snapshot.errors.len(), 2);
    Ok(())
}

#[test]
fn test_client_construction_is_sync() {
    let client = GhostClient::new(GhostConfig::default()).unwrap();
    let url = client
        .build_url("posts", &[("limit", "1".to_string())])
        .unwrap();
    assert_eq!(url.as_str(), "http://localhost:2368/ghost/api/content/posts/?limit=1");

    let home = tokio_test::block_on(async {
        let unreachable = GhostClient::new(
            GhostConfig::new("http://127.0.0.1:9").with_timeout_seconds(1),
        )
        .unwrap();
        SiteService::new(unreachable).home().await
    });
    assert!(home.degraded);
}
