mod support;

use axum::http::StatusCode;
use bloglist::{BlogStore, model::Id};
use serde_json::json;
use support::{INITIAL_BLOGS, TestApp, test_config};

#[tokio::test]
async fn all_blogs_are_returned() {
    let app = TestApp::spawn().await;
    assert_eq!(app.blogs().await.len(), INITIAL_BLOGS.len());
}

#[tokio::test]
async fn unique_identifier_is_named_id() {
    let app = TestApp::spawn().await;
    for blog in app.blogs().await {
        assert!(blog["id"].is_string(), "missing id in {blog}");
        assert!(blog.get("_id").is_none());
    }
}

#[tokio::test]
async fn blogs_populate_their_owner() {
    let app = TestApp::spawn().await;
    let first = &app.blogs().await[0];

    assert_eq!(first["user"]["username"], "root");
    assert_eq!(first["user"]["name"], "sysadmin");
    assert!(first["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn a_valid_blog_can_be_added() {
    let app = TestApp::spawn().await;
    let new_blog = json!({
        "title": "new test blog",
        "author": "new test author",
        "url": "new test url",
    });

    let (status, body) = app.post("/api/blogs", Some(&app.token), new_blog).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_string());
    assert_eq!(body["user"]["username"], "root");

    assert_eq!(app.blogs().await.len(), INITIAL_BLOGS.len() + 1);
    assert!(app.titles().await.contains(&"new test blog".to_string()));

    let owner = app
        .store
        .user(app.root.id)
        .await
        .expect("lookup")
        .expect("root exists");
    assert_eq!(owner.blogs.len(), INITIAL_BLOGS.len() + 1);
}

#[tokio::test]
async fn creation_fails_without_token() {
    let app = TestApp::spawn().await;
    let new_blog = json!({
        "title": "new test blog",
        "author": "new test author",
        "url": "new test url",
    });

    let (status, body) = app.post("/api/blogs", None, new_blog).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    assert_eq!(app.blogs().await.len(), INITIAL_BLOGS.len());
}

#[tokio::test]
async fn creation_fails_with_garbage_token() {
    let app = TestApp::spawn().await;
    let new_blog = json!({ "title": "t", "url": "u" });

    let (status, _) = app.post("/api/blogs", Some("not-a-jwt"), new_blog).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.blogs().await.len(), INITIAL_BLOGS.len());
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let app = TestApp::spawn().await;

    let mut config = test_config();
    config.secret = "another-secret".into();
    let other = TestApp::with_config(config).await;

    let new_blog = json!({ "title": "t", "url": "u" });
    let (status, _) = app.post("/api/blogs", Some(&other.token), new_blog).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_likes_defaults_to_zero() {
    let app = TestApp::spawn().await;
    let new_blog = json!({
        "title": "blog with no likes",
        "author": "some author",
        "url": "some url",
    });

    let (status, _) = app.post("/api/blogs", Some(&app.token), new_blog).await;
    assert_eq!(status, StatusCode::CREATED);

    let blogs = app.blogs().await;
    let added = blogs
        .iter()
        .find(|b| b["title"] == "blog with no likes")
        .expect("new blog listed");
    assert_eq!(added["likes"], 0);
}

#[tokio::test]
async fn missing_title_and_url_is_bad_request() {
    let app = TestApp::spawn().await;
    let new_blog = json!({ "author": "author with invalid blog" });

    let (status, body) = app.post("/api/blogs", Some(&app.token), new_blog).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(app.blogs().await.len(), INITIAL_BLOGS.len());
}

#[tokio::test]
async fn missing_url_alone_is_bad_request() {
    let app = TestApp::spawn().await;
    let new_blog = json!({ "title": "only a title" });

    let (status, _) = app.post("/api/blogs", Some(&app.token), new_blog).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!app.titles().await.contains(&"only a title".to_string()));
}

#[tokio::test]
async fn a_blog_can_be_deleted() {
    let app = TestApp::spawn().await;
    let first = app.blogs().await[0].clone();
    let uri = format!("/api/blogs/{}", first["id"].as_str().expect("id"));

    let status = app.delete(&uri, Some(&app.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(app.blogs().await.len(), INITIAL_BLOGS.len() - 1);
    let title = first["title"].as_str().expect("title").to_string();
    assert!(!app.titles().await.contains(&title));
}

#[tokio::test]
async fn delete_requires_token() {
    let app = TestApp::spawn().await;
    let uri = format!("/api/blogs/{}", app.first_id().await);

    assert_eq!(app.delete(&uri, None).await, StatusCode::UNAUTHORIZED);
    assert_eq!(app.blogs().await.len(), INITIAL_BLOGS.len());
}

#[tokio::test]
async fn delete_unknown_blog_is_not_found() {
    let app = TestApp::spawn().await;
    let uri = format!("/api/blogs/{}", Id::generate());

    let status = app.delete(&uri, Some(&app.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn any_logged_in_user_can_delete_by_default() {
    let app = TestApp::spawn().await;
    support::create_user(&app.store, "mallory", "secret", "Mallory").await;
    let (_, login) = app.login("mallory", "secret").await;
    let token = login["token"].as_str().expect("token");

    let uri = format!("/api/blogs/{}", app.first_id().await);
    assert_eq!(app.delete(&uri, Some(token)).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn strict_ownership_forbids_other_users() {
    let mut config = test_config();
    config.strict_ownership = true;
    let app = TestApp::with_config(config).await;

    support::create_user(&app.store, "mallory", "secret", "Mallory").await;
    let (_, login) = app.login("mallory", "secret").await;
    let token = login["token"].as_str().expect("token");

    let uri = format!("/api/blogs/{}", app.first_id().await);
    assert_eq!(app.delete(&uri, Some(token)).await, StatusCode::FORBIDDEN);
    assert_eq!(app.blogs().await.len(), INITIAL_BLOGS.len());

    let status = app.delete(&uri, Some(&app.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn likes_can_be_updated() {
    let app = TestApp::spawn().await;
    let first = app.blogs().await[0].clone();
    let uri = format!("/api/blogs/{}", first["id"].as_str().expect("id"));

    let (status, body) = app.put(&uri, json!({ "likes": 104 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 104);
    assert_eq!(body["title"], first["title"]);

    let (_, fetched) = app.get(&uri).await;
    assert_eq!(fetched["likes"], 104);
}

#[tokio::test]
async fn update_unknown_blog_is_not_found() {
    let app = TestApp::spawn().await;
    let uri = format!("/api/blogs/{}", Id::generate());

    let (status, _) = app.put(&uri, json!({ "likes": 1 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/blogs/12345").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformatted id");
}

#[tokio::test]
async fn add_then_delete_scenario() {
    let app = TestApp::spawn().await;
    let original_first = app.blogs().await[0].clone();
    let new_blog = json!({ "title": "fourth", "author": "a", "url": "u", "likes": 2 });

    let (status, _) = app.post("/api/blogs", Some(&app.token), new_blog).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.blogs().await.len(), 4);
    assert!(app.titles().await.contains(&"fourth".to_string()));

    let uri = format!("/api/blogs/{}", original_first["id"].as_str().expect("id"));
    let status = app.delete(&uri, Some(&app.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let titles = app.titles().await;
    let removed = original_first["title"].as_str().expect("title");
    assert_eq!(titles.len(), 3);
    assert!(!titles.iter().any(|t| t == removed));
}

#[tokio::test]
async fn unknown_endpoint_is_json_404() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown endpoint");
}
