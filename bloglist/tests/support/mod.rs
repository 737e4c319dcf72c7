#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use bloglist::{
    AppState, BlogStore, Config, DocumentStore, auth::hash_password, build_router,
    model::{Blog, Id, User},
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const INITIAL_BLOGS: [(&str, &str, &str, u64); 3] = [
    ("test blog 1", "test author 1", "test url 1", 1),
    ("test blog 2", "test author 2", "test url 2", 4),
    ("test blog 3", "test author 3", "test url 3", 0),
];

pub struct TestApp {
    pub router: Router,
    pub store: Arc<DocumentStore>,
    pub root: User,
    pub token: String,
}

pub fn test_config() -> Config {
    let mut config = Config::new("test-secret");
    config.bcrypt_cost = 4;
    config.testing = true;
    config
}

impl TestApp {
    /// Fresh store with user `root`/`sudo`, a login token and the three initial blogs.
    pub async fn spawn() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let store = Arc::new(DocumentStore::in_memory());
        let router = build_router(AppState::new(config, store.clone()));

        let root = create_user(&store, "root", "sudo", "sysadmin").await;

        let credentials = json!({ "username": "root", "password": "sudo" });
        let (status, body) =
            send(&router, "POST", "/api/login", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        let token = body["token"]
            .as_str()
            .expect("token in login response")
            .to_string();

        for (title, author, url, likes) in INITIAL_BLOGS {
            store
                .insert_blog(Blog {
                    id: Id::generate(),
                    title: title.into(),
                    author: Some(author.into()),
                    url: url.into(),
                    likes,
                    user: root.id,
                })
                .await
                .expect("seed blog");
        }

        Self {
            router,
            store,
            root,
            token,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.router, "GET", uri, None, None).await
    }

    pub async fn blogs(&self) -> Vec<Value> {
        let (status, body) = self.get("/api/blogs").await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().expect("blog list is an array").clone()
    }

    /// Id of the first listed blog.
    pub async fn first_id(&self) -> String {
        let blogs = self.blogs().await;
        blogs[0]["id"].as_str().expect("id").to_string()
    }

    pub async fn titles(&self) -> Vec<String> {
        self.blogs()
            .await
            .iter()
            .map(|b| b["title"].as_str().expect("title").to_string())
            .collect()
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.router, method, uri, token, body).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, None, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> StatusCode {
        self.send("DELETE", uri, token, None).await.0
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let credentials = json!({ "username": username, "password": password });
        self.post("/api/login", None, credentials).await
    }
}

pub async fn create_user(
    store: &DocumentStore,
    username: &str,
    password: &str,
    name: &str,
) -> User {
    let password_hash = hash_password(password.into(), 4)
        .await
        .expect("hash password");
    store
        .insert_user(User {
            id: Id::generate(),
            username: username.into(),
            name: Some(name.into()),
            password_hash,
            blogs: Vec::new(),
        })
        .await
        .expect("seed user")
}

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("build request");

    let res = router
        .clone()
        .oneshot(req)
        .await
        .expect("router is infallible");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}
