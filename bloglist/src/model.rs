use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Document id, serialised as 32 lowercase hex chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Id(Uuid);

impl Id {
    pub fn generate() -> Self {
        Id(Uuid::new_v4())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for Id {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ApiError::MalformedId);
        }
        Uuid::try_parse(s).map(Id).map_err(|_| ApiError::MalformedId)
    }
}

impl TryFrom<String> for Id {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Id> for String {
    fn from(id: Id) -> Self {
        id.to_string()
    }
}

/// Stored account. The hash never leaves the store; responses use [`UserView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    #[serde(default)]
    pub blogs: Vec<Id>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: Id,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    pub user: Id,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlog {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u64>,
}

impl NewBlog {
    /// Checks the required fields and builds the record owned by `owner`.
    pub fn into_blog(self, owner: Id) -> Result<Blog, ApiError> {
        let title = required(self.title, "title")?;
        let url = required(self.url, "url")?;

        Ok(Blog {
            id: Id::generate(),
            title,
            author: self.author.filter(|a| !a.trim().is_empty()),
            url,
            likes: self.likes.unwrap_or(0),
            user: owner,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("`{field}` is required"))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u64>,
}

impl BlogUpdate {
    pub fn apply(self, blog: &mut Blog) {
        if let Some(title) = self.title {
            blog.title = title;
        }
        if let Some(author) = self.author {
            blog.author = Some(author);
        }
        if let Some(url) = self.url {
            blog.url = url;
        }
        if let Some(likes) = self.likes {
            blog.likes = likes;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

pub const MIN_CREDENTIAL_LEN: usize = 3;

impl NewUser {
    /// Returns `(username, name, password)` once both credentials are long enough.
    pub fn validate(self) -> Result<(String, Option<String>, String), ApiError> {
        let username = self.username.unwrap_or_default();
        let password = self.password.unwrap_or_default();

        if username.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(ApiError::Validation(format!(
                "`username` must be at least {MIN_CREDENTIAL_LEN} characters long"
            )));
        }
        if password.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(ApiError::Validation(format!(
                "`password` must be at least {MIN_CREDENTIAL_LEN} characters long"
            )));
        }

        Ok((username, self.name, password))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: Id,
    pub username: String,
    pub name: Option<String>,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        UserRef {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

/// Blog as returned by the API, with its owner populated.
#[derive(Debug, Clone, Serialize)]
pub struct BlogView {
    pub id: Id,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    pub user: Option<UserRef>,
}

impl BlogView {
    pub fn new(blog: Blog, owner: Option<&User>) -> Self {
        BlogView {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user: owner.map(UserRef::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogRef {
    pub id: Id,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
}

impl From<&Blog> for BlogRef {
    fn from(blog: &Blog) -> Self {
        BlogRef {
            id: blog.id,
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Id,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<BlogRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_through_display() {
        let id = Id::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 32);
        assert_eq!(text.parse::<Id>().ok(), Some(id));
    }

    #[test]
    fn hyphenated_or_short_ids_are_malformed() {
        let hyphenated = Uuid::new_v4().hyphenated().to_string();
        assert!(matches!(hyphenated.parse::<Id>(), Err(ApiError::MalformedId)));
        assert!(matches!("abc".parse::<Id>(), Err(ApiError::MalformedId)));
        assert!(matches!("z".repeat(32).parse::<Id>(), Err(ApiError::MalformedId)));
    }

    #[test]
    fn id_serialises_as_plain_string() {
        let id = Id::generate();
        let json = serde_json::to_value(id).expect("serialise id");
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }

    #[test]
    fn missing_likes_defaults_to_zero() {
        let owner = Id::generate();
        let blog = NewBlog {
            title: Some("t".into()),
            url: Some("u".into()),
            ..Default::default()
        }
        .into_blog(owner)
        .expect("valid blog");

        assert_eq!(blog.likes, 0);
        assert_eq!(blog.user, owner);
        assert_eq!(blog.author, None);
    }

    #[test]
    fn title_and_url_are_required() {
        let owner = Id::generate();

        let no_title = NewBlog {
            url: Some("u".into()),
            ..Default::default()
        };
        let err = no_title.into_blog(owner).unwrap_err();
        assert!(matches!(err, ApiError::Validation(m) if m.contains("title")));

        let blank_url = NewBlog {
            title: Some("t".into()),
            url: Some("   ".into()),
            ..Default::default()
        };
        let err = blank_url.into_blog(owner).unwrap_err();
        assert!(matches!(err, ApiError::Validation(m) if m.contains("url")));
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut blog = NewBlog {
            title: Some("t".into()),
            author: Some("a".into()),
            url: Some("u".into()),
            likes: Some(3),
        }
        .into_blog(Id::generate())
        .expect("valid blog");

        BlogUpdate {
            likes: Some(104),
            ..Default::default()
        }
        .apply(&mut blog);

        assert_eq!(blog.likes, 104);
        assert_eq!(blog.title, "t");
        assert_eq!(blog.author.as_deref(), Some("a"));
    }

    #[test]
    fn short_credentials_are_rejected() {
        let short_name = NewUser {
            username: Some("ab".into()),
            name: None,
            password: Some("secret".into()),
        };
        let err = short_name.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(m) if m.contains("username")));

        let no_password = NewUser {
            username: Some("alice".into()),
            name: None,
            password: None,
        };
        let err = no_password.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(m) if m.contains("password")));
    }
}
