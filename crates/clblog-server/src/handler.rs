use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use clblog_content::{
    Comment, CommentView, ContentError, NewComment, Post, PostView, NO_START_INDEX,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::{Action, Credentials, Identity};
use crate::credentials;
use crate::error::{ServerError, ServerResult};
use crate::sanitize::strip_tags;
use crate::state::AppState;
use crate::API_VERSION;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub bearer_token: String,
}

impl TokenResponse {
    fn cleared() -> Json<Self> {
        Json(Self {
            bearer_token: String::new(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostBody {
    /// Both fields present and non-empty, tags stripped.
    fn sanitized(self) -> ServerResult<(String, String)> {
        match (self.title, self.content) {
            (Some(title), Some(content)) if !title.is_empty() && !content.is_empty() => {
                Ok((strip_tags(&title), strip_tags(&content)))
            }
            _ => Err(ServerError::BadRequest(
                "content and title are required".into(),
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentBody {
    pub content: Option<String>,
}

impl CommentBody {
    fn sanitized(self) -> ServerResult<String> {
        match self.content {
            Some(content) if !content.is_empty() => Ok(strip_tags(&content)),
            _ => Err(ServerError::BadRequest("content is required".into())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentCursor {
    pub start_index: Option<i64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn caller(state: &AppState, headers: &HeaderMap) -> ServerResult<Identity> {
    state
        .auth
        .authenticate(&Credentials::from_headers(headers))
        .await
}

/// Authenticate and check `action` in one step.
async fn authorized(
    state: &AppState,
    headers: &HeaderMap,
    action: Action,
) -> ServerResult<Identity> {
    let identity = caller(state, headers).await?;
    state.auth.authorize(&identity, &action).await?;
    Ok(identity)
}

async fn existing_post(state: &AppState, slug: &str) -> ServerResult<Post> {
    match state.blog.get_post(slug).await {
        Ok(Some(post)) => Ok(post),
        Ok(None) | Err(ContentError::InvalidIdentifier(_)) => {
            Err(ServerError::NotFound(format!("post {slug}")))
        }
        Err(e) => Err(e.into()),
    }
}

async fn existing_comment(state: &AppState, slug: &str) -> ServerResult<Comment> {
    match state.blog.get_comment(slug).await {
        Ok(Some(comment)) => Ok(comment),
        Ok(None) | Err(ContentError::InvalidIdentifier(_)) => {
            Err(ServerError::NotFound(format!("comment {slug}")))
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Home and sessions
// ---------------------------------------------------------------------------

pub async fn home() -> Json<Value> {
    Json(json!({ "apiVersion": API_VERSION }))
}

/// Exchange a user name and password for a fresh bearer token.
///
/// Every failure looks the same to the caller: 401 with an empty token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<TokenResponse>) {
    let outcome = state
        .blog
        .login(&req.user_name, |user| {
            credentials::validate(&req.password, &user.password)
        })
        .await;
    match outcome {
        Ok(bearer_token) => (StatusCode::OK, Json(TokenResponse { bearer_token })),
        Err(e) => {
            warn!(user = %req.user_name, error = %e, "login failed");
            (StatusCode::UNAUTHORIZED, TokenResponse::cleared())
        }
    }
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<TokenResponse>) {
    let Credentials::Bearer(token) = Credentials::from_headers(&headers) else {
        return (StatusCode::BAD_REQUEST, TokenResponse::cleared());
    };
    match state.blog.logout(&token).await {
        Ok(true) => (StatusCode::OK, TokenResponse::cleared()),
        Ok(false) => (StatusCode::BAD_REQUEST, TokenResponse::cleared()),
        Err(e) => {
            warn!(error = %e, "logout failed");
            (StatusCode::BAD_REQUEST, TokenResponse::cleared())
        }
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

pub async fn list_posts(State(state): State<AppState>) -> ServerResult<Json<Vec<PostView>>> {
    let posts = state.blog.list_posts().await?;
    Ok(Json(posts.into_iter().map(PostView::from).collect()))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ServerResult<Json<PostView>> {
    Ok(Json(existing_post(&state, &slug).await?.into()))
}

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PostBody>,
) -> ServerResult<(StatusCode, Json<PostView>)> {
    let author = authorized(&state, &headers, Action::Create).await?;
    let (title, content) = body.sanitized()?;
    let post = state
        .blog
        .create_post(author.name(), &title, &content)
        .await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Json(body): Json<PostBody>,
) -> ServerResult<Json<PostView>> {
    let post = existing_post(&state, &slug).await?;
    authorized(
        &state,
        &headers,
        Action::Modify {
            owner: post.author_name,
        },
    )
    .await?;
    let (title, content) = body.sanitized()?;
    let edited = state.blog.edit_post(&slug, &title, &content).await?;
    Ok(Json(edited.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> ServerResult<Json<PostView>> {
    let post = existing_post(&state, &slug).await?;
    let who = authorized(
        &state,
        &headers,
        Action::Modify {
            owner: post.author_name,
        },
    )
    .await?;
    let deleted = state.blog.delete_post(&slug).await?;
    info!(slug = %slug, by = who.name(), "post removed");
    Ok(Json(deleted.into()))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

async fn comments(
    state: &AppState,
    blog_slug: &str,
    parent_slug: Option<&str>,
    cursor: CommentCursor,
) -> ServerResult<Json<Vec<CommentView>>> {
    let start_index = cursor.start_index.unwrap_or(NO_START_INDEX);
    let found = state
        .blog
        .list_comments(blog_slug, parent_slug, start_index)
        .await?;
    Ok(Json(found.into_iter().map(CommentView::from).collect()))
}

pub async fn list_top_comments(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(cursor): Query<CommentCursor>,
) -> ServerResult<Json<Vec<CommentView>>> {
    comments(&state, &slug, None, cursor).await
}

pub async fn list_replies(
    State(state): State<AppState>,
    Path((slug, parent)): Path<(String, String)>,
    Query(cursor): Query<CommentCursor>,
) -> ServerResult<Json<Vec<CommentView>>> {
    comments(&state, &slug, Some(&parent), cursor).await
}

async fn add_comment(
    state: &AppState,
    headers: &HeaderMap,
    blog_slug: &str,
    parent_slug: Option<&str>,
    body: CommentBody,
) -> ServerResult<(StatusCode, Json<CommentView>)> {
    let author = authorized(state, headers, Action::Create).await?;
    let content = body.sanitized()?;
    let comment = state
        .blog
        .create_comment(NewComment {
            author_name: author.name(),
            blog_slug,
            parent_slug,
            content: &content,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub async fn create_top_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Json(body): Json<CommentBody>,
) -> ServerResult<(StatusCode, Json<CommentView>)> {
    add_comment(&state, &headers, &slug, None, body).await
}

pub async fn create_reply(
    State(state): State<AppState>,
    Path((slug, parent)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<CommentBody>,
) -> ServerResult<(StatusCode, Json<CommentView>)> {
    add_comment(&state, &headers, &slug, Some(&parent), body).await
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> ServerResult<Json<CommentView>> {
    let comment = existing_comment(&state, &slug).await?;
    authorized(
        &state,
        &headers,
        Action::Modify {
            owner: comment.author_name,
        },
    )
    .await?;
    let deleted = state.blog.delete_comment(&slug).await?;
    Ok(Json(deleted.into()))
}
