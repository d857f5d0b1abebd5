use clblog_store::{Namespace, ObjectStore, Predicate, StoreConfig};
use clblog_types::{
    is_valid_name, is_valid_slug, Clock, GlobalIndexCounter, Slug, SlugGenerator, TypeError,
};
use tracing::{debug, info, warn};

use crate::error::{ContentError, ContentResult};
use crate::lifecycle::{CommentDraft, PostDraft};
use crate::model::record::{fetch, put};
use crate::model::{Comment, Post, PublicUser, Record, RecordStore, User};
use crate::thread::{CommentQuery, ThreadIndex};

/// A comment as submitted by a collaborator, before validation.
#[derive(Clone, Copy, Debug)]
pub struct NewComment<'a> {
    pub author_name: &'a str,
    pub blog_slug: &'a str,
    pub parent_slug: Option<&'a str>,
    pub content: &'a str,
}

/// High-level content API over one shared store.
///
/// Owns the store together with the slug generator, the comment index
/// counter and the clock, so one `Blog` is one consistent world. Every
/// read-modify-write runs inside [`RecordStore::run_exclusive`].
///
/// Authorization is not checked here: callers decide who may edit or
/// delete before invoking the transition.
#[derive(Debug)]
pub struct Blog {
    store: RecordStore,
    slugs: SlugGenerator,
    indices: GlobalIndexCounter,
    clock: Clock,
}

impl Blog {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            store: RecordStore::with_config(config),
            slugs: SlugGenerator::new(),
            indices: GlobalIndexCounter::new(),
            clock: Clock::new(),
        }
    }

    /// The underlying store, for collaborators that need raw access.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn new_slug(&self) -> Slug {
        self.slugs.new_slug()
    }

    // ---- Users ----

    /// Store a new, logged-out user.
    ///
    /// `password` is stored as given; producing it is the caller's job.
    pub async fn register_user(&self, name: &str, password: &str) -> ContentResult<PublicUser> {
        let user = User::new(name, password)?;
        self.store
            .run_exclusive(|| async {
                let record = Record::User(user.clone());
                if self.store.contains(&record.key()).await? {
                    return Err(ContentError::AlreadyExists {
                        kind: Namespace::Users,
                        id: user.name.clone(),
                    });
                }
                put(&self.store, record).await?;
                info!(user = %user.name, "user registered");
                Ok(user.to_public())
            })
            .await
    }

    /// Internal view of a user, credentials included.
    pub async fn get_user(&self, name: &str) -> ContentResult<Option<User>> {
        if !is_valid_name(name) {
            return Err(TypeError::InvalidName(name.to_string()).into());
        }
        fetch(&self.store, Namespace::Users, name, Record::into_user).await
    }

    /// Issue a fresh bearer token if `check` accepts the stored user.
    ///
    /// Any previous token stops working. Unknown users and rejected checks
    /// are both [`ContentError::InvalidCredentials`].
    pub async fn login<F>(&self, name: &str, check: F) -> ContentResult<String>
    where
        F: FnOnce(&User) -> bool,
    {
        if !is_valid_name(name) {
            return Err(TypeError::InvalidName(name.to_string()).into());
        }
        self.store
            .run_exclusive(|| async {
                let user = fetch(&self.store, Namespace::Users, name, Record::into_user)
                    .await?
                    .ok_or(ContentError::InvalidCredentials)?;
                if !check(&user) {
                    warn!(user = %name, "login rejected");
                    return Err(ContentError::InvalidCredentials);
                }
                let token = self.slugs.new_slug().to_string();
                put(&self.store, user.with_token(token.clone()).into()).await?;
                info!(user = %name, "login");
                Ok(token)
            })
            .await
    }

    /// Clear the token of whoever holds `token`. Returns `false` when no
    /// user holds it.
    pub async fn logout(&self, token: &str) -> ContentResult<bool> {
        self.store
            .run_exclusive(|| async {
                let Some(user) = self.user_by_token(token).await? else {
                    return Ok(false);
                };
                put(&self.store, user.with_token("").into()).await?;
                info!(user = %user.name, "logout");
                Ok(true)
            })
            .await
    }

    /// The user currently holding `token`. The empty token never matches.
    pub async fn user_by_token(&self, token: &str) -> ContentResult<Option<User>> {
        if !is_valid_slug(token) {
            return Ok(None);
        }
        let filter: Predicate<'_, Record> =
            &|r: &Record| r.as_user().is_some_and(|u| u.bearer_token == token);
        let found = self
            .store
            .scan(Namespace::Users.prefix(), Some(filter))
            .await?;
        Ok(found.into_iter().find_map(Record::into_user))
    }

    // ---- Posts ----

    /// Create a post by an existing user.
    pub async fn create_post(
        &self,
        author_name: &str,
        title: &str,
        content: &str,
    ) -> ContentResult<Post> {
        if !is_valid_name(author_name) {
            return Err(TypeError::InvalidName(author_name.to_string()).into());
        }
        self.store
            .run_exclusive(|| async {
                let author = fetch(&self.store, Namespace::Users, author_name, Record::into_user)
                    .await?
                    .ok_or_else(|| ContentError::not_found(Namespace::Users, author_name))?;
                let post = Post::create(
                    PostDraft {
                        author_name: author.name,
                        title: title.to_string(),
                        content: content.to_string(),
                    },
                    self.slugs.new_slug(),
                    self.clock.now_ms(),
                );
                put(&self.store, post.clone().into()).await?;
                info!(slug = %post.slug, author = %post.author_name, "post created");
                Ok(post)
            })
            .await
    }

    pub async fn get_post(&self, slug: &str) -> ContentResult<Option<Post>> {
        let slug = Slug::parse(slug)?;
        fetch(&self.store, Namespace::Blogs, slug.as_str(), Record::into_post).await
    }

    /// Every post, oldest first. Deleted posts are included in redacted form.
    pub async fn list_posts(&self) -> ContentResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .store
            .scan(Namespace::Blogs.prefix(), None)
            .await?
            .into_iter()
            .filter_map(Record::into_post)
            .collect();
        posts.sort_by(|a, b| {
            a.date_created
                .cmp(&b.date_created)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Ok(posts)
    }

    /// Replace a post's title and content.
    pub async fn edit_post(&self, slug: &str, title: &str, content: &str) -> ContentResult<Post> {
        let slug = Slug::parse(slug)?;
        self.store
            .run_exclusive(|| async {
                let current = self.require_post(&slug).await?;
                let edited =
                    current.edit(title.to_string(), content.to_string(), self.clock.now_ms())?;
                put(&self.store, edited.clone().into()).await?;
                info!(slug = %slug, "post edited");
                Ok(edited)
            })
            .await
    }

    /// Soft-delete a post. Deleting an already deleted post rewrites it.
    pub async fn delete_post(&self, slug: &str) -> ContentResult<Post> {
        let slug = Slug::parse(slug)?;
        self.store
            .run_exclusive(|| async {
                let current = self.require_post(&slug).await?;
                let redacted = current.redact(self.clock.now_ms());
                put(&self.store, redacted.clone().into()).await?;
                info!(slug = %slug, "post deleted");
                Ok(redacted)
            })
            .await
    }

    async fn require_post(&self, slug: &Slug) -> ContentResult<Post> {
        fetch(&self.store, Namespace::Blogs, slug.as_str(), Record::into_post)
            .await?
            .ok_or_else(|| ContentError::not_found(Namespace::Blogs, slug.as_str()))
    }

    // ---- Comments ----

    /// Create a comment, attaching it to its parent when it is a reply.
    ///
    /// The parent's `has_children` latch is written before the child, in
    /// the same transaction, so no reader sees the child under an unmarked
    /// parent.
    pub async fn create_comment(&self, new: NewComment<'_>) -> ContentResult<Comment> {
        if !is_valid_name(new.author_name) {
            return Err(TypeError::InvalidName(new.author_name.to_string()).into());
        }
        let blog_slug = Slug::parse(new.blog_slug)?;
        let parent_slug = new.parent_slug.map(Slug::parse).transpose()?;

        self.store
            .run_exclusive(|| async {
                let post = self.require_post(&blog_slug).await?;
                if post.is_deleted() {
                    return Err(ContentError::deleted(Namespace::Blogs, blog_slug.as_str()));
                }

                if let Some(parent_slug) = &parent_slug {
                    let parent =
                        ThreadIndex::reply_target(&self.store, &blog_slug, parent_slug).await?;
                    ThreadIndex::attach(&self.store, &parent).await?;
                }

                let comment = Comment::create(
                    CommentDraft {
                        blog_slug: blog_slug.clone(),
                        parent_slug: parent_slug.clone(),
                        author_name: new.author_name.to_string(),
                        content: new.content.to_string(),
                    },
                    self.slugs.new_slug(),
                    self.indices.next(),
                    self.clock.now_ms(),
                );
                put(&self.store, comment.clone().into()).await?;
                info!(
                    slug = %comment.slug,
                    blog = %comment.blog_slug,
                    index = comment.global_index,
                    "comment created"
                );
                Ok(comment)
            })
            .await
    }

    pub async fn get_comment(&self, slug: &str) -> ContentResult<Option<Comment>> {
        let slug = Slug::parse(slug)?;
        fetch(&self.store, Namespace::Comments, slug.as_str(), Record::into_comment).await
    }

    /// Direct children of `parent_slug` (or top-level comments when `None`)
    /// on `blog_slug`, past `start_index`, oldest first.
    pub async fn list_comments(
        &self,
        blog_slug: &str,
        parent_slug: Option<&str>,
        start_index: i64,
    ) -> ContentResult<Vec<Comment>> {
        let query = CommentQuery::top_level(Slug::parse(blog_slug)?)
            .with_parent(parent_slug.map(Slug::parse).transpose()?)
            .after(start_index);
        debug!(?query, "listing comments");
        ThreadIndex::query(&self.store, &query).await
    }

    /// Soft-delete a comment. Its replies and its place in the thread stay.
    pub async fn delete_comment(&self, slug: &str) -> ContentResult<Comment> {
        let slug = Slug::parse(slug)?;
        self.store
            .run_exclusive(|| async {
                let current =
                    fetch(&self.store, Namespace::Comments, slug.as_str(), Record::into_comment)
                        .await?
                        .ok_or_else(|| ContentError::not_found(Namespace::Comments, slug.as_str()))?;
                let redacted = current.redact();
                put(&self.store, redacted.clone().into()).await?;
                info!(slug = %slug, "comment deleted");
                Ok(redacted)
            })
            .await
    }
}

impl Default for Blog {
    fn default() -> Self {
        Self::new()
    }
}
