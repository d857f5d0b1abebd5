use clblog_store::{InMemoryObjectStore, Namespace, ObjectStore};

use super::{Comment, Post, User};
use crate::error::{ContentError, ContentResult};

/// Any value held in the shared store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    User(User),
    Post(Post),
    Comment(Comment),
}

/// The store every clblog component shares.
pub type RecordStore = InMemoryObjectStore<Record>;

impl Record {
    /// Namespace this record belongs under.
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::User(_) => Namespace::Users,
            Self::Post(_) => Namespace::Blogs,
            Self::Comment(_) => Namespace::Comments,
        }
    }

    /// Full store key for this record.
    pub fn key(&self) -> String {
        let id = match self {
            Self::User(u) => u.name.as_str(),
            Self::Post(p) => p.slug.as_str(),
            Self::Comment(c) => c.slug.as_str(),
        };
        self.namespace().key(id)
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Self::User(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Self::Comment(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            Self::User(u) => Some(u),
            _ => None,
        }
    }

    pub fn into_post(self) -> Option<Post> {
        match self {
            Self::Post(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_comment(self) -> Option<Comment> {
        match self {
            Self::Comment(c) => Some(c),
            _ => None,
        }
    }
}

/// Load `kind/id` and unwrap it as the expected variant.
///
/// Absence is `Ok(None)`. A record of the wrong variant under the key is
/// [`ContentError::WrongKind`].
pub(crate) async fn fetch<T>(
    store: &RecordStore,
    kind: Namespace,
    id: &str,
    pick: fn(Record) -> Option<T>,
) -> ContentResult<Option<T>> {
    let key = kind.key(id);
    match store.get(&key).await? {
        None => Ok(None),
        Some(record) => match pick(record) {
            Some(value) => Ok(Some(value)),
            None => Err(ContentError::WrongKind {
                key,
                expected: kind,
            }),
        },
    }
}

/// Write `record` under its own key.
pub(crate) async fn put(store: &RecordStore, record: Record) -> ContentResult<()> {
    let key = record.key();
    store.set(&key, record).await?;
    Ok(())
}

impl From<User> for Record {
    fn from(u: User) -> Self {
        Self::User(u)
    }
}

impl From<Post> for Record {
    fn from(p: Post) -> Self {
        Self::Post(p)
    }
}

impl From<Comment> for Record {
    fn from(c: Comment) -> Self {
        Self::Comment(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clblog_types::Slug;

    fn post() -> Post {
        Post {
            slug: Slug::parse("abc").unwrap(),
            author_name: "Bob".into(),
            title: "t".into(),
            content: "c".into(),
            path: "/abc/t".into(),
            date_created: 1,
            date_last_modified: 1,
        }
    }

    #[test]
    fn keys_follow_namespaces() {
        let user = User::new("Alice", "pw").unwrap();
        assert_eq!(Record::from(user).key(), "users/Alice");
        assert_eq!(Record::from(post()).key(), "blogs/abc");
    }

    #[tokio::test]
    async fn fetch_unwraps_expected_variant() {
        let store = RecordStore::new();
        store.set("blogs/abc", post().into()).await.unwrap();

        let found = fetch(&store, Namespace::Blogs, "abc", Record::into_post)
            .await
            .unwrap();
        assert_eq!(found, Some(post()));

        let missing = fetch(&store, Namespace::Blogs, "zzz", Record::into_post)
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn fetch_rejects_wrong_variant() {
        let store = RecordStore::new();
        store.set("comments/abc", post().into()).await.unwrap();
        let err = fetch(&store, Namespace::Comments, "abc", Record::into_comment)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::WrongKind { .. }));
    }

    #[test]
    fn accessors_match_variant() {
        let r = Record::from(post());
        assert_eq!(r.namespace(), Namespace::Blogs);
        assert!(r.as_user().is_none());
        assert!(r.as_comment().is_none());
        assert_eq!(r.into_post().unwrap().slug.as_str(), "abc");
    }
}
