//! Demo users, posts and a small reply tree.

use clblog_content::{Blog, Comment, ContentResult, NewComment, Post};
use tracing::info;

use crate::auth::GUEST_NAME;
use crate::credentials;

const USERS: [(&str, &str); 3] = [("Alice", "Alice123"), ("Bob", "Bob123"), ("Eve", "Eve123")];

fn comment<'a>(
    author_name: &'a str,
    blog_slug: &'a str,
    parent_slug: Option<&'a str>,
    content: &'a str,
) -> NewComment<'a> {
    NewComment {
        author_name,
        blog_slug,
        parent_slug,
        content,
    }
}

/// What [`seed_demo_data`] wrote.
#[derive(Clone, Debug)]
pub struct SeedSummary {
    pub users: usize,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

/// Populate `blog` through its public operations, so reply flags come from
/// real attachments.
pub async fn seed_demo_data(blog: &Blog) -> ContentResult<SeedSummary> {
    for (name, password) in USERS {
        blog.register_user(name, &credentials::encrypt(password)).await?;
    }

    let posts = vec![
        blog.create_post(
            "Bob",
            "How to fish in the sea",
            "Fishing in the sea requires...",
        )
        .await?,
        blog.create_post("Bob", "Fishing with worms", "Baiting a hook by...")
            .await?,
        blog.create_post(
            "Eve",
            "Camping and fishing in the morning",
            "Best camping spot I know..",
        )
        .await?,
    ];

    let first = posts[0].slug.as_str();
    let second = posts[1].slug.as_str();
    let nice = format!("Nice post about {}", posts[0].title);
    let mut comments = Vec::new();
    let top = blog
        .create_comment(comment("Alice", first, None, &nice))
        .await?;
    comments.push(top.clone());

    let reply_text = format!("I will reply to {nice}");
    comments.push(
        blog.create_comment(comment(GUEST_NAME, first, Some(top.slug.as_str()), &reply_text))
            .await?,
    );
    let reply = blog
        .create_comment(comment(GUEST_NAME, first, Some(top.slug.as_str()), &reply_text))
        .await?;
    comments.push(reply.clone());

    let nested = format!("I reply to your reply to {nice}");
    comments.push(
        blog.create_comment(comment(GUEST_NAME, first, Some(reply.slug.as_str()), &nested))
            .await?,
    );

    let great = format!("Great post about {}", posts[1].title);
    comments.push(
        blog.create_comment(comment("Eve", second, None, &great))
            .await?,
    );

    let guest = format!("I am a guest but i wanted to talk about {}", posts[0].title);
    comments.push(
        blog.create_comment(comment(GUEST_NAME, first, None, &guest))
            .await?,
    );

    let plain = format!("Just a top level post to {}", posts[0].title);
    comments.push(
        blog.create_comment(comment("Eve", first, None, &plain))
            .await?,
    );

    let summary = SeedSummary {
        users: USERS.len(),
        posts,
        comments,
    };
    info!(
        users = summary.users,
        posts = summary.posts.len(),
        comments = summary.comments.len(),
        "demo data seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clblog_content::NO_START_INDEX;

    #[tokio::test]
    async fn seeds_users_with_encrypted_passwords() {
        let blog = Blog::new();
        seed_demo_data(&blog).await.unwrap();
        let alice = blog.get_user("Alice").await.unwrap().unwrap();
        assert!(credentials::validate("Alice123", &alice.password));
        assert!(!alice.is_logged_in());
    }

    #[tokio::test]
    async fn seeded_thread_has_real_attachments() {
        let blog = Blog::new();
        let summary = seed_demo_data(&blog).await.unwrap();
        assert_eq!(summary.posts.len(), 3);

        let first = summary.posts[0].slug.as_str();
        let top = blog.list_comments(first, None, NO_START_INDEX).await.unwrap();
        assert_eq!(top.len(), 3);
        assert!(top[0].has_children);
        assert!(!top[1].has_children);

        let replies = blog
            .list_comments(first, Some(top[0].slug.as_str()), NO_START_INDEX)
            .await
            .unwrap();
        assert_eq!(replies.len(), 2);
        assert!(!replies[0].has_children);
        assert!(replies[1].has_children);

        let second = summary.posts[1].slug.as_str();
        assert_eq!(
            blog.list_comments(second, None, NO_START_INDEX)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn summary_counts_what_was_stored() {
        let blog = Blog::new();
        let summary = seed_demo_data(&blog).await.unwrap();
        assert_eq!(summary.comments.len(), 7);
        assert_eq!(
            blog.store().len(),
            summary.users + summary.posts.len() + summary.comments.len()
        );

        let mut stored = 0;
        for post in &summary.posts {
            let top = blog
                .list_comments(post.slug.as_str(), None, NO_START_INDEX)
                .await
                .unwrap();
            stored += top.len();
            for c in &top {
                stored += blog
                    .list_comments(post.slug.as_str(), Some(c.slug.as_str()), NO_START_INDEX)
                    .await
                    .unwrap()
                    .len();
            }
        }
        // The nested reply sits one level below the replies counted above.
        assert_eq!(stored + 1, summary.comments.len());
    }

    #[tokio::test]
    async fn seeding_twice_fails_on_existing_users() {
        let blog = Blog::new();
        seed_demo_data(&blog).await.unwrap();
        assert!(seed_demo_data(&blog).await.is_err());
    }
}
