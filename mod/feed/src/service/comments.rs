use chirp_core::{
    is_valid_id, new_id, now_rfc3339, Page, PageParams, Paginated, ServiceError,
};
use chirp_sql::Value;

use crate::model::{Comment, CommentInput, CommentView};
use crate::service::FeedService;

impl FeedService {
    /// Attach a comment to an existing post.
    pub fn create_comment(
        &self,
        post_id: &str,
        author_id: &str,
        input: CommentInput,
    ) -> Result<CommentView, ServiceError> {
        if !is_valid_id(post_id) {
            return Err(ServiceError::InvalidId("Invalid post ID".to_string()));
        }
        if self.fetch_post(post_id)?.is_none() {
            return Err(ServiceError::NotFound("Post not found".to_string()));
        }

        let now = now_rfc3339();
        let comment = Comment {
            id: new_id(),
            content: input.content,
            author_id: author_id.to_string(),
            post_id: post_id.to_string(),
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let data = serde_json::to_string(&comment)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.sql
            .exec(
                "INSERT INTO comments (id, post_id, author_id, data, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                &[
                    Value::Text(comment.id.clone()),
                    Value::Text(comment.post_id.clone()),
                    Value::Text(comment.author_id.clone()),
                    Value::Text(data),
                    Value::Text(now),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, "comment created");
        self.assemble_comment(comment)
    }

    /// One post's comments, newest first, in a pagination envelope.
    pub fn list_comments(
        &self,
        post_id: &str,
        params: &PageParams,
    ) -> Result<Paginated<CommentView>, ServiceError> {
        if !is_valid_id(post_id) {
            return Err(ServiceError::InvalidId("Invalid post ID".to_string()));
        }
        if self.fetch_post(post_id)?.is_none() {
            return Err(ServiceError::NotFound("Post not found".to_string()));
        }

        let count_rows = self
            .sql
            .query(
                "SELECT COUNT(*) AS cnt FROM comments WHERE post_id = ?1",
                &[Value::Text(post_id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as u64;

        let rows = self
            .sql
            .query(
                "SELECT data FROM comments WHERE post_id = ?1
                 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
                &[
                    Value::Text(post_id.to_string()),
                    Value::Integer(params.limit as i64),
                    Value::Integer(i64::try_from(params.offset()).unwrap_or(i64::MAX)),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut data = Vec::new();
        for row in &rows {
            let doc = row
                .get_str("data")
                .ok_or_else(|| ServiceError::Internal("missing data column".to_string()))?;
            let comment: Comment = serde_json::from_str(doc)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            // Author vanished: skip the comment rather than fail the page.
            if let Some(author) = self.authors.author(&comment.author_id)? {
                data.push(CommentView {
                    id: comment.id,
                    content: comment.content,
                    author,
                    post: comment.post_id,
                    created_at: comment.created_at,
                    updated_at: comment.updated_at,
                });
            }
        }

        Ok(Paginated {
            data,
            pagination: Page::new(params, total),
        })
    }

    /// Hard-delete a comment. Ownership-checked.
    pub fn delete_comment(&self, id: &str, caller_id: &str) -> Result<(), ServiceError> {
        if !is_valid_id(id) {
            return Err(ServiceError::InvalidId("Invalid comment ID".to_string()));
        }
        let comment = self
            .fetch_comment(id)?
            .ok_or_else(|| ServiceError::NotFound("Comment not found".to_string()))?;
        if comment.author_id != caller_id {
            return Err(ServiceError::Forbidden(
                "You are not authorized to delete this comment".to_string(),
            ));
        }

        self.sql
            .exec(
                "DELETE FROM comments WHERE id = ?1",
                &[Value::Text(comment.id.clone())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        tracing::info!(comment_id = %comment.id, "comment deleted");
        Ok(())
    }

    /// Live comment count for a post. Lenient: an id that matches
    /// nothing counts zero, it never errors a view assembly.
    pub(crate) fn count_comments(&self, post_id: &str) -> Result<u64, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT COUNT(*) AS cnt FROM comments WHERE post_id = ?1",
                &[Value::Text(post_id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as u64)
    }

    fn fetch_comment(&self, id: &str) -> Result<Option<Comment>, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT data FROM comments WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let data = row
            .get_str("data")
            .ok_or_else(|| ServiceError::Internal("missing data column".to_string()))?;
        serde_json::from_str(data)
            .map(Some)
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    fn assemble_comment(&self, comment: Comment) -> Result<CommentView, ServiceError> {
        let author = self
            .authors
            .author(&comment.author_id)?
            .ok_or_else(|| ServiceError::Internal("comment author record missing".to_string()))?;
        Ok(CommentView {
            id: comment.id,
            content: comment.content,
            author,
            post: comment.post_id,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chirp_core::{PageParams, ServiceError};

    use crate::model::{CommentInput, PostInput};
    use crate::service::testutil::test_service;

    fn comment(content: &str) -> CommentInput {
        CommentInput {
            content: content.to_string(),
        }
    }

    #[test]
    fn comment_requires_an_existing_post() {
        let (svc, dir) = test_service();
        let alice = dir.add_user("alice");

        let err = svc
            .create_comment("0123456789abcdef01234567", &alice, comment("hi"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = svc
            .create_comment("not-an-id", &alice, comment("hi"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidId(_)));
    }

    #[test]
    fn comment_count_tracks_creates_and_deletes() {
        let (svc, dir) = test_service();
        let alice = dir.add_user("alice");
        let bob = dir.add_user("bob");
        let post = svc
            .create_post(
                &alice,
                PostInput {
                    content: "discuss".into(),
                    images: None,
                },
            )
            .unwrap();

        let c1 = svc.create_comment(&post.id, &bob, comment("first")).unwrap();
        svc.create_comment(&post.id, &alice, comment("second")).unwrap();

        let view = svc.get_post(&post.id).unwrap();
        assert_eq!(view.comments_count, 2);

        svc.delete_comment(&c1.id, &bob).unwrap();
        let view = svc.get_post(&post.id).unwrap();
        assert_eq!(view.comments_count, 1);
    }

    #[test]
    fn comment_listing_is_newest_first_and_paginated() {
        let (svc, dir) = test_service();
        let alice = dir.add_user("alice");
        let post = svc
            .create_post(
                &alice,
                PostInput {
                    content: "thread".into(),
                    images: None,
                },
            )
            .unwrap();

        for i in 0..5 {
            svc.create_comment(&post.id, &alice, comment(&format!("c{}", i)))
                .unwrap();
        }

        let page = svc
            .list_comments(&post.id, &PageParams { page: 1, limit: 3 })
            .unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.data[0].content, "c4");
        assert_eq!(page.pagination.total_items, 5);
        assert_eq!(page.pagination.total_pages, 2);

        let page2 = svc
            .list_comments(&post.id, &PageParams { page: 2, limit: 3 })
            .unwrap();
        assert_eq!(page2.data.len(), 2);
    }

    #[test]
    fn comment_delete_is_ownership_checked() {
        let (svc, dir) = test_service();
        let alice = dir.add_user("alice");
        let bob = dir.add_user("bob");
        let post = svc
            .create_post(
                &alice,
                PostInput {
                    content: "p".into(),
                    images: None,
                },
            )
            .unwrap();
        let c = svc.create_comment(&post.id, &bob, comment("mine")).unwrap();

        let err = svc.delete_comment(&c.id, &alice).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        svc.delete_comment(&c.id, &bob).unwrap();
        assert!(matches!(
            svc.delete_comment(&c.id, &bob).unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[test]
    fn deleting_a_post_orphans_its_comments_but_hides_the_thread() {
        let (svc, dir) = test_service();
        let alice = dir.add_user("alice");
        let post = svc
            .create_post(
                &alice,
                PostInput {
                    content: "ephemeral".into(),
                    images: None,
                },
            )
            .unwrap();
        svc.create_comment(&post.id, &alice, comment("left behind"))
            .unwrap();

        svc.delete_post(&post.id, &alice).unwrap();

        // The thread listing 404s because the post lookup comes first.
        let err = svc
            .list_comments(&post.id, &PageParams { page: 1, limit: 20 })
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // The orphaned row is still there, counted by the lenient helper.
        assert_eq!(svc.count_comments(&post.id).unwrap(), 1);
    }

    #[test]
    fn comment_view_names_its_post_and_author() {
        let (svc, dir) = test_service();
        let alice = dir.add_user("alice");
        let post = svc
            .create_post(
                &alice,
                PostInput {
                    content: "p".into(),
                    images: None,
                },
            )
            .unwrap();
        let view = svc.create_comment(&post.id, &alice, comment("hey")).unwrap();
        assert_eq!(view.post, post.id);
        assert_eq!(view.author.username, "alice");
    }
}
