use chirp_core::{
    is_valid_id, new_id, now_rfc3339, Page, PageParams, Paginated, ServiceError,
};
use chirp_sql::Value;

use crate::model::{Post, PostInput, PostView};
use crate::service::FeedService;

impl FeedService {
    /// Create a post owned by `author_id`.
    pub fn create_post(
        &self,
        author_id: &str,
        input: PostInput,
    ) -> Result<PostView, ServiceError> {
        let now = now_rfc3339();
        let post = Post {
            id: new_id(),
            content: input.content,
            author_id: author_id.to_string(),
            images: input.images.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let data = serde_json::to_string(&post)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.sql
            .exec(
                "INSERT INTO posts (id, author_id, data, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                &[
                    Value::Text(post.id.clone()),
                    Value::Text(post.author_id.clone()),
                    Value::Text(data),
                    Value::Text(now),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");
        self.assemble_required(post)
    }

    /// Get a single post, decorated with its live comment count.
    pub fn get_post(&self, id: &str) -> Result<PostView, ServiceError> {
        if !is_valid_id(id) {
            return Err(ServiceError::InvalidId("Invalid post ID".to_string()));
        }
        let post = self
            .fetch_post(id)?
            .ok_or_else(|| ServiceError::NotFound("Post not found".to_string()))?;
        self.assemble_required(post)
    }

    /// List all posts, newest first.
    pub fn list_posts(
        &self,
        params: &PageParams,
    ) -> Result<Paginated<PostView>, ServiceError> {
        self.list_page("SELECT COUNT(*) AS cnt FROM posts",
                       "SELECT data FROM posts ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
                       &[], params)
    }

    /// List one author's posts, newest first.
    ///
    /// An unknown author is `NotFound`; an author with zero posts gets an
    /// empty page.
    pub fn list_posts_by_author(
        &self,
        user_id: &str,
        params: &PageParams,
    ) -> Result<Paginated<PostView>, ServiceError> {
        if !is_valid_id(user_id) {
            return Err(ServiceError::InvalidId("Invalid user ID".to_string()));
        }
        if self.authors.author(user_id)?.is_none() {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }
        self.list_page(
            "SELECT COUNT(*) AS cnt FROM posts WHERE author_id = ?1",
            "SELECT data FROM posts WHERE author_id = ?1
             ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
            &[Value::Text(user_id.to_string())],
            params,
        )
    }

    /// Replace a post's content (and image list, when provided).
    /// Ownership-checked.
    pub fn update_post(
        &self,
        id: &str,
        caller_id: &str,
        input: PostInput,
    ) -> Result<PostView, ServiceError> {
        let mut post = self.owned_post(id, caller_id, "update")?;

        post.content = input.content;
        if let Some(images) = input.images {
            post.images = images;
        }
        post.updated_at = now_rfc3339();

        let data = serde_json::to_string(&post)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.sql
            .exec(
                "UPDATE posts SET data = ?1 WHERE id = ?2",
                &[Value::Text(data), Value::Text(post.id.clone())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        self.assemble_required(post)
    }

    /// Hard-delete a post and its like rows. Ownership-checked.
    ///
    /// Comments referencing the post are intentionally NOT cascaded;
    /// they stay readable by id but unreachable through the thread
    /// listing (the post lookup 404s first).
    pub fn delete_post(&self, id: &str, caller_id: &str) -> Result<(), ServiceError> {
        let post = self.owned_post(id, caller_id, "delete")?;

        self.sql
            .exec(
                "DELETE FROM posts WHERE id = ?1",
                &[Value::Text(post.id.clone())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        self.sql
            .exec(
                "DELETE FROM post_likes WHERE post_id = ?1",
                &[Value::Text(post.id.clone())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        tracing::info!(post_id = %post.id, "post deleted");
        Ok(())
    }

    /// Add the caller to the like-set. One atomic insert; a second like
    /// by the same user fails with `AlreadyLiked`.
    pub fn like_post(&self, id: &str, caller_id: &str) -> Result<PostView, ServiceError> {
        if !is_valid_id(id) {
            return Err(ServiceError::InvalidId("Invalid post ID".to_string()));
        }
        if self.fetch_post(id)?.is_none() {
            return Err(ServiceError::NotFound("Post not found".to_string()));
        }

        let added = self
            .sql
            .exec(
                "INSERT OR IGNORE INTO post_likes (post_id, user_id, liked_at)
                 VALUES (?1, ?2, ?3)",
                &[
                    Value::Text(id.to_string()),
                    Value::Text(caller_id.to_string()),
                    Value::Text(now_rfc3339()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        if added == 0 {
            return Err(ServiceError::AlreadyLiked);
        }

        self.get_post(id)
    }

    /// Remove the caller from the like-set. Idempotent: a no-op delete
    /// still returns the freshly-read post, unchanged and without error.
    pub fn unlike_post(&self, id: &str, caller_id: &str) -> Result<PostView, ServiceError> {
        if !is_valid_id(id) {
            return Err(ServiceError::InvalidId("Invalid post ID".to_string()));
        }
        if self.fetch_post(id)?.is_none() {
            return Err(ServiceError::NotFound("Post not found".to_string()));
        }

        self.sql
            .exec(
                "DELETE FROM post_likes WHERE post_id = ?1 AND user_id = ?2",
                &[
                    Value::Text(id.to_string()),
                    Value::Text(caller_id.to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        self.get_post(id)
    }

    // ── Internals ──

    /// Fetch a post document by id (no id-shape check, no decoration).
    pub(crate) fn fetch_post(&self, id: &str) -> Result<Option<Post>, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT data FROM posts WHERE id = ?1",
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

    /// Fetch a post and verify the caller owns it.
    ///
    /// The ownership check is a separate step from authentication and is
    /// never skipped: authenticated non-owners get `Forbidden`.
    fn owned_post(
        &self,
        id: &str,
        caller_id: &str,
        action: &str,
    ) -> Result<Post, ServiceError> {
        if !is_valid_id(id) {
            return Err(ServiceError::InvalidId("Invalid post ID".to_string()));
        }
        let post = self
            .fetch_post(id)?
            .ok_or_else(|| ServiceError::NotFound("Post not found".to_string()))?;
        if post.author_id != caller_id {
            return Err(ServiceError::Forbidden(format!(
                "You are not authorized to {} this post",
                action
            )));
        }
        Ok(post)
    }

    /// The like-set, in like order.
    fn likes_of(&self, post_id: &str) -> Result<Vec<String>, ServiceError> {
        let rows = self
            .sql
            .query(
                // rowid breaks ties when two likes share a timestamp.
                "SELECT user_id FROM post_likes WHERE post_id = ?1
                 ORDER BY liked_at, rowid",
                &[Value::Text(post_id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get_str("user_id").map(str::to_string))
            .collect())
    }

    /// Join the author projection and attach the like-set and the live
    /// comment count. Returns `None` when the author record has
    /// vanished (listings skip such posts).
    fn assemble(&self, post: Post) -> Result<Option<PostView>, ServiceError> {
        let Some(author) = self.authors.author(&post.author_id)? else {
            return Ok(None);
        };
        let likes = self.likes_of(&post.id)?;
        let comments_count = self.count_comments(&post.id)?;
        Ok(Some(PostView {
            id: post.id,
            content: post.content,
            author,
            likes_count: likes.len() as u64,
            likes,
            comments_count,
            images: post.images,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }))
    }

    fn assemble_required(&self, post: Post) -> Result<PostView, ServiceError> {
        self.assemble(post)?
            .ok_or_else(|| ServiceError::Internal("post author record missing".to_string()))
    }

    /// Shared pagination: fresh count, then one window of documents,
    /// assembled into views. `totalPages` is recomputed every call.
    fn list_page(
        &self,
        count_sql: &str,
        select_sql: &str,
        filter: &[Value],
        params: &PageParams,
    ) -> Result<Paginated<PostView>, ServiceError> {
        let count_rows = self
            .sql
            .query(count_sql, filter)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as u64;

        let mut query_params = filter.to_vec();
        query_params.push(Value::Integer(params.limit as i64));
        // Saturated offsets can exceed i64; clamp rather than wrap.
        query_params.push(Value::Integer(
            i64::try_from(params.offset()).unwrap_or(i64::MAX),
        ));

        let rows = self
            .sql
            .query(select_sql, &query_params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut data = Vec::new();
        for row in &rows {
            let doc = row
                .get_str("data")
                .ok_or_else(|| ServiceError::Internal("missing data column".to_string()))?;
            let post: Post = serde_json::from_str(doc)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            if let Some(view) = self.assemble(post)? {
                data.push(view);
            }
        }

        Ok(Paginated {
            data,
            pagination: Page::new(params, total),
        })
    }
}
