pub mod comments;
pub mod posts;

use std::sync::Arc;

use chirp_core::{AuthorDirectory, ServiceError};
use chirp_sql::SqlStore;

/// The feed service: content store + thread assembler.
///
/// Takes its collaborators as constructor arguments — the SQL store for
/// persistence and an [`AuthorDirectory`] for the author projections it
/// embeds into every view.
pub struct FeedService {
    pub(crate) sql: Arc<dyn SqlStore>,
    pub(crate) authors: Arc<dyn AuthorDirectory>,
}

impl FeedService {
    /// Create a new FeedService, initializing the content tables.
    pub fn new(
        sql: Arc<dyn SqlStore>,
        authors: Arc<dyn AuthorDirectory>,
    ) -> Result<Arc<Self>, ServiceError> {
        init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, authors }))
    }
}

fn init_schema(sql: &dyn SqlStore) -> Result<(), ServiceError> {
    sql.exec_batch(&[
        "CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            author_id TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id, created_at)",

        // Like-set membership. The composite primary key makes
        // like/unlike single atomic statements (INSERT OR IGNORE /
        // DELETE), never read-modify-write.
        "CREATE TABLE IF NOT EXISTS post_likes (
            post_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            liked_at TEXT NOT NULL,
            PRIMARY KEY (post_id, user_id)
        )",

        "CREATE TABLE IF NOT EXISTS comments (
            id TEXT PRIMARY KEY,
            post_id TEXT NOT NULL,
            author_id TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id, created_at)",
    ])
    .map_err(|e| ServiceError::Storage(e.to_string()))
}
