use serde::{Deserialize, Serialize};

use chirp_core::Author;

/// A post document, as stored in the `posts` table's JSON column.
///
/// The like-set is NOT part of this document — it lives in the
/// `post_likes` table so membership changes are single atomic statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,

    /// 1–280 chars, trimmed.
    pub content: String,

    /// Owning user id. Immutable after creation.
    pub author_id: String,

    /// Pre-hosted image URLs.
    #[serde(default)]
    pub images: Vec<String>,

    pub created_at: String,
    pub updated_at: String,
}

/// A comment document (`comments` table). Created and deleted, never
/// updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub post_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated post body (create and update share the shape).
#[derive(Debug, Clone)]
pub struct PostInput {
    pub content: String,
    /// `Some` replaces the image list wholesale; `None` leaves it alone.
    pub images: Option<Vec<String>>,
}

/// Validated comment body.
#[derive(Debug, Clone)]
pub struct CommentInput {
    pub content: String,
}

/// A post as clients see it: author projection joined in, like-set and
/// live comment count attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub content: String,
    pub author: Author,
    /// User ids in the like-set, in like order.
    pub likes: Vec<String>,
    pub likes_count: u64,
    pub comments_count: u64,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A comment as clients see it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub content: String,
    pub author: Author,
    /// Id of the post this comment belongs to.
    pub post: String,
    pub created_at: String,
    pub updated_at: String,
}
