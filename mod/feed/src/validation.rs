//! Request validation for the post and comment routes.
//!
//! Runs before authentication and before any store access. All violated
//! fields are reported in one joined message.

use serde::Deserialize;

use chirp_core::{is_valid_id, PageParams, ServiceError};

use crate::model::{CommentInput, PostInput};

/// Raw post body (create and update).
#[derive(Debug, Deserialize)]
pub struct RawPostBody {
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
}

/// Raw comment body.
#[derive(Debug, Deserialize)]
pub struct RawCommentBody {
    pub content: Option<String>,
}

/// Raw pagination query. Values arrive as strings; absent values take
/// the route default, present-but-invalid values fail.
#[derive(Debug, Default, Deserialize)]
pub struct RawPageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub fn post_body(raw: RawPostBody) -> Result<PostInput, ServiceError> {
    let mut problems = Vec::new();

    let content = raw.content.unwrap_or_default().trim().to_string();
    if content.is_empty() {
        problems.push("Post content cannot be empty".to_string());
    } else if content.chars().count() > 280 {
        problems.push("Post content cannot exceed 280 characters".to_string());
    }

    if let Some(images) = &raw.images {
        if images.iter().any(|url| !plausible_url(url)) {
            problems.push("Each image must be a valid URL".to_string());
        }
    }

    if !problems.is_empty() {
        return Err(ServiceError::Validation(problems.join(", ")));
    }

    Ok(PostInput {
        content,
        images: raw.images,
    })
}

pub fn comment_body(raw: RawCommentBody) -> Result<CommentInput, ServiceError> {
    let content = raw.content.unwrap_or_default().trim().to_string();
    if content.is_empty() {
        return Err(ServiceError::Validation(
            "Comment content cannot be empty".to_string(),
        ));
    }
    if content.chars().count() > 280 {
        return Err(ServiceError::Validation(
            "Comment content cannot exceed 280 characters".to_string(),
        ));
    }
    Ok(CommentInput { content })
}

/// Pagination window: `page >= 1`, `1 <= limit <= 100`.
pub fn page_params(
    raw: &RawPageQuery,
    default_limit: u64,
) -> Result<PageParams, ServiceError> {
    let mut problems = Vec::new();

    let page = match &raw.page {
        None => 1,
        Some(s) => match s.parse::<u64>() {
            Ok(p) if p >= 1 => p,
            _ => {
                problems.push("Page must be a number >= 1".to_string());
                1
            }
        },
    };

    let limit = match &raw.limit {
        None => default_limit,
        Some(s) => match s.parse::<u64>() {
            Ok(l) if l >= 1 && l <= 100 => l,
            Ok(l) if l > 100 => {
                problems.push("Limit too large".to_string());
                default_limit
            }
            _ => {
                problems.push("Limit must be >= 1".to_string());
                default_limit
            }
        },
    };

    if !problems.is_empty() {
        return Err(ServiceError::Validation(problems.join(", ")));
    }

    Ok(PageParams { page, limit })
}

pub fn post_id(id: &str) -> Result<(), ServiceError> {
    check_id(id, "Invalid post ID")
}

pub fn user_id(id: &str) -> Result<(), ServiceError> {
    check_id(id, "Invalid user ID")
}

pub fn comment_id(id: &str) -> Result<(), ServiceError> {
    check_id(id, "Invalid comment ID")
}

fn check_id(id: &str, message: &str) -> Result<(), ServiceError> {
    if !is_valid_id(id) {
        return Err(ServiceError::InvalidId(message.to_string()));
    }
    Ok(())
}

fn plausible_url(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://")) && url.len() > 8
}
