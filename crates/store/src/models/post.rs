//! Community feed entities.
//!
//! A post and its responses share one shape: a response is a `Post` held
//! in its parent's `responses` list. Nesting is a single level deep as a
//! product decision; responses do not carry responses of their own, the
//! field on them stays empty.

use chrono::{DateTime, Utc};
use driftwood_core::{PostId, UserId};
use serde::{Deserialize, Serialize};

use crate::paging::PageItem;

/// A community post, top-level or response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub id: PostId,
    /// Post title.
    pub title: String,
    /// Body content.
    pub content: String,
    /// Free content-type tag used for feed filtering (e.g. "question").
    #[serde(default)]
    pub content_type: Option<String>,
    /// Attached media URL.
    #[serde(default)]
    pub content_url: Option<String>,
    /// Description of the attached media.
    #[serde(default)]
    pub media_description: Option<String>,
    /// Author identifier.
    pub author: UserId,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// Ordered responses to this post, same shape as the post itself.
    #[serde(default)]
    pub responses: Vec<Post>,
}

/// Submission shape for creating a post or a response.
#[derive(Debug, Clone, Deserialize)]
pub struct PostInput {
    /// Present when this submission is a response to an existing post.
    #[serde(default)]
    pub parent_post_id: Option<PostId>,
    /// Post title.
    pub title: String,
    /// Body content.
    pub content: String,
    /// Free content-type tag.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Attached media URL.
    #[serde(default)]
    pub content_url: Option<String>,
    /// Description of the attached media.
    #[serde(default)]
    pub media_description: Option<String>,
    /// Author identifier.
    pub author: UserId,
}

impl Post {
    /// Build a fresh post from a submission: mints the id, stamps the
    /// creation time, copies the author/content/media fields. The input's
    /// `parent_post_id` is routing information and is not copied.
    #[must_use]
    pub fn from_input(input: PostInput) -> Self {
        Self {
            id: PostId::mint(),
            title: input.title,
            content: input.content,
            content_type: input.content_type,
            content_url: input.content_url,
            media_description: input.media_description,
            author: input.author,
            created_at: Utc::now(),
            responses: Vec::new(),
        }
    }
}

impl PageItem for Post {
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

/// Detail view of a single post: the post with its `responses` replaced by
/// the currently selected page slice, plus the pagination metadata for
/// that slice.
#[derive(Debug, Clone, Serialize)]
pub struct PostThread {
    /// The post; `responses` holds only the selected page's items.
    pub post: Post,
    /// Total response pages under the active filter.
    pub total_pages: usize,
    /// The 0-based selected response page.
    pub selected_page: usize,
}
