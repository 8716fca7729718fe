//! Community feed read and write services.
//!
//! Posts live in the `"Community"` collection. A response never exists as
//! its own document; it is appended to its parent's `responses` list and
//! written back with the parent (full overwrite).

use std::sync::Arc;

use driftwood_core::{Page, PostId};
use tracing::{debug, instrument};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::gateway::{DocumentStore, from_doc, to_doc};
use crate::models::{Post, PostInput, PostThread};
use crate::paging::paginate;

/// Collection holding community posts.
pub(crate) const COMMUNITY_COLLECTION: &str = "Community";

// =============================================================================
// FeedReader
// =============================================================================

/// Paginated read access to the community feed.
#[derive(Clone)]
pub struct FeedReader {
    documents: Arc<dyn DocumentStore>,
    config: StoreConfig,
}

impl FeedReader {
    /// Create a feed reader over a document store.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, config: StoreConfig) -> Self {
        Self { documents, config }
    }

    /// List top-level posts, newest first, filtered and paged.
    ///
    /// # Errors
    ///
    /// Gateway and deserialization failures propagate.
    #[instrument(skip(self))]
    pub async fn list_posts(
        &self,
        filter: Option<&str>,
        page_index: Option<usize>,
    ) -> Result<Page<Post>> {
        let posts = self.fetch_sorted().await?;
        Ok(paginate(posts, filter, page_index, self.config.page_size))
    }

    /// The most recent posts, newest first, without paging metadata.
    /// Returns at most the configured highlights limit.
    ///
    /// # Errors
    ///
    /// Gateway and deserialization failures propagate.
    #[instrument(skip(self))]
    pub async fn top_posts(&self) -> Result<Vec<Post>> {
        let mut posts = self.fetch_sorted().await?;
        posts.truncate(self.config.top_posts_limit);
        Ok(posts)
    }

    /// Detail view of one post with its responses filtered and paged,
    /// newest first. The returned post carries only the selected page of
    /// responses. A missing post is `None`, not an error.
    ///
    /// # Errors
    ///
    /// Gateway and deserialization failures propagate.
    #[instrument(skip(self), fields(post_id = %post_id))]
    pub async fn post_details(
        &self,
        post_id: &PostId,
        filter: Option<&str>,
        page_index: Option<usize>,
    ) -> Result<Option<PostThread>> {
        let Some(doc) = self
            .documents
            .get(COMMUNITY_COLLECTION, post_id.as_str())
            .await?
        else {
            debug!("Post not found");
            return Ok(None);
        };

        let mut post: Post = from_doc(doc)?;

        let mut responses = std::mem::take(&mut post.responses);
        responses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let page = paginate(responses, filter, page_index, self.config.page_size);

        post.responses = page.items;
        Ok(Some(PostThread {
            post,
            total_pages: page.total_pages,
            selected_page: page.selected_page,
        }))
    }

    /// Fetch all posts, ordered descending by creation time.
    async fn fetch_sorted(&self) -> Result<Vec<Post>> {
        let docs = self.documents.list(COMMUNITY_COLLECTION).await?;
        let mut posts = docs
            .into_iter()
            .map(from_doc)
            .collect::<std::result::Result<Vec<Post>, _>>()?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }
}

// =============================================================================
// FeedWriter
// =============================================================================

/// Write access to the community feed.
#[derive(Clone)]
pub struct FeedWriter {
    documents: Arc<dyn DocumentStore>,
}

impl FeedWriter {
    /// Create a feed writer over a document store.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Create a top-level post from a submission and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty title or content.
    /// Gateway failures propagate.
    #[instrument(skip(self, input), fields(author = %input.author))]
    pub async fn create_post(&self, input: PostInput) -> Result<Post> {
        validate(&input)?;

        let post = Post::from_input(input);
        self.documents
            .create(COMMUNITY_COLLECTION, post.id.as_str(), to_doc(&post)?)
            .await?;
        Ok(post)
    }

    /// Create a response under an existing post.
    ///
    /// The response is appended to the parent's `responses` list and the
    /// parent is written back whole. A submission without a
    /// `parent_post_id` becomes a top-level post; it is never returned
    /// unpersisted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PostNotFound`] if the named parent does not
    /// exist, and [`StoreError::Validation`] for an empty title or
    /// content. Gateway failures propagate.
    #[instrument(skip(self, input), fields(author = %input.author))]
    pub async fn create_response(&self, input: PostInput) -> Result<Post> {
        let Some(parent_id) = input.parent_post_id.clone() else {
            return self.create_post(input).await;
        };
        validate(&input)?;

        let Some(doc) = self
            .documents
            .get(COMMUNITY_COLLECTION, parent_id.as_str())
            .await?
        else {
            return Err(StoreError::PostNotFound(parent_id));
        };
        let mut parent: Post = from_doc(doc)?;

        let response = Post::from_input(input);
        parent.responses.push(response.clone());

        self.documents
            .update(COMMUNITY_COLLECTION, parent.id.as_str(), to_doc(&parent)?)
            .await?;

        debug!(parent_id = %parent.id, "Appended response to parent");
        Ok(response)
    }
}

/// Reject submissions with empty required fields before any I/O.
fn validate(input: &PostInput) -> Result<()> {
    if input.title.trim().is_empty() {
        return Err(StoreError::Validation("title must not be empty".to_string()));
    }
    if input.content.trim().is_empty() {
        return Err(StoreError::Validation(
            "content must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use driftwood_core::UserId;

    use crate::gateway::InMemoryDocumentStore;

    use super::*;

    /// A post created `age_minutes` ago; larger means older.
    fn post(id: &str, age_minutes: i64, content_type: Option<&str>) -> Post {
        Post {
            id: PostId::from(id),
            title: format!("Post {id}"),
            content: "body".to_string(),
            content_type: content_type.map(str::to_string),
            content_url: None,
            media_description: None,
            author: UserId::from("u1"),
            created_at: Utc::now() - Duration::minutes(age_minutes),
            responses: Vec::new(),
        }
    }

    fn input(title: &str) -> PostInput {
        PostInput {
            parent_post_id: None,
            title: title.to_string(),
            content: "body".to_string(),
            content_type: Some("question".to_string()),
            content_url: None,
            media_description: None,
            author: UserId::from("u1"),
        }
    }

    async fn seed(documents: &InMemoryDocumentStore, posts: Vec<Post>) {
        for p in posts {
            documents
                .create(COMMUNITY_COLLECTION, p.id.as_str(), to_doc(&p).unwrap())
                .await
                .unwrap();
        }
    }

    fn reader(documents: &Arc<InMemoryDocumentStore>) -> FeedReader {
        FeedReader::new(documents.clone(), StoreConfig::default())
    }

    #[tokio::test]
    async fn list_posts_pages_newest_first() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        // post-0 is newest, post-11 oldest.
        seed(
            &documents,
            (0..12).map(|i| post(&format!("post-{i}"), i, None)).collect(),
        )
        .await;

        let page = reader(&documents).list_posts(None, Some(1)).await.unwrap();

        let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["post-5", "post-6", "post-7", "post-8", "post-9"]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.selected_page, 1);
    }

    #[tokio::test]
    async fn list_posts_filters_by_content_type() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        seed(
            &documents,
            vec![
                post("a", 0, Some("question")),
                post("b", 1, Some("announcement")),
                post("c", 2, Some("question-answered")),
            ],
        )
        .await;

        let page = reader(&documents)
            .list_posts(Some("question"), None)
            .await
            .unwrap();
        let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn top_posts_takes_the_newest_five() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        seed(
            &documents,
            (0..20).map(|i| post(&format!("post-{i}"), i, None)).collect(),
        )
        .await;

        let top = reader(&documents).top_posts().await.unwrap();
        let ids: Vec<&str> = top.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["post-0", "post-1", "post-2", "post-3", "post-4"]);
    }

    #[tokio::test]
    async fn post_details_pages_responses_newest_first() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let mut parent = post("parent", 60, None);
        // response-0 newest, response-6 oldest.
        parent.responses = (0..7)
            .map(|i| post(&format!("response-{i}"), i, None))
            .collect();
        seed(&documents, vec![parent]).await;

        let thread = reader(&documents)
            .post_details(&PostId::from("parent"), None, Some(1))
            .await
            .unwrap()
            .unwrap();

        let ids: Vec<&str> = thread.post.responses.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["response-5", "response-6"]);
        assert_eq!(thread.total_pages, 2);
        assert_eq!(thread.selected_page, 1);
    }

    #[tokio::test]
    async fn post_details_without_responses_has_zero_pages() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        seed(&documents, vec![post("lonely", 0, None)]).await;

        let thread = reader(&documents)
            .post_details(&PostId::from("lonely"), None, None)
            .await
            .unwrap()
            .unwrap();

        assert!(thread.post.responses.is_empty());
        assert_eq!(thread.total_pages, 0);
    }

    #[tokio::test]
    async fn missing_post_details_is_none() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let thread = reader(&documents)
            .post_details(&PostId::from("ghost"), None, None)
            .await
            .unwrap();
        assert!(thread.is_none());
    }

    #[tokio::test]
    async fn create_post_persists_and_returns_the_post() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let writer = FeedWriter::new(documents.clone());

        let created = writer.create_post(input("Mooring tips")).await.unwrap();

        let thread = reader(&documents)
            .post_details(&created.id, None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(thread.post.title, "Mooring tips");
    }

    #[tokio::test]
    async fn create_response_appends_exactly_one_entry() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        seed(&documents, vec![post("parent", 0, None)]).await;
        let writer = FeedWriter::new(documents.clone());

        let mut submission = input("Re: mooring");
        submission.parent_post_id = Some(PostId::from("parent"));
        let response = writer.create_response(submission).await.unwrap();

        let thread = reader(&documents)
            .post_details(&PostId::from("parent"), None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(thread.post.responses.len(), 1);
        assert_eq!(thread.post.responses[0].id, response.id);
    }

    #[tokio::test]
    async fn create_response_with_missing_parent_fails_and_persists_nothing() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let writer = FeedWriter::new(documents.clone());

        let mut submission = input("Re: nothing");
        submission.parent_post_id = Some(PostId::from("ghost"));
        let err = writer.create_response(submission).await.unwrap_err();

        assert!(matches!(err, StoreError::PostNotFound(_)));
        assert!(documents.list(COMMUNITY_COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_response_without_parent_becomes_top_level() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let writer = FeedWriter::new(documents.clone());

        let created = writer.create_response(input("Standalone")).await.unwrap();

        let page = reader(&documents).list_posts(None, None).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, created.id);
    }

    #[tokio::test]
    async fn empty_title_or_content_is_rejected() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let writer = FeedWriter::new(documents.clone());

        let err = writer.create_post(input("   ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let mut no_body = input("Title");
        no_body.content = String::new();
        let err = writer.create_post(no_body).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        assert!(documents.list(COMMUNITY_COLLECTION).await.unwrap().is_empty());
    }
}
