//! Reactions and comments on posts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use super::engagement::{Comment, Reaction, ReactionTally, ReactionType};
use super::error::Error;
use super::ids::{CommentId, PostId, UserId};
use super::pagination::{Page, PageOf};
use super::ports::{CommentRepository, PostRepository, ReactionRepository};
use super::visibility::can_view_post;

/// Reaction plus comment totals for a page of posts.
#[derive(Debug, Clone, Default)]
pub struct EngagementCounts {
    reactions: HashMap<PostId, i64>,
    comments: HashMap<PostId, i64>,
}

impl EngagementCounts {
    pub fn reactions_for(&self, post_id: PostId) -> i64 {
        self.reactions.get(&post_id).copied().unwrap_or(0)
    }

    pub fn comments_for(&self, post_id: PostId) -> i64 {
        self.comments.get(&post_id).copied().unwrap_or(0)
    }
}

pub struct EngagementService {
    reactions: Arc<dyn ReactionRepository>,
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl EngagementService {
    pub fn new(
        reactions: Arc<dyn ReactionRepository>,
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            reactions,
            comments,
            posts,
        }
    }

    pub async fn list_reaction_types(&self) -> Result<Vec<ReactionType>, Error> {
        Ok(self.reactions.list_types_active().await?)
    }

    /// React to a post. A second reaction by the same user switches the
    /// type instead of adding a row.
    pub async fn add_reaction(
        &self,
        user: UserId,
        post_id: PostId,
        type_key: &str,
    ) -> Result<Reaction, Error> {
        self.require_visible_post(post_id, user).await?;
        let reaction_type = self
            .reactions
            .find_type_by_key(type_key)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| Error::not_found("unknown reaction type"))?;

        if let Some(mut existing) = self
            .reactions
            .find_by_user_and_post(user, post_id)
            .await?
        {
            self.reactions
                .update_type(existing.id, reaction_type.id)
                .await?;
            existing.reaction_type_id = reaction_type.id;
            return Ok(existing);
        }

        let reaction = Reaction::new_for_post(user, post_id, reaction_type.id);
        self.reactions.insert(&reaction).await?;
        Ok(reaction)
    }

    pub async fn remove_reaction(&self, user: UserId, post_id: PostId) -> Result<(), Error> {
        let reaction = self
            .reactions
            .find_by_user_and_post(user, post_id)
            .await?
            .ok_or_else(|| Error::not_found("reaction not found"))?;
        self.reactions.delete(reaction.id).await?;
        Ok(())
    }

    /// Per-type tallies, aggregated at read time.
    pub async fn post_reactions(&self, post_id: PostId) -> Result<Vec<ReactionTally>, Error> {
        Ok(self.reactions.counts_by_type(post_id).await?)
    }

    pub async fn create_comment(
        &self,
        user: UserId,
        post_id: PostId,
        content: String,
        parent_id: Option<CommentId>,
    ) -> Result<Comment, Error> {
        if content.trim().is_empty() {
            return Err(Error::invalid_request("comment must not be empty"));
        }
        self.require_visible_post(post_id, user).await?;

        if let Some(parent) = parent_id {
            let parent_comment = self
                .comments
                .find_by_id(parent)
                .await?
                .ok_or_else(|| Error::invalid_request("parent comment does not exist"))?;
            if parent_comment.post_id != post_id {
                return Err(Error::invalid_request(
                    "parent comment belongs to a different post",
                ));
            }
        }

        let comment = Comment::new(post_id, user, content, parent_id);
        self.comments.insert(&comment).await?;
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        user: UserId,
        id: CommentId,
        content: String,
    ) -> Result<Comment, Error> {
        if content.trim().is_empty() {
            return Err(Error::invalid_request("comment must not be empty"));
        }
        let mut comment = self.owned_comment(user, id).await?;
        comment.content = content;
        comment.updated_at = Utc::now();
        self.comments.update(&comment).await?;
        Ok(comment)
    }

    pub async fn delete_comment(&self, user: UserId, id: CommentId) -> Result<(), Error> {
        self.owned_comment(user, id).await?;
        self.comments.delete(id).await?;
        Ok(())
    }

    pub async fn list_comments(
        &self,
        post_id: PostId,
        page: Page,
    ) -> Result<PageOf<Comment>, Error> {
        let items = self
            .comments
            .list_for_post(post_id, page.offset(), page.limit())
            .await?;
        let total = self.comments.count_for_post(post_id).await?;
        Ok(PageOf::new(items, total, page))
    }

    pub async fn reaction_count(&self, post_id: PostId) -> Result<i64, Error> {
        Ok(self.reactions.count_for_post(post_id).await?)
    }

    pub async fn comment_count(&self, post_id: PostId) -> Result<i64, Error> {
        Ok(self.comments.count_for_post(post_id).await?)
    }

    /// Batched totals for feed pages; two grouped queries instead of 2n.
    pub async fn engagement_counts(
        &self,
        post_ids: &[PostId],
    ) -> Result<EngagementCounts, Error> {
        if post_ids.is_empty() {
            return Ok(EngagementCounts::default());
        }
        let reactions = self.reactions.counts_for_posts(post_ids).await?;
        let comments = self.comments.counts_for_posts(post_ids).await?;
        Ok(EngagementCounts {
            reactions: reactions.into_iter().collect(),
            comments: comments.into_iter().collect(),
        })
    }

    async fn require_visible_post(&self, post_id: PostId, viewer: UserId) -> Result<(), Error> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| Error::not_found("post not found"))?;
        if !can_view_post(&post, Some(&viewer)) {
            return Err(Error::forbidden("you may not view this post"));
        }
        Ok(())
    }

    async fn owned_comment(&self, user: UserId, id: CommentId) -> Result<Comment, Error> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("comment not found"))?;
        if comment.author_user_id != user {
            return Err(Error::forbidden("only the author may modify this comment"));
        }
        Ok(comment)
    }
}
