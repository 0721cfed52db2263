//! Post authoring, lifecycle mutation, and gated reads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::error::Error;
use super::ids::{CompanyId, GroupId, MediaAssetId, PostId, UserId};
use super::media::MediaAsset;
use super::pagination::{Page, PageOf};
use super::ports::{
    AssistClient, CompanyRepository, GroupRepository, MediaRepository, ModerationDecision,
    PostRepository,
};
use super::post::{
    ContentFormat, ModerationStatus, Post, PostAuthor, PostKind, PostStatus, PostVisibility,
};
use super::visibility::can_view_post;

/// Post creation fields.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    /// Author as a company page instead of the calling user.
    pub company_id: Option<CompanyId>,
    pub group_id: Option<GroupId>,
    pub kind: PostKind,
    pub content: Option<String>,
    pub content_markdown: Option<String>,
    pub content_format: ContentFormat,
    pub link_url: Option<String>,
    pub link_title: Option<String>,
    pub link_description: Option<String>,
    pub link_image_url: Option<String>,
    pub visibility: PostVisibility,
    pub repost_of_post_id: Option<PostId>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub media_ids: Vec<MediaAssetId>,
    pub publish_now: bool,
}

/// Partial post update.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub content: Option<String>,
    pub content_markdown: Option<String>,
    pub visibility: Option<PostVisibility>,
    pub link_url: Option<String>,
    pub link_title: Option<String>,
    pub link_description: Option<String>,
    pub media_ids: Option<Vec<MediaAssetId>>,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    media: Arc<dyn MediaRepository>,
    companies: Arc<dyn CompanyRepository>,
    groups: Arc<dyn GroupRepository>,
    assist: Arc<dyn AssistClient>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        media: Arc<dyn MediaRepository>,
        companies: Arc<dyn CompanyRepository>,
        groups: Arc<dyn GroupRepository>,
        assist: Arc<dyn AssistClient>,
    ) -> Self {
        Self {
            posts,
            media,
            companies,
            groups,
            assist,
        }
    }

    /// Create a post, screen its content, and attach media.
    pub async fn create_post(
        &self,
        user_id: UserId,
        input: CreatePostInput,
    ) -> Result<Post, Error> {
        let has_body = input
            .content
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
            || input
                .content_markdown
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty());
        if !has_body && input.link_url.is_none() && input.media_ids.is_empty() {
            return Err(Error::invalid_request(
                "a post needs content, a link, or media",
            ));
        }

        let author = match input.company_id {
            Some(company_id) => {
                self.require_company_member(company_id, user_id).await?;
                PostAuthor::Company(company_id)
            }
            None => PostAuthor::User(user_id),
        };

        if let Some(group_id) = input.group_id {
            self.require_group_member(group_id, user_id).await?;
        }
        if let Some(repost_id) = input.repost_of_post_id {
            if self.posts.find_by_id(repost_id).await?.is_none() {
                return Err(Error::invalid_request("reposted post does not exist"));
            }
        }
        self.require_owned_media(user_id, &input.media_ids).await?;

        let moderation_status = self
            .moderate(input.content.as_deref(), input.content_markdown.as_deref())
            .await;

        let now = Utc::now();
        let (status, published_at) = if input.publish_now {
            (PostStatus::Published, Some(now))
        } else if input.scheduled_at.is_some() {
            (PostStatus::Scheduled, None)
        } else {
            (PostStatus::Draft, None)
        };

        let post = Post {
            id: PostId::random(),
            author,
            group_id: input.group_id,
            kind: input.kind,
            status,
            content_format: input.content_format,
            content: input.content,
            content_markdown: input.content_markdown,
            link_url: input.link_url,
            link_title: input.link_title,
            link_description: input.link_description,
            link_image_url: input.link_image_url,
            visibility: input.visibility,
            repost_of_post_id: input.repost_of_post_id,
            moderation_status,
            scheduled_at: input.scheduled_at,
            published_at,
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(&post, &input.media_ids).await?;
        info!(post_id = %post.id, status = status.as_str(), "created post");
        Ok(post)
    }

    /// Author-only partial update. A provided media set replaces the old one.
    pub async fn update_post(
        &self,
        user_id: UserId,
        id: PostId,
        changes: UpdatePostInput,
    ) -> Result<Post, Error> {
        let mut post = self.require_post(id).await?;
        self.require_author(&post, user_id).await?;

        if let Some(content) = changes.content {
            post.content = Some(content);
        }
        if let Some(markdown) = changes.content_markdown {
            post.content_markdown = Some(markdown);
        }
        if let Some(visibility) = changes.visibility {
            post.visibility = visibility;
        }
        if let Some(link_url) = changes.link_url {
            post.link_url = Some(link_url);
        }
        if let Some(link_title) = changes.link_title {
            post.link_title = Some(link_title);
        }
        if let Some(link_description) = changes.link_description {
            post.link_description = Some(link_description);
        }

        post.moderation_status = self
            .moderate(post.content.as_deref(), post.content_markdown.as_deref())
            .await;
        post.updated_at = Utc::now();
        self.posts.update(&post).await?;

        if let Some(media_ids) = changes.media_ids {
            self.require_owned_media(user_id, &media_ids).await?;
            self.posts.replace_media(id, &media_ids).await?;
        }
        Ok(post)
    }

    pub async fn delete_post(&self, user_id: UserId, id: PostId) -> Result<(), Error> {
        let post = self.require_post(id).await?;
        self.require_author(&post, user_id).await?;
        self.posts.delete(id).await?;
        info!(post_id = %id, "deleted post");
        Ok(())
    }

    /// A post by id, gated by the visibility evaluator.
    pub async fn get_post(&self, id: PostId, viewer: Option<UserId>) -> Result<Post, Error> {
        let post = self.require_post(id).await?;
        if !can_view_post(&post, viewer.as_ref()) {
            return Err(Error::forbidden("you may not view this post"));
        }
        Ok(post)
    }

    /// Posts authored by a user, visibility filtered per item.
    pub async fn list_posts_by_user(
        &self,
        author: UserId,
        viewer: Option<UserId>,
        page: Page,
    ) -> Result<PageOf<Post>, Error> {
        let posts = self
            .posts
            .list_by_author_user(author, page.offset(), page.limit())
            .await?;
        let total = self.posts.count_by_author_user(author).await?;
        let visible = posts
            .into_iter()
            .filter(|post| can_view_post(post, viewer.as_ref()))
            .collect();
        Ok(PageOf::new(visible, total, page))
    }

    pub async fn publish_post(&self, user_id: UserId, id: PostId) -> Result<Post, Error> {
        let mut post = self.require_post(id).await?;
        self.require_author(&post, user_id).await?;
        post.status = PostStatus::Published;
        post.published_at = Some(Utc::now());
        post.updated_at = Utc::now();
        self.posts.update(&post).await?;
        Ok(post)
    }

    pub async fn archive_post(&self, user_id: UserId, id: PostId) -> Result<Post, Error> {
        let mut post = self.require_post(id).await?;
        self.require_author(&post, user_id).await?;
        post.status = PostStatus::Archived;
        post.updated_at = Utc::now();
        self.posts.update(&post).await?;
        Ok(post)
    }

    /// Media attached to a post the viewer may see.
    pub async fn post_media(
        &self,
        id: PostId,
        viewer: Option<UserId>,
    ) -> Result<Vec<MediaAsset>, Error> {
        self.get_post(id, viewer).await?;
        Ok(self.posts.media_for_post(id).await?)
    }

    /// Screen content through the advisory service. Advisory failures never
    /// block publication; the content is approved and the failure logged.
    async fn moderate(
        &self,
        content: Option<&str>,
        markdown: Option<&str>,
    ) -> ModerationStatus {
        let text = match (content, markdown) {
            (Some(c), _) if !c.trim().is_empty() => c,
            (_, Some(m)) if !m.trim().is_empty() => m,
            _ => return ModerationStatus::Approved,
        };
        if !self.assist.is_enabled() {
            return ModerationStatus::Approved;
        }
        match self.assist.check_content(text).await {
            Ok(ModerationDecision::Block) => ModerationStatus::Removed,
            Ok(ModerationDecision::Warn) => ModerationStatus::Flagged,
            Ok(ModerationDecision::Allow) => ModerationStatus::Approved,
            Err(err) => {
                warn!(error = %err, "content screening unavailable, approving");
                ModerationStatus::Approved
            }
        }
    }

    async fn require_post(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("post not found"))
    }

    /// Users act for their own posts; company posts require membership.
    async fn require_author(&self, post: &Post, user_id: UserId) -> Result<(), Error> {
        match post.author {
            PostAuthor::User(author) if author == user_id => Ok(()),
            PostAuthor::User(_) => Err(Error::forbidden("only the author may modify this post")),
            PostAuthor::Company(company_id) => {
                self.require_company_member(company_id, user_id).await
            }
        }
    }

    async fn require_company_member(
        &self,
        company_id: CompanyId,
        user_id: UserId,
    ) -> Result<(), Error> {
        if self
            .companies
            .find_membership(company_id, user_id)
            .await?
            .is_none()
        {
            return Err(Error::forbidden("you are not a member of this company"));
        }
        Ok(())
    }

    async fn require_group_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<(), Error> {
        if self
            .groups
            .find_membership(group_id, user_id)
            .await?
            .is_none()
        {
            return Err(Error::forbidden("you are not a member of this group"));
        }
        Ok(())
    }

    async fn require_owned_media(
        &self,
        user_id: UserId,
        media_ids: &[MediaAssetId],
    ) -> Result<(), Error> {
        for &media_id in media_ids {
            let asset = self
                .media
                .find_by_id(media_id)
                .await?
                .ok_or_else(|| Error::invalid_request("attached media does not exist"))?;
            if asset.owner_user_id != user_id {
                return Err(Error::invalid_request("attached media does not exist"));
            }
        }
        Ok(())
    }
}
