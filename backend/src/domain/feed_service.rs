//! Feed composition over the follow graph.

use std::sync::Arc;

use super::error::Error;
use super::ids::{GroupId, UserId};
use super::pagination::{Page, PageOf};
use super::ports::{FeedQuery, FollowRepository, GroupRepository, PostRepository};
use super::post::Post;
use super::visibility::can_view_post;

pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    follows: Arc<dyn FollowRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        follows: Arc<dyn FollowRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self {
            posts,
            follows,
            groups,
        }
    }

    /// The viewer's personalised feed: published posts from followed users,
    /// followed companies, and the viewer themselves, newest first.
    ///
    /// A viewer with zero follows still sees their own posts; the author
    /// filter always contains at least the viewer id.
    pub async fn get_feed(&self, viewer: UserId, page: Page) -> Result<PageOf<Post>, Error> {
        let mut author_user_ids = self.follows.followed_user_ids(viewer).await?;
        if !author_user_ids.contains(&viewer) {
            author_user_ids.push(viewer);
        }
        let author_company_ids = self.follows.followed_company_ids(viewer).await?;

        let query = FeedQuery {
            author_user_ids,
            author_company_ids,
        };
        let items = self
            .posts
            .list_feed(&query, page.offset(), page.limit())
            .await?;
        let total = self.posts.count_feed(&query).await?;
        Ok(PageOf::new(items, total, page))
    }

    /// Published public posts regardless of the follow graph.
    pub async fn get_public_feed(&self, page: Page) -> Result<PageOf<Post>, Error> {
        let items = self
            .posts
            .list_public_feed(page.offset(), page.limit())
            .await?;
        let total = self.posts.count_public_feed().await?;
        Ok(PageOf::new(items, total, page))
    }

    /// Posts within a group. Private and invite-only groups require
    /// membership; each item is visibility checked for the viewer.
    pub async fn get_group_feed(
        &self,
        group_id: GroupId,
        viewer: UserId,
        page: Page,
    ) -> Result<PageOf<Post>, Error> {
        let group = self
            .groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| Error::not_found("group not found"))?;
        if group.visibility != super::group::GroupVisibility::Public {
            let membership = self.groups.find_membership(group_id, viewer).await?;
            if membership.is_none() {
                return Err(Error::forbidden("you are not a member of this group"));
            }
        }

        let items = self
            .posts
            .list_group_feed(group_id, page.offset(), page.limit())
            .await?;
        let total = self.posts.count_group_feed(group_id).await?;
        let visible = items
            .into_iter()
            .filter(|post| can_view_post(post, Some(&viewer)))
            .collect();
        Ok(PageOf::new(visible, total, page))
    }
}
