//! Visibility evaluation: pure read-access decisions for content items.
//!
//! No side effects; each function is a pure function of the content item and
//! the optional viewer identity. Inbound handlers and the feed composer call
//! these before returning content.

use super::ids::UserId;
use super::post::{ModerationStatus, Post, PostStatus, PostVisibility};
use super::profile::{Profile, ProfileVisibility};

/// Decide whether `viewer` may read `post`.
///
/// The author always may. Non-owners only see published, non-removed posts,
/// gated by the visibility tier. The connections tier currently admits only
/// the owner; the connection graph is deliberately not consulted.
pub fn can_view_post(post: &Post, viewer: Option<&UserId>) -> bool {
    if let (Some(viewer), Some(author)) = (viewer, post.author.user_id().as_ref()) {
        if viewer == author {
            return true;
        }
    }

    if post.status != PostStatus::Published {
        return false;
    }
    if post.moderation_status == ModerationStatus::Removed {
        return false;
    }

    match post.visibility {
        PostVisibility::Public => true,
        PostVisibility::LoggedIn => viewer.is_some(),
        PostVisibility::Connections => false,
    }
}

/// Decide whether `viewer` may read `profile`.
///
/// Mirrors [`can_view_post`] minus the publication/moderation gate, which
/// does not apply to profiles.
pub fn can_view_profile(profile: &Profile, viewer: Option<&UserId>) -> bool {
    if let (Some(viewer), Some(owner)) = (viewer, profile.owner.user_id().as_ref()) {
        if viewer == owner {
            return true;
        }
    }

    match profile.visibility {
        ProfileVisibility::Public => true,
        ProfileVisibility::LoggedIn => viewer.is_some(),
        ProfileVisibility::Connections => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::PostId;
    use crate::domain::post::{ContentFormat, PostAuthor, PostKind};
    use crate::domain::profile::ProfileOwner;
    use chrono::Utc;

    fn post(author: UserId, status: PostStatus, visibility: PostVisibility) -> Post {
        let now = Utc::now();
        Post {
            id: PostId::random(),
            author: PostAuthor::User(author),
            group_id: None,
            kind: PostKind::Post,
            status,
            content_format: ContentFormat::Plain,
            content: Some("hello".into()),
            content_markdown: None,
            link_url: None,
            link_title: None,
            link_description: None,
            link_image_url: None,
            visibility,
            repost_of_post_id: None,
            moderation_status: ModerationStatus::Approved,
            scheduled_at: None,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_always_sees_their_post() {
        let owner = UserId::random();
        for status in [PostStatus::Draft, PostStatus::Archived, PostStatus::Published] {
            let p = post(owner, status, PostVisibility::Connections);
            assert!(can_view_post(&p, Some(&owner)));
        }
    }

    #[test]
    fn owner_sees_removed_post() {
        let owner = UserId::random();
        let mut p = post(owner, PostStatus::Published, PostVisibility::Public);
        p.moderation_status = ModerationStatus::Removed;
        assert!(can_view_post(&p, Some(&owner)));
    }

    #[test]
    fn stranger_denied_unpublished_post() {
        let stranger = UserId::random();
        for status in [PostStatus::Draft, PostStatus::Scheduled, PostStatus::Archived] {
            let p = post(UserId::random(), status, PostVisibility::Public);
            assert!(!can_view_post(&p, Some(&stranger)));
        }
    }

    #[test]
    fn stranger_denied_removed_post() {
        let mut p = post(
            UserId::random(),
            PostStatus::Published,
            PostVisibility::Public,
        );
        p.moderation_status = ModerationStatus::Removed;
        assert!(!can_view_post(&p, Some(&UserId::random())));
        assert!(!can_view_post(&p, None));
    }

    #[test]
    fn public_post_visible_to_anyone() {
        let p = post(
            UserId::random(),
            PostStatus::Published,
            PostVisibility::Public,
        );
        assert!(can_view_post(&p, None));
        assert!(can_view_post(&p, Some(&UserId::random())));
    }

    #[test]
    fn logged_in_post_requires_a_viewer() {
        let p = post(
            UserId::random(),
            PostStatus::Published,
            PostVisibility::LoggedIn,
        );
        assert!(!can_view_post(&p, None));
        assert!(can_view_post(&p, Some(&UserId::random())));
    }

    #[test]
    fn connections_post_admits_owner_only() {
        let owner = UserId::random();
        let p = post(owner, PostStatus::Published, PostVisibility::Connections);
        assert!(can_view_post(&p, Some(&owner)));
        assert!(!can_view_post(&p, Some(&UserId::random())));
        assert!(!can_view_post(&p, None));
    }

    #[test]
    fn profile_visibility_tiers() {
        let owner = UserId::random();
        let mut profile = Profile::new_for_user(owner);

        assert!(can_view_profile(&profile, None));

        profile.visibility = ProfileVisibility::LoggedIn;
        assert!(!can_view_profile(&profile, None));
        assert!(can_view_profile(&profile, Some(&UserId::random())));

        profile.visibility = ProfileVisibility::Connections;
        assert!(can_view_profile(&profile, Some(&owner)));
        assert!(!can_view_profile(&profile, Some(&UserId::random())));
    }

    #[test]
    fn company_profile_has_no_user_owner_shortcut() {
        let mut profile = Profile::new_for_user(UserId::random());
        profile.owner = ProfileOwner::Company(crate::domain::ids::CompanyId::random());
        profile.visibility = ProfileVisibility::Connections;
        assert!(!can_view_profile(&profile, Some(&UserId::random())));
    }
}
