//! Diesel row types and their domain conversions.
//!
//! Identifiers are generated application-side, so most tables use a single
//! struct for both reads and inserts. Enum columns are stored as text; an
//! unrecognised value is logged and falls back to the most restrictive
//! variant rather than failing the whole read.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::domain::analytics::AnalyticsEvent;
use crate::domain::company::{Company, CompanyMember, CompanyMemberRole};
use crate::domain::engagement::{Comment, Reaction, ReactionType};
use crate::domain::group::{Group, GroupMember, GroupMemberRole, GroupVisibility};
use crate::domain::ids::{
    CommentId, CompanyId, ConnectionId, ExperienceId, FollowId, GroupId, MediaAssetId,
    MessageId, PostId, ProfileId, ReactionId, ReactionTypeId, ThreadId, UserId,
};
use crate::domain::media::{MediaAsset, MediaType};
use crate::domain::messaging::{Message, MessageThread, ThreadParticipant, ThreadType};
use crate::domain::networking::{Connection, ConnectionStatus, Follow, FollowTarget};
use crate::domain::post::{
    ContentFormat, ModerationStatus, Post, PostAuthor, PostKind, PostStatus, PostVisibility,
};
use crate::domain::profile::{Experience, Profile, ProfileOwner, ProfileVisibility};
use crate::domain::user::{User, UserStatus};

use super::schema::{
    analytics_events, comments, companies, company_members, connections, follows,
    group_members, groups, media_assets, message_threads, messages, post_media, posts,
    profile_experiences, profiles, reaction_types, reactions, thread_participants, users,
};

fn parse_or<T: Copy>(value: &str, parse: impl Fn(&str) -> Option<T>, fallback: T, column: &str) -> T {
    parse(value).unwrap_or_else(|| {
        warn!(value, column, "unrecognised enum value, using fallback");
        fallback
    })
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub display_name: String,
    pub password_hash: String,
    pub status: String,
    pub roles: Vec<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id.into(),
            email: user.email.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            password_hash: user.password_hash.clone(),
            status: user.status.as_str().to_owned(),
            roles: user.roles.clone(),
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn into_domain(self) -> User {
        let status = parse_or(&self.status, UserStatus::parse, UserStatus::Suspended, "users.status");
        User {
            id: UserId::from_uuid(self.id),
            email: self.email,
            username: self.username,
            display_name: self.display_name,
            password_hash: self.password_hash,
            status,
            roles: self.roles,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompanyRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub owner_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRow {
    pub fn from_domain(company: &Company) -> Self {
        Self {
            id: company.id.into(),
            name: company.name.clone(),
            slug: company.slug.clone(),
            description: company.description.clone(),
            owner_user_id: company.owner_user_id.into(),
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }

    pub fn into_domain(self) -> Company {
        Company {
            id: CompanyId::from_uuid(self.id),
            name: self.name,
            slug: self.slug,
            description: self.description,
            owner_user_id: UserId::from_uuid(self.owner_user_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = company_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompanyMemberRow {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl CompanyMemberRow {
    pub fn from_domain(member: &CompanyMember) -> Self {
        Self {
            company_id: member.company_id.into(),
            user_id: member.user_id.into(),
            role: member.role.as_str().to_owned(),
            joined_at: member.joined_at,
        }
    }

    pub fn into_domain(self) -> CompanyMember {
        let role = parse_or(
            &self.role,
            CompanyMemberRole::parse,
            CompanyMemberRole::Member,
            "company_members.role",
        );
        CompanyMember {
            company_id: CompanyId::from_uuid(self.company_id),
            user_id: UserId::from_uuid(self.user_id),
            role,
            joined_at: self.joined_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub website_url: Option<String>,
    pub visibility: String,
    pub avatar_media_id: Option<Uuid>,
    pub banner_media_id: Option<Uuid>,
    pub skill_ids: Vec<Uuid>,
    pub service_ids: Vec<Uuid>,
    pub niche_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    pub fn from_domain(profile: &Profile) -> Self {
        let (user_id, company_id) = match profile.owner {
            ProfileOwner::User(id) => (Some(id.into()), None),
            ProfileOwner::Company(id) => (None, Some(id.into())),
        };
        Self {
            id: profile.id.into(),
            user_id,
            company_id,
            headline: profile.headline.clone(),
            about: profile.about.clone(),
            location: profile.location.clone(),
            website_url: profile.website_url.clone(),
            visibility: profile.visibility.as_str().to_owned(),
            avatar_media_id: profile.avatar_media_id.map(Into::into),
            banner_media_id: profile.banner_media_id.map(Into::into),
            skill_ids: profile.skill_ids.clone(),
            service_ids: profile.service_ids.clone(),
            niche_ids: profile.niche_ids.clone(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }

    /// Fails when the row violates the owner arc (neither side set).
    pub fn into_domain(self) -> Result<Profile, String> {
        let owner = match (self.user_id, self.company_id) {
            (Some(user_id), _) => ProfileOwner::User(UserId::from_uuid(user_id)),
            (None, Some(company_id)) => ProfileOwner::Company(CompanyId::from_uuid(company_id)),
            (None, None) => return Err(format!("profile {} has no owner", self.id)),
        };
        let visibility = parse_or(
            &self.visibility,
            ProfileVisibility::parse,
            ProfileVisibility::Connections,
            "profiles.visibility",
        );
        Ok(Profile {
            id: ProfileId::from_uuid(self.id),
            owner,
            headline: self.headline,
            about: self.about,
            location: self.location,
            website_url: self.website_url,
            visibility,
            avatar_media_id: self.avatar_media_id.map(MediaAssetId::from_uuid),
            banner_media_id: self.banner_media_id.map(MediaAssetId::from_uuid),
            skill_ids: self.skill_ids,
            service_ids: self.service_ids,
            niche_ids: self.niche_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = profile_experiences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExperienceRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub title: String,
    pub organisation: String,
    pub description: Option<String>,
    pub started_at: NaiveDate,
    pub ended_at: Option<NaiveDate>,
    pub sort_order: i32,
}

impl ExperienceRow {
    pub fn from_domain(experience: &Experience) -> Self {
        Self {
            id: experience.id.into(),
            profile_id: experience.profile_id.into(),
            title: experience.title.clone(),
            organisation: experience.organisation.clone(),
            description: experience.description.clone(),
            started_at: experience.started_at,
            ended_at: experience.ended_at,
            sort_order: experience.sort_order,
        }
    }

    pub fn into_domain(self) -> Experience {
        Experience {
            id: ExperienceId::from_uuid(self.id),
            profile_id: ProfileId::from_uuid(self.profile_id),
            title: self.title,
            organisation: self.organisation,
            description: self.description,
            started_at: self.started_at,
            ended_at: self.ended_at,
            sort_order: self.sort_order,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostRow {
    pub id: Uuid,
    pub author_user_id: Option<Uuid>,
    pub author_company_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub kind: String,
    pub status: String,
    pub content_format: String,
    pub content: Option<String>,
    pub content_markdown: Option<String>,
    pub link_url: Option<String>,
    pub link_title: Option<String>,
    pub link_description: Option<String>,
    pub link_image_url: Option<String>,
    pub visibility: String,
    pub repost_of_post_id: Option<Uuid>,
    pub moderation_status: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRow {
    pub fn from_domain(post: &Post) -> Self {
        let (author_user_id, author_company_id) = match post.author {
            PostAuthor::User(id) => (Some(id.into()), None),
            PostAuthor::Company(id) => (None, Some(id.into())),
        };
        Self {
            id: post.id.into(),
            author_user_id,
            author_company_id,
            group_id: post.group_id.map(Into::into),
            kind: post.kind.as_str().to_owned(),
            status: post.status.as_str().to_owned(),
            content_format: post.content_format.as_str().to_owned(),
            content: post.content.clone(),
            content_markdown: post.content_markdown.clone(),
            link_url: post.link_url.clone(),
            link_title: post.link_title.clone(),
            link_description: post.link_description.clone(),
            link_image_url: post.link_image_url.clone(),
            visibility: post.visibility.as_str().to_owned(),
            repost_of_post_id: post.repost_of_post_id.map(Into::into),
            moderation_status: post.moderation_status.as_str().to_owned(),
            scheduled_at: post.scheduled_at,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    /// Fails when the row violates the author arc (neither side set).
    pub fn into_domain(self) -> Result<Post, String> {
        let author = match (self.author_user_id, self.author_company_id) {
            (Some(user_id), _) => PostAuthor::User(UserId::from_uuid(user_id)),
            (None, Some(company_id)) => PostAuthor::Company(CompanyId::from_uuid(company_id)),
            (None, None) => return Err(format!("post {} has no author", self.id)),
        };
        Ok(Post {
            id: PostId::from_uuid(self.id),
            author,
            group_id: self.group_id.map(GroupId::from_uuid),
            kind: parse_or(&self.kind, PostKind::parse, PostKind::Post, "posts.kind"),
            status: parse_or(&self.status, PostStatus::parse, PostStatus::Draft, "posts.status"),
            content_format: parse_or(
                &self.content_format,
                ContentFormat::parse,
                ContentFormat::Plain,
                "posts.content_format",
            ),
            content: self.content,
            content_markdown: self.content_markdown,
            link_url: self.link_url,
            link_title: self.link_title,
            link_description: self.link_description,
            link_image_url: self.link_image_url,
            visibility: parse_or(
                &self.visibility,
                PostVisibility::parse,
                PostVisibility::Connections,
                "posts.visibility",
            ),
            repost_of_post_id: self.repost_of_post_id.map(PostId::from_uuid),
            moderation_status: parse_or(
                &self.moderation_status,
                ModerationStatus::parse,
                ModerationStatus::Removed,
                "posts.moderation_status",
            ),
            scheduled_at: self.scheduled_at,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = post_media)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostMediaRow {
    pub post_id: Uuid,
    pub media_asset_id: Uuid,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = connections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConnectionRow {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl ConnectionRow {
    pub fn from_domain(connection: &Connection) -> Self {
        Self {
            id: connection.id.into(),
            requester_id: connection.requester_id.into(),
            recipient_id: connection.recipient_id.into(),
            status: connection.status.as_str().to_owned(),
            created_at: connection.created_at,
            responded_at: connection.responded_at,
        }
    }

    pub fn into_domain(self) -> Connection {
        let status = parse_or(
            &self.status,
            ConnectionStatus::parse,
            ConnectionStatus::Pending,
            "connections.status",
        );
        Connection {
            id: ConnectionId::from_uuid(self.id),
            requester_id: UserId::from_uuid(self.requester_id),
            recipient_id: UserId::from_uuid(self.recipient_id),
            status,
            created_at: self.created_at,
            responded_at: self.responded_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = follows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FollowRow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_user_id: Option<Uuid>,
    pub followed_company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl FollowRow {
    pub fn from_domain(follow: &Follow) -> Self {
        let (followed_user_id, followed_company_id) = match follow.target {
            FollowTarget::User(id) => (Some(id.into()), None),
            FollowTarget::Company(id) => (None, Some(id.into())),
        };
        Self {
            id: follow.id.into(),
            follower_id: follow.follower_id.into(),
            followed_user_id,
            followed_company_id,
            created_at: follow.created_at,
        }
    }

    /// Fails when the row violates the target arc (neither side set).
    pub fn into_domain(self) -> Result<Follow, String> {
        let target = match (self.followed_user_id, self.followed_company_id) {
            (Some(user_id), _) => FollowTarget::User(UserId::from_uuid(user_id)),
            (None, Some(company_id)) => FollowTarget::Company(CompanyId::from_uuid(company_id)),
            (None, None) => return Err(format!("follow {} has no target", self.id)),
        };
        Ok(Follow {
            id: FollowId::from_uuid(self.id),
            follower_id: UserId::from_uuid(self.follower_id),
            target,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = message_threads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ThreadRow {
    pub id: Uuid,
    pub thread_type: String,
    pub created_by_user_id: Uuid,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ThreadRow {
    pub fn from_domain(thread: &MessageThread) -> Self {
        Self {
            id: thread.id.into(),
            thread_type: thread.thread_type.as_str().to_owned(),
            created_by_user_id: thread.created_by_user_id.into(),
            last_message_at: thread.last_message_at,
            created_at: thread.created_at,
        }
    }

    pub fn into_domain(self) -> MessageThread {
        let thread_type = parse_or(
            &self.thread_type,
            ThreadType::parse,
            ThreadType::Direct,
            "message_threads.thread_type",
        );
        MessageThread {
            id: ThreadId::from_uuid(self.id),
            thread_type,
            created_by_user_id: UserId::from_uuid(self.created_by_user_id),
            last_message_at: self.last_message_at,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = thread_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ParticipantRow {
    pub thread_id: Uuid,
    pub user_id: Uuid,
    pub last_read_message_id: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}

impl ParticipantRow {
    pub fn from_domain(participant: &ThreadParticipant) -> Self {
        Self {
            thread_id: participant.thread_id.into(),
            user_id: participant.user_id.into(),
            last_read_message_id: participant.last_read_message_id.map(Into::into),
            joined_at: participant.joined_at,
        }
    }

    pub fn into_domain(self) -> ThreadParticipant {
        ThreadParticipant {
            thread_id: ThreadId::from_uuid(self.thread_id),
            user_id: UserId::from_uuid(self.user_id),
            last_read_message_id: self.last_read_message_id.map(MessageId::from_uuid),
            joined_at: self.joined_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub sender_user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl MessageRow {
    pub fn from_domain(message: &Message) -> Self {
        Self {
            id: message.id.into(),
            thread_id: message.thread_id.into(),
            sender_user_id: message.sender_user_id.into(),
            content: message.content.clone(),
            created_at: message.created_at,
        }
    }

    pub fn into_domain(self) -> Message {
        Message {
            id: MessageId::from_uuid(self.id),
            thread_id: ThreadId::from_uuid(self.thread_id),
            sender_user_id: UserId::from_uuid(self.sender_user_id),
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub visibility: String,
    pub owner_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl GroupRow {
    pub fn from_domain(group: &Group) -> Self {
        Self {
            id: group.id.into(),
            name: group.name.clone(),
            slug: group.slug.clone(),
            description: group.description.clone(),
            visibility: group.visibility.as_str().to_owned(),
            owner_user_id: group.owner_user_id.into(),
            created_at: group.created_at,
        }
    }

    pub fn into_domain(self) -> Group {
        let visibility = parse_or(
            &self.visibility,
            GroupVisibility::parse,
            GroupVisibility::Private,
            "groups.visibility",
        );
        Group {
            id: GroupId::from_uuid(self.id),
            name: self.name,
            slug: self.slug,
            description: self.description,
            visibility,
            owner_user_id: UserId::from_uuid(self.owner_user_id),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = group_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupMemberRow {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl GroupMemberRow {
    pub fn from_domain(member: &GroupMember) -> Self {
        Self {
            group_id: member.group_id.into(),
            user_id: member.user_id.into(),
            role: member.role.as_str().to_owned(),
            joined_at: member.joined_at,
        }
    }

    pub fn into_domain(self) -> GroupMember {
        let role = parse_or(
            &self.role,
            GroupMemberRole::parse,
            GroupMemberRole::Member,
            "group_members.role",
        );
        GroupMember {
            group_id: GroupId::from_uuid(self.group_id),
            user_id: UserId::from_uuid(self.user_id),
            role,
            joined_at: self.joined_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reaction_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReactionTypeRow {
    pub id: Uuid,
    pub key: String,
    pub label: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ReactionTypeRow {
    pub fn into_domain(self) -> ReactionType {
        ReactionType {
            id: ReactionTypeId::from_uuid(self.id),
            key: self.key,
            label: self.label,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reaction_type_id: Uuid,
    pub target_post_id: Option<Uuid>,
    pub target_comment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ReactionRow {
    pub fn from_domain(reaction: &Reaction) -> Self {
        Self {
            id: reaction.id.into(),
            user_id: reaction.user_id.into(),
            reaction_type_id: reaction.reaction_type_id.into(),
            target_post_id: reaction.target_post_id.map(Into::into),
            target_comment_id: reaction.target_comment_id.map(Into::into),
            created_at: reaction.created_at,
        }
    }

    pub fn into_domain(self) -> Reaction {
        Reaction {
            id: ReactionId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            reaction_type_id: ReactionTypeId::from_uuid(self.reaction_type_id),
            target_post_id: self.target_post_id.map(PostId::from_uuid),
            target_comment_id: self.target_comment_id.map(CommentId::from_uuid),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_user_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentRow {
    pub fn from_domain(comment: &Comment) -> Self {
        Self {
            id: comment.id.into(),
            post_id: comment.post_id.into(),
            author_user_id: comment.author_user_id.into(),
            parent_comment_id: comment.parent_comment_id.map(Into::into),
            content: comment.content.clone(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }

    pub fn into_domain(self) -> Comment {
        Comment {
            id: CommentId::from_uuid(self.id),
            post_id: PostId::from_uuid(self.post_id),
            author_user_id: UserId::from_uuid(self.author_user_id),
            parent_comment_id: self.parent_comment_id.map(CommentId::from_uuid),
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = media_assets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MediaAssetRow {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub media_type: String,
    pub bucket: String,
    pub storage_key: String,
    pub content_type: String,
    pub byte_size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl MediaAssetRow {
    pub fn from_domain(asset: &MediaAsset) -> Self {
        Self {
            id: asset.id.into(),
            owner_user_id: asset.owner_user_id.into(),
            media_type: asset.media_type.as_str().to_owned(),
            bucket: asset.bucket.clone(),
            storage_key: asset.storage_key.clone(),
            content_type: asset.content_type.clone(),
            byte_size: asset.byte_size,
            width: asset.width,
            height: asset.height,
            duration_seconds: asset.duration_seconds,
            created_at: asset.created_at,
        }
    }

    pub fn into_domain(self) -> MediaAsset {
        let media_type = parse_or(
            &self.media_type,
            MediaType::parse,
            MediaType::File,
            "media_assets.media_type",
        );
        MediaAsset {
            id: MediaAssetId::from_uuid(self.id),
            owner_user_id: UserId::from_uuid(self.owner_user_id),
            media_type,
            bucket: self.bucket,
            storage_key: self.storage_key,
            content_type: self.content_type,
            byte_size: self.byte_size,
            width: self.width,
            height: self.height,
            duration_seconds: self.duration_seconds,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = analytics_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AnalyticsEventRow {
    pub id: Uuid,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub actor_user_id: Option<Uuid>,
    pub metadata: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl AnalyticsEventRow {
    pub fn from_domain(event: &AnalyticsEvent) -> Self {
        Self {
            id: event.id,
            event_type: event.event_type.clone(),
            entity_type: event.entity_type.clone(),
            entity_id: event.entity_id,
            actor_user_id: event.actor_user_id.map(Into::into),
            metadata: event.metadata.clone(),
            occurred_at: event.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_enum_text_falls_back_restrictively() {
        let user = User::new_registration("a@b.example", "hash".into(), "A".into(), None);
        let mut row = UserRow::from_domain(&user);
        row.status = "mystery".into();
        assert_eq!(row.into_domain().status, UserStatus::Suspended);
    }

    #[test]
    fn ownerless_profile_rows_are_rejected() {
        let profile = Profile::new_for_user(UserId::random());
        let mut row = ProfileRow::from_domain(&profile);
        row.user_id = None;
        row.company_id = None;
        assert!(row.into_domain().is_err());
    }

    #[test]
    fn follow_target_round_trips_through_the_arc_columns() {
        let follow = Follow::new(UserId::random(), FollowTarget::Company(CompanyId::random()));
        let row = FollowRow::from_domain(&follow);
        assert!(row.followed_user_id.is_none());
        assert_eq!(row.clone().into_domain().expect("valid").target, follow.target);
    }
}
