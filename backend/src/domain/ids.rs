//! Typed identifiers for domain entities.
//!
//! Every aggregate gets its own UUID newtype so ids cannot be mixed up at
//! call sites. The wrappers serialise transparently as UUID strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier for a registered user.
    UserId
);
define_id!(
    /// Identifier for a company.
    CompanyId
);
define_id!(
    /// Identifier for a profile.
    ProfileId
);
define_id!(
    /// Identifier for a profile experience entry.
    ExperienceId
);
define_id!(
    /// Identifier for a post.
    PostId
);
define_id!(
    /// Identifier for a connection edge.
    ConnectionId
);
define_id!(
    /// Identifier for a follow edge.
    FollowId
);
define_id!(
    /// Identifier for a message thread.
    ThreadId
);
define_id!(
    /// Identifier for a message.
    MessageId
);
define_id!(
    /// Identifier for a group.
    GroupId
);
define_id!(
    /// Identifier for a reaction.
    ReactionId
);
define_id!(
    /// Identifier for a reaction type catalogue entry.
    ReactionTypeId
);
define_id!(
    /// Identifier for a comment.
    CommentId
);
define_id!(
    /// Identifier for an uploaded media asset.
    MediaAssetId
);
