//! OpenAPI documentation configuration.
//!
//! Generates the specification served by Swagger UI in debug builds. Paths
//! come from the inbound HTTP layer; schemas are collected from the path
//! definitions plus the domain types registered below.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::analytics::{DailyCount, ViewAnalytics};
use crate::domain::company::{Company, CompanyMember};
use crate::domain::engagement::{Comment, Reaction, ReactionTally, ReactionType};
use crate::domain::error::{Error, ErrorCode};
use crate::domain::group::{Group, GroupMember};
use crate::domain::media::MediaAsset;
use crate::domain::messaging::{Message, MessageThread, ThreadParticipant};
use crate::domain::networking::{Connection, Follow, FollowStats};
use crate::domain::post::Post;
use crate::domain::profile::{Experience, Profile};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Professional network backend API",
        description = "HTTP interface for the professional networking platform: \
                       accounts, profiles, companies, posts and feeds, engagement, \
                       messaging, groups, media, analytics, and writing assistance."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::profiles::get_my_profile,
        crate::inbound::http::profiles::update_my_profile,
        crate::inbound::http::profiles::update_avatar,
        crate::inbound::http::profiles::update_banner,
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::profiles::get_user_profile,
        crate::inbound::http::profiles::add_experience,
        crate::inbound::http::profiles::update_experience,
        crate::inbound::http::profiles::delete_experience,
        crate::inbound::http::profiles::list_experiences,
        crate::inbound::http::companies::create_company,
        crate::inbound::http::companies::get_company,
        crate::inbound::http::companies::list_companies,
        crate::inbound::http::companies::list_my_companies,
        crate::inbound::http::companies::update_company,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::publish_post,
        crate::inbound::http::posts::archive_post,
        crate::inbound::http::posts::list_post_media,
        crate::inbound::http::posts::list_user_posts,
        crate::inbound::http::feed::get_feed,
        crate::inbound::http::feed::get_public_feed,
        crate::inbound::http::feed::get_group_feed,
        crate::inbound::http::networking::send_connection_request,
        crate::inbound::http::networking::respond_to_connection,
        crate::inbound::http::networking::remove_connection,
        crate::inbound::http::networking::list_connections,
        crate::inbound::http::networking::list_pending_connections,
        crate::inbound::http::networking::list_sent_connections,
        crate::inbound::http::networking::follow_user,
        crate::inbound::http::networking::unfollow_user,
        crate::inbound::http::networking::follow_company,
        crate::inbound::http::networking::unfollow_company,
        crate::inbound::http::networking::list_user_followers,
        crate::inbound::http::networking::list_company_followers,
        crate::inbound::http::networking::list_following,
        crate::inbound::http::networking::network_stats,
        crate::inbound::http::engagement::list_reaction_types,
        crate::inbound::http::engagement::react_to_post,
        crate::inbound::http::engagement::remove_reaction,
        crate::inbound::http::engagement::list_post_reactions,
        crate::inbound::http::engagement::create_comment,
        crate::inbound::http::engagement::list_comments,
        crate::inbound::http::engagement::update_comment,
        crate::inbound::http::engagement::delete_comment,
        crate::inbound::http::messaging::create_thread,
        crate::inbound::http::messaging::list_threads,
        crate::inbound::http::messaging::send_message,
        crate::inbound::http::messaging::list_messages,
        crate::inbound::http::messaging::mark_thread_read,
        crate::inbound::http::messaging::list_thread_participants,
        crate::inbound::http::groups::create_group,
        crate::inbound::http::groups::get_group,
        crate::inbound::http::groups::list_groups,
        crate::inbound::http::groups::list_my_groups,
        crate::inbound::http::groups::join_group,
        crate::inbound::http::groups::leave_group,
        crate::inbound::http::groups::list_group_members,
        crate::inbound::http::media::create_upload,
        crate::inbound::http::media::confirm_upload,
        crate::inbound::http::media::download_url,
        crate::inbound::http::media::delete_asset,
        crate::inbound::http::media::list_my_assets,
        crate::inbound::http::analytics::profile_analytics,
        crate::inbound::http::analytics::post_analytics,
        crate::inbound::http::assist::generate_profile_bio,
        crate::inbound::http::assist::generate_post_captions,
        crate::inbound::http::assist::suggest_keywords,
        crate::inbound::http::health::healthz,
        crate::inbound::http::health::readyz,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Profile,
        Experience,
        Company,
        CompanyMember,
        Post,
        MediaAsset,
        Group,
        GroupMember,
        Connection,
        Follow,
        FollowStats,
        ReactionType,
        Reaction,
        ReactionTally,
        Comment,
        MessageThread,
        Message,
        ThreadParticipant,
        ViewAnalytics,
        DailyCount,
    )),
    tags(
        (name = "auth", description = "Registration, login, and sessions"),
        (name = "profiles", description = "Professional profiles and experiences"),
        (name = "companies", description = "Company pages and membership"),
        (name = "posts", description = "Post authoring and lifecycle"),
        (name = "feed", description = "Personalised, public, and group feeds"),
        (name = "networking", description = "Connections and the follow graph"),
        (name = "engagement", description = "Reactions and comments"),
        (name = "messaging", description = "Direct message threads"),
        (name = "groups", description = "Communities and membership"),
        (name = "media", description = "Signed-URL media uploads"),
        (name = "analytics", description = "View tracking reports"),
        (name = "assist", description = "Writing assistance"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_its_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn every_registered_path_is_under_the_api_prefix_or_a_probe() {
        let doc = ApiDoc::openapi();
        for (path, _) in &doc.paths.paths {
            assert!(
                path.starts_with("/api/v1/") || path == "/healthz" || path == "/readyz",
                "unexpected path {path}"
            );
        }
    }
}
