//! Shared HTTP adapter state.
//!
//! Handlers receive the domain services via `actix_web::web::Data`; the
//! services own their repository ports, so the HTTP layer stays free of
//! persistence concerns.

use std::sync::Arc;

use crate::domain::analytics_service::AnalyticsService;
use crate::domain::assist_service::AssistService;
use crate::domain::auth_service::AuthService;
use crate::domain::company_service::CompanyService;
use crate::domain::engagement_service::EngagementService;
use crate::domain::feed_service::FeedService;
use crate::domain::group_service::GroupService;
use crate::domain::media_service::MediaService;
use crate::domain::messaging_service::MessagingService;
use crate::domain::networking_service::NetworkingService;
use crate::domain::post_service::PostService;
use crate::domain::profile_service::ProfileService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<AuthService>,
    pub profiles: Arc<ProfileService>,
    pub companies: Arc<CompanyService>,
    pub posts: Arc<PostService>,
    pub feed: Arc<FeedService>,
    pub networking: Arc<NetworkingService>,
    pub engagement: Arc<EngagementService>,
    pub messaging: Arc<MessagingService>,
    pub groups: Arc<GroupService>,
    pub media: Arc<MediaService>,
    pub analytics: Arc<AnalyticsService>,
    pub assist: Arc<AssistService>,
}
