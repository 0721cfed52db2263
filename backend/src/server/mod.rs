//! Server construction and middleware wiring.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
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
use crate::inbound::http::health::{HealthState, healthz, readyz};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{
    analytics, assist, auth, companies, engagement, feed, groups, media, messaging, networking,
    posts, profiles,
};
use crate::middleware::RequestTrace;
use crate::outbound::assist::{AssistClientConfig, HttpAssistClient};
use crate::outbound::object_store::{HmacObjectStore, ObjectStoreConfig};
use crate::outbound::persistence::{
    DbPool, DieselAnalyticsRepository, DieselCommentRepository, DieselCompanyRepository,
    DieselConnectionRepository, DieselFollowRepository, DieselGroupRepository,
    DieselMediaRepository, DieselPostRepository, DieselProfileRepository,
    DieselReactionRepository, DieselThreadRepository, DieselUserRepository,
};
use crate::outbound::security::Argon2PasswordHasher;

/// Everything one worker needs to assemble an [`App`].
#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<Arc<HealthState>>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_assist_client(config: &AppConfig) -> std::io::Result<HttpAssistClient> {
    match (&config.assist_endpoint, &config.assist_api_key) {
        (Some(endpoint), Some(api_key)) => {
            let mut client_config = AssistClientConfig::new(endpoint.clone(), api_key.clone());
            client_config.timeout = config.assist_timeout();
            HttpAssistClient::new(client_config)
                .map_err(|e| std::io::Error::other(format!("assist client construction: {e}")))
        }
        _ => Ok(HttpAssistClient::disabled()),
    }
}

fn build_object_store(config: &AppConfig) -> std::io::Result<HmacObjectStore> {
    let (endpoint, bucket, secret) = match (
        &config.media_endpoint,
        &config.media_bucket,
        &config.media_signing_secret,
    ) {
        (Some(endpoint), Some(bucket), Some(secret)) => (endpoint, bucket, secret),
        _ => {
            return Err(std::io::Error::other(
                "media store requires APP_MEDIA_ENDPOINT, APP_MEDIA_BUCKET, and \
                 APP_MEDIA_SIGNING_SECRET",
            ));
        }
    };
    HmacObjectStore::new(ObjectStoreConfig {
        endpoint: endpoint.clone(),
        bucket: bucket.clone(),
        signing_secret: secret.clone(),
    })
    .map_err(|e| std::io::Error::other(format!("object store construction: {e}")))
}

/// Wire every service onto the database pool and outbound adapters.
///
/// # Errors
///
/// Fails when the media store settings are incomplete or an HTTP client
/// cannot be constructed.
pub fn build_http_state(pool: &DbPool, config: &AppConfig) -> std::io::Result<HttpState> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let profiles = Arc::new(DieselProfileRepository::new(pool.clone()));
    let companies = Arc::new(DieselCompanyRepository::new(pool.clone()));
    let posts = Arc::new(DieselPostRepository::new(pool.clone()));
    let connections = Arc::new(DieselConnectionRepository::new(pool.clone()));
    let follows = Arc::new(DieselFollowRepository::new(pool.clone()));
    let reactions = Arc::new(DieselReactionRepository::new(pool.clone()));
    let comments = Arc::new(DieselCommentRepository::new(pool.clone()));
    let threads = Arc::new(DieselThreadRepository::new(pool.clone()));
    let groups = Arc::new(DieselGroupRepository::new(pool.clone()));
    let media = Arc::new(DieselMediaRepository::new(pool.clone()));
    let analytics = Arc::new(DieselAnalyticsRepository::new(pool.clone()));
    let store = Arc::new(build_object_store(config)?);
    let assist_client = Arc::new(build_assist_client(config)?);
    let hasher = Arc::new(Argon2PasswordHasher);

    Ok(HttpState {
        auth: Arc::new(AuthService::new(Arc::clone(&users) as _, hasher)),
        profiles: Arc::new(ProfileService::new(
            Arc::clone(&profiles) as _,
            Arc::clone(&media) as _,
        )),
        companies: Arc::new(CompanyService::new(Arc::clone(&companies) as _)),
        posts: Arc::new(PostService::new(
            Arc::clone(&posts) as _,
            Arc::clone(&media) as _,
            Arc::clone(&companies) as _,
            Arc::clone(&groups) as _,
            Arc::clone(&assist_client) as _,
        )),
        feed: Arc::new(FeedService::new(
            Arc::clone(&posts) as _,
            Arc::clone(&follows) as _,
            Arc::clone(&groups) as _,
        )),
        networking: Arc::new(NetworkingService::new(
            Arc::clone(&connections) as _,
            Arc::clone(&follows) as _,
            Arc::clone(&users) as _,
            Arc::clone(&companies) as _,
        )),
        engagement: Arc::new(EngagementService::new(
            Arc::clone(&reactions) as _,
            Arc::clone(&comments) as _,
            Arc::clone(&posts) as _,
        )),
        messaging: Arc::new(MessagingService::new(
            Arc::clone(&threads) as _,
            Arc::clone(&users) as _,
        )),
        groups: Arc::new(GroupService::new(Arc::clone(&groups) as _)),
        media: Arc::new(MediaService::new(Arc::clone(&media) as _, store)),
        analytics: Arc::new(AnalyticsService::new(analytics)),
        assist: Arc::new(AssistService::new(assist_client)),
    })
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    // Literal segments must register before their `{id}` siblings.
    let api = web::scope("/api/v1")
        .wrap(session)
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(profiles::get_my_profile)
        .service(profiles::update_my_profile)
        .service(profiles::update_avatar)
        .service(profiles::update_banner)
        .service(profiles::add_experience)
        .service(profiles::update_experience)
        .service(profiles::delete_experience)
        .service(analytics::profile_analytics)
        .service(profiles::list_experiences)
        .service(profiles::get_profile)
        .service(profiles::get_user_profile)
        .service(companies::list_my_companies)
        .service(companies::create_company)
        .service(companies::list_companies)
        .service(networking::list_company_followers)
        .service(companies::get_company)
        .service(companies::update_company)
        .service(posts::create_post)
        .service(engagement::react_to_post)
        .service(engagement::remove_reaction)
        .service(engagement::list_post_reactions)
        .service(engagement::create_comment)
        .service(engagement::list_comments)
        .service(analytics::post_analytics)
        .service(posts::list_post_media)
        .service(posts::publish_post)
        .service(posts::archive_post)
        .service(posts::get_post)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(posts::list_user_posts)
        .service(engagement::list_reaction_types)
        .service(engagement::update_comment)
        .service(engagement::delete_comment)
        .service(feed::get_public_feed)
        .service(feed::get_feed)
        .service(networking::send_connection_request)
        .service(networking::list_pending_connections)
        .service(networking::list_sent_connections)
        .service(networking::list_connections)
        .service(networking::respond_to_connection)
        .service(networking::remove_connection)
        .service(networking::follow_user)
        .service(networking::unfollow_user)
        .service(networking::follow_company)
        .service(networking::unfollow_company)
        .service(networking::list_user_followers)
        .service(networking::list_following)
        .service(networking::network_stats)
        .service(messaging::create_thread)
        .service(messaging::list_threads)
        .service(messaging::mark_thread_read)
        .service(messaging::list_thread_participants)
        .service(messaging::send_message)
        .service(messaging::list_messages)
        .service(groups::create_group)
        .service(groups::list_my_groups)
        .service(groups::list_groups)
        .service(feed::get_group_feed)
        .service(groups::join_group)
        .service(groups::leave_group)
        .service(groups::list_group_members)
        .service(groups::get_group)
        .service(media::create_upload)
        .service(media::confirm_upload)
        .service(media::download_url)
        .service(media::list_my_assets)
        .service(media::delete_asset)
        .service(assist::generate_profile_bio)
        .service(assist::generate_post_captions)
        .service(assist::suggest_keywords);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RequestTrace)
        .service(api)
        .service(healthz)
        .service(readyz);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the HTTP server over a connected pool.
///
/// Readiness stays down until the caller flips it; liveness is up from the
/// start.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when adapter construction or socket
/// binding fails.
pub fn create_server(
    health_state: Arc<HealthState>,
    config: &AppConfig,
    pool: DbPool,
    key: Key,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&pool, config)?);
    let health_data = web::Data::new(health_state);
    let cookie_secure = config.cookie_secure;
    let bind_addr = config
        .bind_addr()
        .map_err(|e| std::io::Error::other(format!("invalid bind address: {e}")))?;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: health_data.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
