//! Liveness and readiness probes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::header::{CACHE_CONTROL, HeaderValue};
use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Probe flags shared with the server lifecycle. Readiness flips on once
/// migrations have run and the pool is reachable; liveness stays up for
/// the life of the process.
#[derive(Debug, Default)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl HealthState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        })
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Release);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeResponse {
    pub status: &'static str,
}

fn probe_response(ok: bool) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok().json(ProbeResponse { status: "ok" })
    } else {
        HttpResponse::ServiceUnavailable().json(ProbeResponse { status: "unavailable" })
    };
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Process is live", body = ProbeResponse),
        (status = 503, description = "Process is shutting down", body = ProbeResponse)
    ),
    tags = ["health"],
    operation_id = "liveness",
    security([])
)]
#[get("/healthz")]
pub async fn healthz(health: web::Data<Arc<HealthState>>) -> HttpResponse {
    probe_response(health.is_live())
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/readyz",
    responses(
        (status = 200, description = "Ready for traffic", body = ProbeResponse),
        (status = 503, description = "Not ready", body = ProbeResponse)
    ),
    tags = ["health"],
    operation_id = "readiness",
    security([])
)]
#[get("/readyz")]
pub async fn readyz(health: web::Data<Arc<HealthState>>) -> HttpResponse {
    probe_response(health.is_ready())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};

    #[actix_web::test]
    async fn readiness_follows_the_flag() {
        let health = HealthState::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&health)))
                .service(healthz)
                .service(readyz),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/readyz").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.set_ready(true);
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/readyz").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
    }

    #[actix_web::test]
    async fn liveness_defaults_to_up() {
        let health = HealthState::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&health)))
                .service(healthz),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/healthz").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
