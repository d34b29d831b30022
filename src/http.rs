use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    handlers::{states, Ctx},
    store::CatalogStore,
};

/// Initialize HTTP routes.
pub fn init_handlers<S: CatalogStore>(ctx: Arc<Ctx<S>>) -> Router {
    let cors = cors_layer(&ctx.consts.allowed_origins);

    Router::new()
        .route("/api/states", get(states::search::<S>))
        .route("/api/health", get(states::health::<S>))
        .route_layer(cors)
        .with_state(ctx)
}

/// Credentialed CORS for the configured origins. Request headers allowed
/// are the usual set browsers send with XHR/fetch calls.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("ignoring invalid CORS origin '{}': {}", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET])
        .allow_headers([
            header::ORIGIN,
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ])
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, Response, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{handlers::Consts, manager::Manager, models::Entry, store::memory::MemoryStore};

    const ORIGIN: &str = "http://localhost:8083";

    async fn test_router() -> Router {
        let store = Arc::new(MemoryStore::new(vec![
            Entry::new("Alabama", "AL", 0),
            Entry::new("Alaska", "AK", 5),
        ]));
        let mgr = Manager::load(store).await.unwrap();

        init_handlers(Arc::new(Ctx {
            mgr: Arc::new(mgr),
            consts: Consts {
                allowed_origins: vec![ORIGIN.to_string()],
            },
        }))
    }

    async fn send(req: Request<Body>) -> Response<Body> {
        test_router().await.oneshot(req).await.unwrap()
    }

    fn header_str<'a>(resp: &'a Response<Body>, name: HeaderName) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn preflight_allows_browser_headers() {
        let resp = send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/states?search=al")
                .header(header::ORIGIN, ORIGIN)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-requested-with, accept")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert!(resp.status().is_success());
        assert_eq!(
            header_str(&resp, header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(ORIGIN)
        );
        assert_eq!(
            header_str(&resp, header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            Some("true")
        );

        let allowed = header_str(&resp, header::ACCESS_CONTROL_ALLOW_HEADERS)
            .unwrap()
            .to_lowercase();
        for h in ["x-requested-with", "accept", "content-type", "origin"] {
            assert!(allowed.contains(h), "{} missing from '{}'", h, allowed);
        }
        assert!(header_str(&resp, header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .contains("GET"));
    }

    #[tokio::test]
    async fn get_reflects_only_allowed_origins() {
        let resp = send(
            Request::builder()
                .uri("/api/states?search=al")
                .header(header::ORIGIN, ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            header_str(&resp, header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(ORIGIN)
        );

        let resp = send(
            Request::builder()
                .uri("/api/states?search=al")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn unknown_paths_are_not_answered_by_cors() {
        let resp = send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/nope")
                .header(header::ORIGIN, "http://evil.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_origins_are_skipped() {
        // Building must not panic on a value that isn't a valid header.
        let _ = cors_layer(&["bad\norigin".to_string(), ORIGIN.to_string()]);
    }
}
