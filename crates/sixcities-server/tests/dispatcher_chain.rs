//! End-to-end tests for the dispatcher's middleware chain.

use bytes::Bytes;
use http::{Method, StatusCode};
use parking_lot::Mutex;
use serde_json::Value;
use sixcities_auth::{TokenService, TokenSubject, UserType};
use sixcities_core::{AppError, BoxFuture, RequestContext, StepResult};
use sixcities_middleware::{
    AuthGuard, DocumentExists, DocumentExistsMiddleware, FnMiddleware, IdentityMiddleware,
    Middleware, ValidateObjectIdMiddleware,
};
use sixcities_server::{Controller, Dispatcher, RouteError, REQUEST_ID_HEADER};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const SECRET: &str = "dispatcher-test-secret";
const KNOWN_ID: &str = "5f8d0d55b54764421b7156c3";

/// Records the order in which stages run.
#[derive(Default)]
struct OrderTracking {
    log: Mutex<Vec<&'static str>>,
}

impl OrderTracking {
    fn stage(self: &Arc<Self>, name: &'static str) -> Arc<dyn Middleware> {
        let tracking = Arc::clone(self);
        Arc::new(FnMiddleware::new(name, move |_ctx| {
            tracking.log.lock().push(name);
            Box::pin(async { anyhow::Ok(()) })
        }))
    }

    fn entries(&self) -> Vec<&'static str> {
        self.log.lock().clone()
    }
}

/// Counts lookups and knows a single id.
#[derive(Default)]
struct CountingLookup {
    calls: AtomicUsize,
}

impl DocumentExists for CountingLookup {
    fn exists_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<bool>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move { Ok(id == KNOWN_ID) })
    }
}

fn tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(SECRET).unwrap())
}

fn respond_ok(ctx: &mut RequestContext) -> BoxFuture<'_, StepResult> {
    Box::pin(async move {
        Controller::ok(ctx, &serde_json::json!({ "ok": true }))?;
        anyhow::Ok(())
    })
}

fn request(method: Method, uri: &str) -> http::Request<Bytes> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .unwrap()
}

fn bearer(method: Method, uri: &str, token: &str) -> http::Request<Bytes> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Bytes::new())
        .unwrap()
}

async fn body_json(response: sixcities_core::Response) -> Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_stages_run_in_registration_order() {
    let tracking = Arc::new(OrderTracking::default());
    let handler_tracking = Arc::clone(&tracking);

    let mut controller = Controller::new("/things");
    controller
        .add_route(
            Method::GET,
            "/",
            move |ctx| {
                handler_tracking.log.lock().push("handler");
                respond_ok(ctx)
            },
            vec![tracking.stage("first"), tracking.stage("second")],
        )
        .unwrap();

    let dispatcher = Dispatcher::builder()
        .global(FnMiddleware::new("global", {
            let tracking = Arc::clone(&tracking);
            move |_ctx| {
                tracking.log.lock().push("global");
                Box::pin(async { anyhow::Ok(()) })
            }
        }))
        .mount(controller)
        .unwrap()
        .build();

    let response = dispatcher.dispatch(request(Method::GET, "/things")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(tracking.entries(), vec!["global", "first", "second", "handler"]);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_failing_stage_short_circuits() {
    let tracking = Arc::new(OrderTracking::default());
    let handler_calls = Arc::new(AtomicUsize::new(0));
    let calls = Arc::clone(&handler_calls);

    let mut controller = Controller::new("/things");
    controller
        .add_route(
            Method::POST,
            "/",
            move |ctx| {
                calls.fetch_add(1, Ordering::SeqCst);
                respond_ok(ctx)
            },
            vec![
                Arc::new(AuthGuard::new()),
                tracking.stage("after-guard"),
            ],
        )
        .unwrap();

    let dispatcher = Dispatcher::builder()
        .global(IdentityMiddleware::new(tokens()))
        .mount(controller)
        .unwrap()
        .build();

    let response = dispatcher.dispatch(request(Method::POST, "/things")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "User is not authenticated" })
    );
    assert!(tracking.entries().is_empty());
    assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_authenticated_request_reaches_handler_with_identity() {
    let service = tokens();
    let token = service
        .sign(&TokenSubject::new(KNOWN_ID, "keks@example.com", "Keks", UserType::Pro))
        .unwrap();

    let mut controller = Controller::new("/me");
    controller
        .add_route(
            Method::GET,
            "/",
            |ctx| {
                Box::pin(async move {
                    let email = ctx.identity().map(|i| i.email().to_string());
                    Controller::ok(ctx, &serde_json::json!({ "email": email }))?;
                    anyhow::Ok(())
                })
            },
            vec![Arc::new(AuthGuard::new())],
        )
        .unwrap();

    let dispatcher = Dispatcher::builder()
        .global(IdentityMiddleware::new(Arc::clone(&service)))
        .mount(controller)
        .unwrap()
        .build();

    let response = dispatcher.dispatch(bearer(Method::GET, "/me", &token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "keks@example.com");
}

#[tokio::test]
async fn test_untyped_error_becomes_internal_error() {
    let mut controller = Controller::new("/boom");
    controller
        .add_route(
            Method::GET,
            "/",
            |_ctx| Box::pin(async { Err(anyhow::anyhow!("database unreachable")) }),
            Vec::new(),
        )
        .unwrap();
    let dispatcher = Dispatcher::builder().mount(controller).unwrap().build();

    let response = dispatcher.dispatch(request(Method::GET, "/boom")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Internal error" })
    );
}

#[tokio::test]
async fn test_typed_error_keeps_status_and_message() {
    let mut controller = Controller::new("/offers");
    controller
        .add_route(
            Method::POST,
            "/",
            |_ctx| {
                Box::pin(async {
                    Err(anyhow::Error::new(AppError::unprocessable(
                        r#"Offer with title "Loft" exists."#,
                    )))
                })
            },
            Vec::new(),
        )
        .unwrap();
    let dispatcher = Dispatcher::builder().mount(controller).unwrap().build();

    let response = dispatcher.dispatch(request(Method::POST, "/offers")).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"],
        r#"Offer with title "Loft" exists."#
    );
}

#[tokio::test]
async fn test_handler_without_response_is_internal_error() {
    let mut controller = Controller::new("/silent");
    controller
        .add_route(
            Method::GET,
            "/",
            |_ctx| Box::pin(async { anyhow::Ok(()) }),
            Vec::new(),
        )
        .unwrap();
    let dispatcher = Dispatcher::builder().mount(controller).unwrap().build();

    let response = dispatcher.dispatch(request(Method::GET, "/silent")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unmatched_route_is_not_found() {
    let dispatcher = Dispatcher::builder().build();

    let response = dispatcher.dispatch(request(Method::GET, "/nowhere")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Route GET /nowhere not found"
    );
}

#[tokio::test]
async fn test_invalid_token_rejected_before_route_matching() {
    let dispatcher = Dispatcher::builder()
        .global(IdentityMiddleware::new(tokens()))
        .build();

    let response = dispatcher
        .dispatch(bearer(Method::GET, "/nowhere", "not-a-token"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid token");
}

fn guarded_dispatcher(lookup: Arc<CountingLookup>) -> Dispatcher {
    let mut controller = Controller::new("/offers");
    controller
        .add_route(
            Method::GET,
            "/:offerId",
            |ctx| {
                Box::pin(async move {
                    let id = ctx.param("offerId").unwrap_or_default().to_string();
                    Controller::ok(ctx, &serde_json::json!({ "id": id }))?;
                    anyhow::Ok(())
                })
            },
            vec![
                Arc::new(ValidateObjectIdMiddleware::new("offerId")),
                Arc::new(DocumentExistsMiddleware::new(lookup, "Offer", "offerId")),
            ],
        )
        .unwrap();
    Dispatcher::builder().mount(controller).unwrap().build()
}

#[tokio::test]
async fn test_malformed_id_never_reaches_lookup() {
    let lookup = Arc::new(CountingLookup::default());
    let dispatcher = guarded_dispatcher(Arc::clone(&lookup));

    let response = dispatcher.dispatch(request(Method::GET, "/offers/abc")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "offerId is invalid");
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_entity_is_single_lookup_not_found() {
    let lookup = Arc::new(CountingLookup::default());
    let dispatcher = guarded_dispatcher(Arc::clone(&lookup));

    let response = dispatcher
        .dispatch(request(Method::GET, "/offers/000000000000000000000000"))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Offer with id 000000000000000000000000 not found"
    );
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_existing_entity_reaches_handler() {
    let lookup = Arc::new(CountingLookup::default());
    let dispatcher = guarded_dispatcher(Arc::clone(&lookup));

    let response = dispatcher
        .dispatch(request(Method::GET, &format!("/offers/{KNOWN_ID}")))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], KNOWN_ID);
}

#[test]
fn test_mounting_colliding_routes_fails() {
    let mut first = Controller::new("/offers");
    first
        .add_route(Method::GET, "/:offerId", respond_ok, Vec::new())
        .unwrap();
    let mut second = Controller::new("/offers");
    second
        .add_route(Method::GET, "/:id", respond_ok, Vec::new())
        .unwrap();

    let result = Dispatcher::builder().mount(first).unwrap().mount(second);

    assert!(matches!(result, Err(RouteError::Duplicate { .. })));
}

#[tokio::test]
async fn test_literal_segment_beats_param() {
    fn which(label: &'static str) -> impl for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, StepResult>
           + Send
           + Sync
           + 'static {
        move |ctx| {
            Box::pin(async move {
                Controller::ok(ctx, &serde_json::json!({ "route": label }))?;
                anyhow::Ok(())
            })
        }
    }

    let mut controller = Controller::new("/offers");
    controller
        .add_route(Method::GET, "/:offerId", which("param"), Vec::new())
        .unwrap()
        .add_route(Method::GET, "/premium", which("literal"), Vec::new())
        .unwrap();
    let dispatcher = Dispatcher::builder().mount(controller).unwrap().build();

    let literal = dispatcher.dispatch(request(Method::GET, "/offers/premium")).await;
    let param = dispatcher
        .dispatch(request(Method::GET, &format!("/offers/{KNOWN_ID}")))
        .await;

    assert_eq!(body_json(literal).await["route"], "literal");
    assert_eq!(body_json(param).await["route"], "param");
}
