use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "fleet-checklist");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/api/no-existe").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_without_json_body_is_not_500() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Debería fallar por request inválida, nunca con error 500
    assert_ne!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_login_with_bad_credentials_shape() {
    let app = create_test_app();

    let payload = json!({
        "name": "usuario_invalido",
        "password": "clave_invalida"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

// Función helper para crear la app de test.
// Replica la forma de las rutas públicas sin necesitar base de datos.
fn create_test_app() -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "service": "fleet-checklist",
                    "status": "healthy",
                }))
            }),
        )
        .route(
            "/api/auth/login",
            post(|Json(_payload): Json<Value>| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "success": false,
                        "message": "Credenciales inválidas"
                    })),
                )
            }),
        )
}
