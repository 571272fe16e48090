use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use edupanel::config::cors::CorsConfig;
use edupanel::config::jwt::JwtConfig;
use edupanel::modules::users::model::UserRole;
use edupanel::router::init_router;
use edupanel::state::AppState;
use edupanel::utils::password::hash_password;

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}

pub fn generate_unique_eiin() -> String {
    format!("{:012}", Uuid::new_v4().as_u128() % 1_000_000_000_000)
}

#[allow(dead_code)]
pub async fn create_test_school(pool: &PgPool, eiin: &str, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO schools (eiin, name, package_validity) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(eiin)
    .bind(name)
    .bind(chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_user(
    pool: &PgPool,
    eiin: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> Uuid {
    let hashed = hash_password(password).unwrap();

    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (eiin, role, name, email, password)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(eiin)
    .bind(role)
    .bind("Test User")
    .bind(email)
    .bind(hashed)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Seed a school plus an active user and log in through the API,
/// returning a session token for protected routes.
#[allow(dead_code)]
pub async fn seed_session(pool: &PgPool, app: &Router) -> String {
    let eiin = generate_unique_eiin();
    create_test_school(pool, &eiin, "Session School").await;

    let email = generate_unique_email();
    create_test_user(pool, &eiin, &email, "testpass123", UserRole::Admin).await;

    get_auth_token(app, &email, "testpass123").await
}

#[allow(dead_code)]
pub async fn get_auth_token(app: &Router, email: &str, password: &str) -> String {
    let response = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": password
        })),
    )
    .await;

    let body = body_json(response).await;
    body["data"]["access_token"]
        .as_str()
        .expect("login should return an access token")
        .to_string()
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
