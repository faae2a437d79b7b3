use axum::Router;

pub async fn create_test_app() -> Router {
    std::env::set_var("DATABASE_URL", "");
    std::env::set_var("TRANSLATOR_PROVIDER", "mock");
    std::env::set_var("EMAIL_PROVIDER", "mock");

    lingua_backend_rust::create_app().await
}
