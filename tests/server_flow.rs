//! Boots the real router on an ephemeral port and walks the login flow over HTTP.

use anyhow::{Context, Result};
use planit::{
    api::{
        router,
        session::{AuthConfig, AuthState, SessionCodec},
    },
    credentials::hash_password,
    store::{MemoryStore, SharedStore},
    views::ClientEnv,
};
use reqwest::{StatusCode, header, redirect::Policy};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::net::TcpListener;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "correct-horse";

async fn spawn_server() -> Result<SocketAddr> {
    let store = Arc::new(MemoryStore::new());
    let user_id = store.insert_user(EMAIL, Some("Ada")).await;
    store.insert_password(user_id, hash_password(PASSWORD)?).await;
    let group_id = store.insert_group("Hikers").await;
    store
        .insert_event("Ridge walk", group_id, chrono::Utc::now())
        .await;

    let shared: SharedStore = store;
    let auth = AuthState::new(
        AuthConfig::new().with_session_ttl_seconds(3600),
        SessionCodec::new(b"0123456789abcdef0123456789abcdef")?,
    );
    let env = ClientEnv {
        public_google_client_id: Some("e2e-client".to_string()),
    };
    let assets_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let app = router(shared, Arc::new(auth), Arc::new(env), &assets_dir);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });

    Ok(addr)
}

#[tokio::test]
async fn login_then_logout_over_http() -> Result<()> {
    let addr = spawn_server().await?;
    let base = format!("http://{addr}");
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()?;

    let home = client.get(format!("{base}/")).send().await?;
    assert_eq!(home.status(), StatusCode::OK);
    assert!(home.headers().contains_key("x-request-id"));
    let html = home.text().await?;
    assert!(html.contains("Ridge walk"));
    assert!(html.contains("e2e-client"));
    assert!(html.contains(r#"href="/login""#));

    let rejected = client
        .post(format!("{base}/login"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "application/json")
        .body("email=ada%40example.com&password=wrong")
        .send()
        .await?;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = rejected.json().await?;
    assert_eq!(body["message"], "Credentials don't match. Please try again.");

    let login = client
        .post(format!("{base}/login"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(format!("email=%20ADA%40example.com&password={PASSWORD}"))
        .send()
        .await?;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        login
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );
    let cookie = login
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string)
        .context("login did not set a cookie")?;

    let home = client
        .get(format!("{base}/"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert!(home.text().await?.contains("Log Out"));

    let login_page = client
        .get(format!("{base}/login"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(login_page.status(), StatusCode::SEE_OTHER);

    let logout = client
        .post(format!("{base}/logout"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    let cleared = logout
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cleared.contains("Max-Age=0"));

    Ok(())
}

#[tokio::test]
async fn unknown_paths_render_the_not_found_page() -> Result<()> {
    let addr = spawn_server().await?;
    let base = format!("http://{addr}");

    let missing = reqwest::get(format!("{base}/nowhere")).await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(
        missing
            .text()
            .await?
            .contains("The page you are looking for does not exist.")
    );

    let image = reqwest::get(format!("{base}/imgs/404-not-found.png")).await?;
    assert_eq!(image.status(), StatusCode::OK);

    let health = reqwest::get(format!("{base}/health")).await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert!(health.headers().contains_key("x-app"));

    Ok(())
}
