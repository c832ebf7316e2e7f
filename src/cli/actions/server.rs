use crate::{
    GIT_COMMIT_HASH, api,
    api::session::{AuthConfig, AuthState, SessionCodec},
    views::ClientEnv,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub session_secret: SecretString,
    pub session_ttl_seconds: i64,
    pub session_cookie_secure: bool,
    pub assets_dir: PathBuf,
    pub public_google_client_id: Option<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the session key is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let codec = SessionCodec::new(args.session_secret.expose_secret().as_bytes())
        .context("Invalid session secret")?;
    let auth_config = AuthConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_session_cookie_secure(args.session_cookie_secure);
    let client_env = ClientEnv {
        public_google_client_id: args.public_google_client_id,
    };

    api::new(
        args.port,
        &args.dsn,
        AuthState::new(auth_config, codec),
        client_env,
        &args.assets_dir,
    )
    .await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("dsn", redact_dsn(&args.dsn)),
        ("assets_dir", args.assets_dir.display().to_string()),
        ("session_ttl_seconds", args.session_ttl_seconds.to_string()),
        (
            "session_cookie_secure",
            args.session_cookie_secure.to_string(),
        ),
        (
            "public_google_client_id_set",
            args.public_google_client_id.is_some().to_string(),
        ),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "planit {} ({})\n\nStartup configuration:",
        env!("CARGO_PKG_VERSION"),
        short_commit(GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
