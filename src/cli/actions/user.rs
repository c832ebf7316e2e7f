use crate::{
    credentials::{hash_password, normalize_email},
    store::{self, CreateUserOutcome, NewUser, PgStore, Store},
};
use anyhow::{Context, Result, anyhow, bail};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;
use uuid::Uuid;

#[derive(Debug)]
pub struct Args {
    pub dsn: String,
    pub email: String,
    pub password: SecretString,
    pub name: Option<String>,
}

/// Execute `user create`.
/// # Errors
/// Returns an error if the database is unreachable, the input is invalid, or the email is taken.
pub async fn execute(args: Args) -> Result<()> {
    let pool = store::connect(&args.dsn).await?;
    let store = PgStore::new(pool);

    let user_id = create_user(&store, &args.email, args.password, args.name).await?;
    println!("{user_id}");

    Ok(())
}

/// Normalize, hash, and insert a user with its password.
///
/// # Errors
/// Returns an error on invalid input, a duplicate email, or a store failure.
pub async fn create_user(
    store: &dyn Store,
    email: &str,
    password: SecretString,
    name: Option<String>,
) -> Result<Uuid> {
    let email = normalize_email(email);
    if email.is_empty() || !email.contains('@') {
        bail!("invalid email address: {email:?}");
    }
    if password.expose_secret().is_empty() {
        bail!("password must not be empty");
    }
    let name = name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let password_hash =
        tokio::task::spawn_blocking(move || hash_password(password.expose_secret()))
            .await
            .map_err(|err| anyhow!("password hashing task failed: {err}"))??;

    let outcome = store
        .create_user(NewUser {
            email: email.clone(),
            name,
            password_hash,
        })
        .await
        .context("Failed to create user")?;

    match outcome {
        CreateUserOutcome::Created(user_id) => {
            info!("Created user {email} ({user_id})");
            Ok(user_id)
        }
        CreateUserOutcome::Conflict => Err(anyhow!("a user with email {email} already exists")),
    }
}
