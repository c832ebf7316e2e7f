//! Command-line argument dispatch.
//!
//! Maps parsed CLI matches to an [`Action`]: the web server by default, or an
//! operator subcommand such as `user create`.

use crate::api::session::MIN_SESSION_KEY_LEN;
use crate::cli::actions::{Action, server, user};
use crate::cli::commands::{
    ARG_ASSETS_DIR, ARG_DSN, ARG_PORT, ARG_PUBLIC_GOOGLE_CLIENT_ID, session,
    user::{CMD_CREATE, CMD_USER, CreateOptions},
};
use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use secrecy::ExposeSecret;
use std::path::PathBuf;

fn dsn(matches: &ArgMatches) -> Result<String> {
    matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((CMD_USER, user_matches)) => match user_matches.subcommand() {
            Some((CMD_CREATE, create)) => {
                let options = CreateOptions::parse(create)?;
                Ok(Action::CreateUser(user::Args {
                    dsn: dsn(create)?,
                    email: options.email,
                    password: options.password,
                    name: options.name,
                }))
            }
            _ => Err(anyhow!("missing user subcommand")),
        },
        Some((other, _)) => Err(anyhow!("unknown subcommand: {other}")),
        None => server_args(matches).map(Action::Server),
    }
}

fn server_args(matches: &ArgMatches) -> Result<server::Args> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = dsn(matches)?;

    let session_opts = session::Options::parse(matches)?;
    let session_secret = session_opts.secret.context(format!(
        "missing required argument: --{}",
        session::ARG_SESSION_SECRET
    ))?;
    if session_secret.expose_secret().len() < MIN_SESSION_KEY_LEN {
        bail!(
            "--{} must be at least {MIN_SESSION_KEY_LEN} bytes",
            session::ARG_SESSION_SECRET
        );
    }

    let assets_dir = matches
        .get_one::<String>(ARG_ASSETS_DIR)
        .map_or_else(|| PathBuf::from("assets"), PathBuf::from);

    Ok(server::Args {
        port,
        dsn,
        session_secret,
        session_ttl_seconds: session_opts.ttl_seconds,
        session_cookie_secure: session_opts.cookie_secure,
        assets_dir,
        public_google_client_id: matches
            .get_one::<String>(ARG_PUBLIC_GOOGLE_CLIENT_ID)
            .cloned(),
    })
}
