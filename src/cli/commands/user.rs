use anyhow::{Result, anyhow};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const CMD_USER: &str = "user";
pub const CMD_CREATE: &str = "create";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_NAME: &str = "name";

#[derive(Debug)]
pub struct CreateOptions {
    pub email: String,
    pub password: SecretString,
    pub name: Option<String>,
}

impl CreateOptions {
    /// # Errors
    /// Returns an error if `--email` or `--password` is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let email = matches
            .get_one::<String>(ARG_EMAIL)
            .cloned()
            .ok_or_else(|| anyhow!("missing required argument: --{ARG_EMAIL}"))?;
        let password = matches
            .get_one::<String>(ARG_PASSWORD)
            .map(|password| SecretString::from(password.clone()))
            .ok_or_else(|| anyhow!("missing required argument: --{ARG_PASSWORD}"))?;
        Ok(Self {
            email,
            password,
            name: matches.get_one::<String>(ARG_NAME).cloned(),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.subcommand(
        Command::new(CMD_USER)
            .about("Manage users")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(
                Command::new(CMD_CREATE)
                    .about("Create a user with a password")
                    .arg(
                        Arg::new(ARG_EMAIL)
                            .long(ARG_EMAIL)
                            .help("Email address, stored trimmed and lowercased")
                            .required(true),
                    )
                    .arg(
                        Arg::new(ARG_PASSWORD)
                            .long(ARG_PASSWORD)
                            .help("Plaintext password, hashed with Argon2id before storage")
                            .env("PLANIT_USER_PASSWORD")
                            .hide_env_values(true)
                            .required(true),
                    )
                    .arg(
                        Arg::new(ARG_NAME)
                            .long(ARG_NAME)
                            .help("Display name"),
                    ),
            ),
    )
}
