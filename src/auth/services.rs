use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::auth::{
    dto::SignupRequest,
    password::hash_password,
    repo::UserRepo,
    repo_types::{NewUser, User},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug)]
pub enum SignupOutcome {
    Created(User),
    AlreadyExists,
}

/// Registers a user. `payload.email` must already be normalised.
pub async fn signup(users: &dyn UserRepo, payload: SignupRequest) -> anyhow::Result<SignupOutcome> {
    if users
        .find_by_email(&payload.email)
        .await
        .context("find user by email")?
        .is_some()
    {
        return Ok(SignupOutcome::AlreadyExists);
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("join hash task")?
        .context("hash password")?;

    let inserted = users
        .insert_if_absent(NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await
        .context("insert user")?;

    match inserted {
        Some(user) => Ok(SignupOutcome::Created(user)),
        None => {
            // Lost the race against a concurrent signup for the same email.
            debug!("conditional insert found existing email");
            Ok(SignupOutcome::AlreadyExists)
        }
    }
}
