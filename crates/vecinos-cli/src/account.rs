//! Account commands: login, registration and profile editing.
//!
//! Every command other than `login` and `register` needs a token from a
//! previous login, read from `VECINOS_TOKEN`.

use anyhow::Context;
use clap::Subcommand;
use vecinos_api::{ApiError, ProfileUpdate, VecinosClient};
use vecinos_core::{AppConfig, Credential, ProviderId, Session};

/// Sub-commands available under `profile`.
#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// Update profile fields; omitted flags keep their current value
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        photo_url: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Add a specialty to the profile
    AddSpecialty {
        #[arg(long)]
        name: String,
        /// Years of experience in this specialty
        #[arg(long, default_value_t = 0)]
        years: u32,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a specialty by name (case-insensitive)
    RemoveSpecialty {
        #[arg(long)]
        name: String,
    },
}

/// Reads the stored token from config.
pub(crate) fn credential_from_config(config: &AppConfig) -> anyhow::Result<Credential> {
    config
        .token
        .as_deref()
        .and_then(Credential::new)
        .ok_or_else(|| anyhow::anyhow!("not logged in; run `vecinos login` and export VECINOS_TOKEN"))
}

/// Validates the stored token against the API and resolves the own user id.
pub(crate) async fn resume_session(
    client: &VecinosClient,
    config: &AppConfig,
) -> anyhow::Result<Session> {
    let credential = credential_from_config(config)?;
    let session = client.resume_session(credential).await.map_err(explain)?;
    tracing::debug!(user_id = ?session.user_id, "session resumed");
    Ok(session)
}

/// Adds a login hint to rejected-token errors and prefers the server's own
/// message for other HTTP failures.
pub(crate) fn explain(error: ApiError) -> anyhow::Error {
    let message = error.server_message().map(str::to_owned);
    match (error, message) {
        (ApiError::Unauthenticated { status }, _) => anyhow::anyhow!(
            "the API rejected the stored token (HTTP {status}); run `vecinos login` again"
        ),
        (ApiError::Status { status, .. }, Some(message)) => {
            anyhow::anyhow!("{message} (HTTP {status})")
        }
        (other, _) => other.into(),
    }
}

pub(crate) async fn run_login(
    client: &VecinosClient,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let signed_in = client
        .login(email, password)
        .await
        .map_err(explain)
        .context("login failed")?;
    let name = signed_in
        .user
        .as_ref()
        .and_then(|u| u.name.as_deref())
        .unwrap_or(email);
    tracing::info!(user_id = ?signed_in.session.user_id, "logged in");

    println!("Welcome, {name}.");
    println!(
        "export VECINOS_TOKEN={}",
        signed_in.session.credential.token()
    );
    Ok(())
}

pub(crate) async fn run_register(
    client: &VecinosClient,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let user = client
        .register(name, email, password)
        .await
        .map_err(explain)
        .context("registration failed")?;
    println!(
        "Registered {} <{}> with id {}. Log in with `vecinos login`.",
        user.name,
        user.email,
        ProviderId::from(&user.id)
    );
    Ok(())
}

pub(crate) async fn run_me(client: &VecinosClient, config: &AppConfig) -> anyhow::Result<()> {
    let credential = credential_from_config(config)?;
    let profile = client.current_user(&credential).await.map_err(explain)?;
    let update = ProfileUpdate::from_profile(&profile);

    println!("id:          {}", ProviderId::from(&profile.id));
    println!("name:        {} {}", update.name, update.last_name);
    println!("email:       {}", profile.email.as_deref().unwrap_or("-"));
    println!("phone:       {}", or_dash(&update.phone));
    println!("photo:       {}", or_dash(&update.photo_url));
    println!("description: {}", or_dash(&update.description));
    if update.specialties.is_empty() {
        println!("specialties: -");
    } else {
        println!("specialties:");
        for s in &update.specialties {
            println!("  - {} ({} yrs) {}", s.name, s.years_experience, s.description);
        }
    }
    Ok(())
}

pub(crate) async fn run_profile(
    client: &VecinosClient,
    config: &AppConfig,
    command: ProfileCommands,
) -> anyhow::Result<()> {
    let credential = credential_from_config(config)?;
    let profile = client.current_user(&credential).await.map_err(explain)?;
    let mut update = ProfileUpdate::from_profile(&profile);

    match apply_profile_edit(&mut update, command)? {
        ProfileEdit::Changed => {}
        ProfileEdit::Unchanged => {
            println!("Nothing to change.");
            return Ok(());
        }
        ProfileEdit::SpecialtyNotFound(name) => {
            println!("No specialty named \"{name}\" on the profile.");
            return Ok(());
        }
    }

    client
        .update_profile(&credential, &update)
        .await
        .map_err(explain)?;
    println!("Profile updated.");
    Ok(())
}

/// What [`apply_profile_edit`] did to the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProfileEdit {
    Changed,
    Unchanged,
    /// `remove-specialty` named a specialty the profile does not have.
    SpecialtyNotFound(String),
}

/// Applies `command` to `update` without touching the API.
pub(crate) fn apply_profile_edit(
    update: &mut ProfileUpdate,
    command: ProfileCommands,
) -> anyhow::Result<ProfileEdit> {
    match command {
        ProfileCommands::Update {
            name,
            last_name,
            phone,
            photo_url,
            description,
        } => {
            let mut changed = false;
            for (field, value) in [
                (&mut update.name, name),
                (&mut update.last_name, last_name),
                (&mut update.phone, phone),
                (&mut update.photo_url, photo_url),
                (&mut update.description, description),
            ] {
                if let Some(value) = value {
                    *field = value.trim().to_owned();
                    changed = true;
                }
            }
            if update.name.is_empty() {
                anyhow::bail!("name must not be blank");
            }
            Ok(if changed {
                ProfileEdit::Changed
            } else {
                ProfileEdit::Unchanged
            })
        }
        ProfileCommands::AddSpecialty {
            name,
            years,
            description,
        } => {
            update.add_specialty(&name, years, description.as_deref())?;
            Ok(ProfileEdit::Changed)
        }
        ProfileCommands::RemoveSpecialty { name } => {
            if update.remove_specialty(&name) {
                Ok(ProfileEdit::Changed)
            } else {
                Ok(ProfileEdit::SpecialtyNotFound(name.trim().to_owned()))
            }
        }
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
