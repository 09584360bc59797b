use clap::error::ErrorKind;
use vecinos_api::{ApiError, ProfileSpecialty, ProfileUpdate};

use super::*;
use crate::account::{apply_profile_edit, explain, ProfileEdit};

fn profile() -> ProfileUpdate {
    ProfileUpdate {
        name: "Ana".to_owned(),
        last_name: "Gómez".to_owned(),
        phone: String::new(),
        photo_url: String::new(),
        description: String::new(),
        specialties: vec![ProfileSpecialty {
            name: "Plomero".to_owned(),
            years_experience: 4,
            description: String::new(),
        }],
    }
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["vecinos"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_nearby_defaults() {
    let cli = Cli::try_parse_from(["vecinos", "nearby"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby(NearbyArgs {
            radius: None,
            specialty: None,
            lat: None,
            lng: None,
            interactive: false,
        }))
    ));
}

#[test]
fn parses_nearby_with_radius_specialty_and_position() {
    let cli = Cli::try_parse_from([
        "vecinos",
        "nearby",
        "--radius",
        "25",
        "--specialty",
        "plomero",
        "--lat",
        "4.6",
        "--lng",
        "-74.08",
        "--interactive",
    ])
    .unwrap();
    let Some(Commands::Nearby(args)) = cli.command else {
        panic!("expected nearby command");
    };
    assert_eq!(args.radius, Some(25.0));
    assert_eq!(args.specialty.as_deref(), Some("plomero"));
    assert_eq!(args.lat, Some(4.6));
    assert_eq!(args.lng, Some(-74.08));
    assert!(args.interactive);
}

#[test]
fn nearby_lat_requires_lng() {
    assert!(Cli::try_parse_from(["vecinos", "nearby", "--lat", "4.6"]).is_err());
}

#[test]
fn parses_login() {
    let cli = Cli::try_parse_from([
        "vecinos",
        "login",
        "--email",
        "ana@example.com",
        "--password",
        "secret",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Login { ref email, .. }) if email == "ana@example.com"
    ));
}

#[test]
fn parses_register() {
    let cli = Cli::try_parse_from([
        "vecinos",
        "register",
        "--name",
        "Ana",
        "--email",
        "ana@example.com",
        "--password",
        "secret",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Register { ref name, .. }) if name == "Ana"
    ));
}

#[test]
fn parses_me() {
    let cli = Cli::try_parse_from(["vecinos", "me"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Me)));
}

#[test]
fn parses_profile_add_specialty_with_default_years() {
    let cli = Cli::try_parse_from([
        "vecinos",
        "profile",
        "add-specialty",
        "--name",
        "Pintor",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Profile {
            command: ProfileCommands::AddSpecialty {
                ref name,
                years: 0,
                description: None,
            }
        }) if name == "Pintor"
    ));
}

#[test]
fn parses_profile_remove_specialty() {
    let cli = Cli::try_parse_from([
        "vecinos",
        "profile",
        "remove-specialty",
        "--name",
        "plomero",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Profile {
            command: ProfileCommands::RemoveSpecialty { ref name }
        }) if name == "plomero"
    ));
}

#[test]
fn profile_update_changes_only_given_fields() {
    let mut update = profile();
    let changed = apply_profile_edit(
        &mut update,
        ProfileCommands::Update {
            name: None,
            last_name: None,
            phone: Some(" 300 123 4567 ".to_owned()),
            photo_url: None,
            description: None,
        },
    )
    .unwrap();
    assert_eq!(changed, ProfileEdit::Changed);
    assert_eq!(update.name, "Ana");
    assert_eq!(update.phone, "300 123 4567");
}

#[test]
fn profile_update_without_flags_changes_nothing() {
    let mut update = profile();
    let changed = apply_profile_edit(
        &mut update,
        ProfileCommands::Update {
            name: None,
            last_name: None,
            phone: None,
            photo_url: None,
            description: None,
        },
    )
    .unwrap();
    assert_eq!(changed, ProfileEdit::Unchanged);
    assert_eq!(update, profile());
}

#[test]
fn profile_update_rejects_blank_name() {
    let mut update = profile();
    let result = apply_profile_edit(
        &mut update,
        ProfileCommands::Update {
            name: Some("  ".to_owned()),
            last_name: None,
            phone: None,
            photo_url: None,
            description: None,
        },
    );
    assert!(result.is_err());
}

#[test]
fn add_blank_specialty_is_rejected() {
    let mut update = profile();
    let result = apply_profile_edit(
        &mut update,
        ProfileCommands::AddSpecialty {
            name: " ".to_owned(),
            years: 2,
            description: None,
        },
    );
    assert!(result.is_err());
    assert_eq!(update.specialties.len(), 1);
}

#[test]
fn remove_missing_specialty_is_reported_to_caller() {
    let mut update = profile();
    let outcome = apply_profile_edit(
        &mut update,
        ProfileCommands::RemoveSpecialty {
            name: " Pintor ".to_owned(),
        },
    )
    .unwrap();
    assert_eq!(outcome, ProfileEdit::SpecialtyNotFound("Pintor".to_owned()));
    assert_eq!(update, profile());

    let changed = apply_profile_edit(
        &mut update,
        ProfileCommands::RemoveSpecialty {
            name: "plomero".to_owned(),
        },
    )
    .unwrap();
    assert_eq!(changed, ProfileEdit::Changed);
    assert!(update.specialties.is_empty());
}

#[test]
fn help_parses_without_any_configuration() {
    let err = Cli::try_parse_from(["vecinos", "--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
}

#[test]
fn explain_prefers_server_message() {
    let err = explain(ApiError::Status {
        status: 409,
        url: "http://localhost:3400/auth/register".to_owned(),
        message: Some("El email ya está registrado".to_owned()),
    });
    assert_eq!(err.to_string(), "El email ya está registrado (HTTP 409)");
}

#[test]
fn explain_adds_login_hint_for_rejected_token() {
    let err = explain(ApiError::Unauthenticated { status: 401 });
    assert!(err.to_string().contains("run `vecinos login` again"));
}
