//! Editable copy of the signed-in user's profile, sent back with `PUT /users/me`.

use serde::Serialize;
use thiserror::Error;

use crate::types::{ProfileSpecialty, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("specialty name must not be blank")]
    BlankSpecialty,
}

/// Full profile body; the API replaces every field on update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "foto_url")]
    pub photo_url: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "especialidades")]
    pub specialties: Vec<ProfileSpecialty>,
}

impl ProfileUpdate {
    /// Starts an edit from the stored profile; absent text fields become empty.
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: text(&profile.name),
            last_name: text(&profile.last_name),
            phone: text(&profile.phone),
            photo_url: text(&profile.photo_url),
            description: text(&profile.description),
            specialties: profile.specialties.clone(),
        }
    }

    /// Appends a specialty to the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::BlankSpecialty`] when `name` is blank.
    pub fn add_specialty(
        &mut self,
        name: &str,
        years_experience: u32,
        description: Option<&str>,
    ) -> Result<(), ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::BlankSpecialty);
        }
        self.specialties.push(ProfileSpecialty {
            name: name.to_owned(),
            years_experience,
            description: description.map(str::trim).unwrap_or_default().to_owned(),
        });
        Ok(())
    }

    /// Removes every specialty whose name matches case-insensitively.
    /// Returns `true` if anything was removed.
    pub fn remove_specialty(&mut self, name: &str) -> bool {
        let target = name.trim().to_lowercase();
        let before = self.specialties.len();
        self.specialties
            .retain(|s| s.name.trim().to_lowercase() != target);
        self.specialties.len() != before
    }
}
