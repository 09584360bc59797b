pub mod client;
pub mod error;
pub mod profile;
pub mod types;

pub use client::{NearbyApi, NearbyQuery, SignedIn, VecinosClient};
pub use error::ApiError;
pub use profile::{ProfileError, ProfileUpdate};
pub use types::{
    ProfileSpecialty, RawId, RawNumber, RawProvider, RawSpecialty, RegisteredUser, UserProfile,
    UserSummary,
};
