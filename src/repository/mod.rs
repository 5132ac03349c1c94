use thiserror::Error;

use crate::domain::profile::ReferenceProfile;

pub mod profile;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read reference data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed reference data: {0}")]
    Parse(String),
}

pub type ProfileResult<T> = Result<T, ProfileError>;

/// Source of the learned reference profile.
pub trait ProfileReader {
    /// Loads the profile. A missing source yields an empty profile.
    fn load_profile(&self) -> ProfileResult<ReferenceProfile>;
}
