use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Server error: status {0}")]
    Server(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl RegistryError {
    /// Message shown to the user instead of the raw error
    pub fn user_message(&self) -> String {
        match self {
            RegistryError::NotFound(_) => "Package not found".to_string(),
            RegistryError::RateLimited {
                retry_after_secs: Some(secs),
            } => format!("Too many requests. Try again in {} seconds", secs),
            RegistryError::RateLimited {
                retry_after_secs: None,
            } => "Too many requests. Try again later".to_string(),
            RegistryError::Server(_) => {
                "The registry is having trouble right now. Try again later".to_string()
            }
            RegistryError::Network(_) => {
                "No response from server. Please check your connection.".to_string()
            }
            RegistryError::InvalidResponse(_) | RegistryError::InvalidUrl(_) => {
                "Error fetching package data".to_string()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Please enter a package name")]
    EmptyPackageName,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ReportError {
    pub fn user_message(&self) -> String {
        match self {
            ReportError::EmptyPackageName => self.to_string(),
            ReportError::Registry(e) => e.user_message(),
        }
    }
}
