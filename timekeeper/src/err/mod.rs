use thiserror::Error;

/// Message carried by every attempt to time something that is not a method.
pub const NOT_A_METHOD: &str = "The @time decorator can only be used on methods.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("The @time decorator can only be used on methods.")]
    NotAMethod { member: String },
}

impl ConfigurationError {
    pub fn not_a_method(member: &str) -> Self {
        ConfigurationError::NotAMethod {
            member: member.to_string(),
        }
    }

    /// Name of the member the timer was applied to.
    pub fn member(&self) -> &str {
        match self {
            ConfigurationError::NotAMethod { member } => member,
        }
    }
}
