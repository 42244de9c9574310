//! Authenticated identity and its persisted record shape.
//!
//! An [`Identity`] is immutable once built: a new login produces a new value.
//! The persisted record and the authentication payload share one JSON shape,
//! exactly `{ "id", "name", "email", "role" }`, all strings.

use serde::{Deserialize, Serialize};
use tracing::warn;

pub mod role;

pub use role::{Role, UnknownRole};

/// Errors from decoding an identity record or payload.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Input was not valid JSON, or did not have the expected shape.
    #[error("malformed identity record: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Could not encode the identity for storage.
    #[error("failed to encode identity: {0}")]
    Encode(String),
}

/// The authenticated user's id, display name, email, and role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: String,
    name: String,
    email: String,
    role: Role,
}

impl Identity {
    /// Build an identity from its four fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Opaque user identifier issued by the authentication service.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Authorization role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Decode the payload returned by the authentication service.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Malformed`] when the payload is not JSON or
    /// does not have exactly the four string fields.
    pub fn from_auth_payload(payload: &str) -> Result<Self, IdentityError> {
        decode_record(payload)
    }
}

/// Wire form of an identity. Extra or missing fields reject the whole record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionRecord {
    id: String,
    name: String,
    email: String,
    role: String,
}

impl From<SessionRecord> for Identity {
    fn from(record: SessionRecord) -> Self {
        let role = match record.role.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                warn!(id = %record.id, error = %e, "falling back to public role");
                Role::Public
            }
        };
        Identity {
            id: record.id,
            name: record.name,
            email: record.email,
            role,
        }
    }
}

impl From<&Identity> for SessionRecord {
    fn from(identity: &Identity) -> Self {
        SessionRecord {
            id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            role: identity.role.as_str().to_owned(),
        }
    }
}

/// Parse a stored or received record into an [`Identity`].
///
/// A well-shaped record with an unrecognized role tag decodes as
/// [`Role::Public`].
///
/// # Errors
///
/// Returns [`IdentityError::Malformed`] for invalid JSON or any other shape.
pub fn decode_record(raw: &str) -> Result<Identity, IdentityError> {
    let record: SessionRecord = serde_json::from_str(raw)?;
    Ok(record.into())
}

/// Serialize an [`Identity`] into its persisted record form.
///
/// # Errors
///
/// Returns [`IdentityError::Encode`] if serialization fails.
pub fn encode_record(identity: &Identity) -> Result<String, IdentityError> {
    serde_json::to_string(&SessionRecord::from(identity))
        .map_err(|e| IdentityError::Encode(e.to_string()))
}
