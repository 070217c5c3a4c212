//! Session record and the credential derived from it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The signed-in user's session record.
///
/// Created at login and stored by the session store as JSON, for example
/// `{"id": "3", "name": "Ada", "token": "eyJ..."}`. The media layer only ever
/// reads it; it is destroyed on logout or when the service rejects the
/// credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Session {
    /// Acting user id
    #[serde(alias = "userId", deserialize_with = "crate::serde_helpers::string_or_number")]
    id: String,
    /// Name shown in the UI
    #[serde(
        default,
        rename = "name",
        alias = "displayName",
        deserialize_with = "crate::serde_helpers::null_as_default"
    )]
    display_name: String,
    /// Credential material issued at login
    token: String,
}

impl Session {
    /// Create a session record.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            token: token.into(),
        }
    }

    /// Parse a stored session record.
    ///
    /// Returns `None` for anything malformed, including records with an
    /// empty user id or token; a malformed record means "no session".
    ///
    /// # Examples
    ///
    /// ```
    /// use murmur_core::Session;
    ///
    /// let session = Session::parse(r#"{"id": 3, "name": "Ada", "token": "t0k"}"#).unwrap();
    /// assert_eq!(session.id(), "3");
    ///
    /// assert!(Session::parse("not json").is_none());
    /// assert!(Session::parse(r#"{"id": "3", "token": ""}"#).is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Session>(raw) {
            Ok(session) if !session.id.is_empty() && !session.token.is_empty() => Some(session),
            Ok(_) => {
                tracing::debug!("Stored session record is missing id or token");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Stored session record is malformed");
                None
            }
        }
    }

    /// Serialize for the session store.
    pub fn to_record(&self) -> String {
        serde_json::json!({
            "id": self.id,
            "name": self.display_name,
            "token": self.token,
        })
        .to_string()
    }

    /// Credential under the given scheme.
    pub fn credential(&self, scheme: CredentialScheme) -> Credential {
        Credential {
            scheme,
            user_id: self.id.clone(),
            secret: self.token.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// How the credential is encoded into the `Authorization` header.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CredentialScheme {
    /// `Authorization: Bearer {token}`
    #[default]
    #[display("bearer")]
    Bearer,
    /// `Authorization: Basic base64({user}:{token})`
    #[display("basic")]
    Basic,
}

/// Authentication material attached to every outbound request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    scheme: CredentialScheme,
    user_id: String,
    secret: String,
}

impl Credential {
    /// Scheme in use.
    pub fn scheme(&self) -> CredentialScheme {
        self.scheme
    }

    /// User the credential belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Value for the `Authorization` header.
    ///
    /// # Examples
    ///
    /// ```
    /// use murmur_core::{CredentialScheme, Session};
    ///
    /// let session = Session::new("3", "Ada", "t0k");
    /// assert_eq!(session.credential(CredentialScheme::Bearer).header_value(), "Bearer t0k");
    /// assert_eq!(session.credential(CredentialScheme::Basic).header_value(), "Basic Mzp0MGs=");
    /// ```
    pub fn header_value(&self) -> String {
        match self.scheme {
            CredentialScheme::Bearer => format!("Bearer {}", self.secret),
            CredentialScheme::Basic => {
                let pair = format!("{}:{}", self.user_id, self.secret);
                format!("Basic {}", STANDARD.encode(pair))
            }
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("scheme", &self.scheme)
            .field("user_id", &self.user_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}
