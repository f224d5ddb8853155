use serde::{Deserialize, Serialize};

/// Authenticated principal reconstructed from a token on every request.
///
/// The wire names are camelCase because the identity travels inside the
/// `user` claim of issued tokens; `username` is the unique principal key
/// and the only field checked for token/identity consistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile_no: String,
    pub email: String,
    pub role_id: i64,
    /// Offset from UTC, in minutes.
    pub time_zone_difference: i32,
    pub org_code: String,
    /// Granted-authority role strings. No ordering, duplicates not enforced.
    pub authorities: Vec<String>,
}

impl Identity {
    pub fn has_authority(&self, role: &str) -> bool {
        self.authorities.iter().any(|a| a == role)
    }
}
