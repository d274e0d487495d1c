use serde::{Deserialize, Serialize};

/// The individual whose registration is being changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    /// Registration (attendee) record identifier.
    pub id: String,
    pub contact_id: String,
    pub name: String,
    pub email: Option<String>,
    /// Account the registrant belongs to; scopes substitute contact searches.
    pub account_id: Option<String>,
}
