use serde::{Deserialize, Serialize};

/// A contact returned by a contact search, eligible as a substitute registrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub account_name: Option<String>,
}
