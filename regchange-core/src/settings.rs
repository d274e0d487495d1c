use serde::{Deserialize, Serialize};

/// Tunables for a wizard session. Every field has a default, so a partial
/// `[wizard]` table in a config file is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardSettings {
    /// Shortest registrant identifier accepted before an execute call is
    /// dispatched.
    pub min_registrant_id_len: usize,
    /// Contact searches with fewer characters are not sent.
    pub min_contact_search_len: usize,
    /// Prefix used when rendering currency amounts.
    pub currency_symbol: String,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            min_registrant_id_len: 15,
            min_contact_search_len: 2,
            currency_symbol: "$".to_string(),
        }
    }
}
