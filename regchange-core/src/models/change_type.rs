use serde::{Deserialize, Serialize};

/// The three mutually exclusive ways a registration can be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    Cancellation,
    Substitution,
    Transfer,
}

impl ChangeType {
    pub fn all() -> &'static [ChangeType] {
        &[
            ChangeType::Cancellation,
            ChangeType::Substitution,
            ChangeType::Transfer,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeType::Cancellation => "Cancellation",
            ChangeType::Substitution => "Substitution",
            ChangeType::Transfer => "Transfer",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
