use serde::{Deserialize, Serialize};

/// How a refund or credit produced by a change is disposed of.
///
/// Which variants may be chosen depends on the path and on the originating
/// financial record; see [`crate::calculations::cancellation_settlement_options`]
/// and [`crate::calculations::transfer_settlement_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementType {
    Refund,
    UnappliedFunds,
    ApplyToBalance,
}

impl SettlementType {
    pub fn label(&self) -> &'static str {
        match self {
            SettlementType::Refund => "Refund",
            SettlementType::UnappliedFunds => "Unapplied Funds",
            SettlementType::ApplyToBalance => "Apply to Remaining Balance",
        }
    }

    /// Accepts the labels above as well as kebab/snake-case spellings.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "refund" => Some(Self::Refund),
            "unappliedfunds" | "unapplied" | "credit" => Some(Self::UnappliedFunds),
            "applytoremainingbalance" | "applytobalance" | "balance" => {
                Some(Self::ApplyToBalance)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for SettlementType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_labels_and_cli_spellings() {
        assert_eq!(SettlementType::parse("Refund"), Some(SettlementType::Refund));
        assert_eq!(
            SettlementType::parse("unapplied-funds"),
            Some(SettlementType::UnappliedFunds)
        );
        assert_eq!(
            SettlementType::parse("Apply to Remaining Balance"),
            Some(SettlementType::ApplyToBalance)
        );
        assert_eq!(
            SettlementType::parse("apply_to_balance"),
            Some(SettlementType::ApplyToBalance)
        );
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(SettlementType::parse("store credit"), None);
    }
}
