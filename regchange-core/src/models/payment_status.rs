use serde::{Deserialize, Serialize};

/// Payment status of the originating financial record.
///
/// The textual codes match what backends report (`"Partial Payment"`,
/// `"N/A"`, ...), so the enum serializes to and parses from those strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Paid")]
    Paid,
    #[serde(rename = "Partial Payment")]
    PartialPayment,
    #[serde(rename = "Unpaid")]
    Unpaid,
    #[serde(rename = "Refunded")]
    Refunded,
    #[default]
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::PartialPayment => "Partial Payment",
            Self::Unpaid => "Unpaid",
            Self::Refunded => "Refunded",
            Self::NotApplicable => "N/A",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Paid" => Some(Self::Paid),
            "Partial Payment" => Some(Self::PartialPayment),
            "Unpaid" => Some(Self::Unpaid),
            "Refunded" => Some(Self::Refunded),
            "N/A" | "" => Some(Self::NotApplicable),
            _ => None,
        }
    }

    /// Whether money has been received against the record, which is what
    /// makes a cancellation settlement decision necessary.
    pub fn has_received_funds(&self) -> bool {
        matches!(self, Self::Paid | Self::PartialPayment)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
