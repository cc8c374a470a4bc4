//! VerificationStatus - Tri-state outcome of an identity check

use serde::{Deserialize, Serialize};

/// Outcome of comparing a declared city against the resolved one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Same city or same metropolitan area
    Verified,
    /// Different city in the same state, or well-known neighbours; needs manual review
    Flagged,
    /// Different state or far apart
    Mismatch,
}

impl VerificationStatus {
    pub const NAMES: &'static [&'static str] = &["verified", "flagged", "mismatch"];

    /// Flagged and mismatch outcomes must carry a reason
    pub fn requires_reason(&self) -> bool {
        !matches!(self, VerificationStatus::Verified)
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::Verified => write!(f, "verified"),
            VerificationStatus::Flagged => write!(f, "flagged"),
            VerificationStatus::Mismatch => write!(f, "mismatch"),
        }
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "verified" => Ok(VerificationStatus::Verified),
            "flagged" => Ok(VerificationStatus::Flagged),
            "mismatch" => Ok(VerificationStatus::Mismatch),
            _ => Err(format!("Unknown verification status: {}", s)),
        }
    }
}
