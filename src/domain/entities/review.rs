//! Review lifecycle shared by submissions and claims.

use std::fmt;
use std::str::FromStr;

/// Status of a submission or claim.
///
/// `Pending` is the only non-terminal state; both `Approved` and `Rejected`
/// are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(self) -> bool {
        self == ReviewStatus::Pending
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            other => Err(format!("unknown review status '{other}'")),
        }
    }
}

/// Admin decision on a pending row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    /// Status the row ends in after this action.
    pub const fn target_status(self) -> ReviewStatus {
        match self {
            ReviewAction::Approve => ReviewStatus::Approved,
            ReviewAction::Reject => ReviewStatus::Rejected,
        }
    }
}

impl FromStr for ReviewAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(ReviewAction::Approve),
            "reject" => Ok(ReviewAction::Reject),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for s in ["pending", "approved", "rejected"] {
            assert_eq!(s.parse::<ReviewStatus>().unwrap().to_string(), s);
        }
        assert!("archived".parse::<ReviewStatus>().is_err());
    }

    #[test]
    fn test_only_pending_is_pending() {
        assert!(ReviewStatus::Pending.is_pending());
        assert!(!ReviewStatus::Approved.is_pending());
        assert!(!ReviewStatus::Rejected.is_pending());
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("approve".parse::<ReviewAction>().unwrap(), ReviewAction::Approve);
        assert_eq!(" Reject ".parse::<ReviewAction>().unwrap(), ReviewAction::Reject);
        assert!("delete".parse::<ReviewAction>().is_err());
        assert_eq!(ReviewAction::Reject.target_status(), ReviewStatus::Rejected);
    }
}
