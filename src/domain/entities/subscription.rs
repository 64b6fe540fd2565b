//! Billing subscription entity and the entitlement it grants.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

/// Paid plans offered to venue owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plan {
    FeaturedMonthly,
    FeaturedAnnual,
    ClaimedPlus,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::FeaturedMonthly, Plan::FeaturedAnnual, Plan::ClaimedPlus];

    pub const fn as_str(self) -> &'static str {
        match self {
            Plan::FeaturedMonthly => "featured_monthly",
            Plan::FeaturedAnnual => "featured_annual",
            Plan::ClaimedPlus => "claimed_plus",
        }
    }

    pub fn is_featured(self) -> bool {
        matches!(self, Plan::FeaturedMonthly | Plan::FeaturedAnnual)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Plan::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown plan '{s}'"))
    }
}

/// Venue flag derived from a subscription's `(plan, status)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entitlement {
    Featured(bool),
    Claimed(bool),
}

impl Entitlement {
    /// Projects a subscription onto the venue flag it controls.
    ///
    /// Only the provider status `active` grants the flag. Unrecognised plans
    /// control nothing and return `None`.
    pub fn project(plan: &str, status: &str) -> Option<Self> {
        let active = status == "active";
        match plan.parse::<Plan>().ok()? {
            p if p.is_featured() => Some(Entitlement::Featured(active)),
            _ => Some(Entitlement::Claimed(active)),
        }
    }
}

/// Stored subscription record, unique per provider subscription id.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: i64,
    pub venue_id: i64,
    /// Raw plan name as sent in provider metadata.
    pub plan: String,
    /// Latest provider status (`active`, `past_due`, `canceled`, ...).
    pub status: String,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert input keyed by `stripe_subscription_id`.
///
/// A conflicting upsert replaces every other field unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionUpsert {
    pub venue_id: i64,
    pub plan: String,
    pub status: String,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SubscriptionUpsert {
    pub fn entitlement(&self) -> Option<Entitlement> {
        Entitlement::project(&self.plan, &self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_parse() {
        assert_eq!("featured_monthly".parse::<Plan>().unwrap(), Plan::FeaturedMonthly);
        assert_eq!("featured_annual".parse::<Plan>().unwrap(), Plan::FeaturedAnnual);
        assert_eq!("claimed_plus".parse::<Plan>().unwrap(), Plan::ClaimedPlus);
        assert!("gold".parse::<Plan>().is_err());
    }

    #[test]
    fn test_project_featured_plans() {
        assert_eq!(
            Entitlement::project("featured_monthly", "active"),
            Some(Entitlement::Featured(true))
        );
        assert_eq!(
            Entitlement::project("featured_annual", "canceled"),
            Some(Entitlement::Featured(false))
        );
    }

    #[test]
    fn test_project_claimed_plus() {
        assert_eq!(
            Entitlement::project("claimed_plus", "active"),
            Some(Entitlement::Claimed(true))
        );
        assert_eq!(
            Entitlement::project("claimed_plus", "past_due"),
            Some(Entitlement::Claimed(false))
        );
    }

    #[test]
    fn test_project_unknown_plan_is_untouched() {
        assert_eq!(Entitlement::project("platinum", "active"), None);
    }

    #[test]
    fn test_trialing_does_not_grant() {
        assert_eq!(
            Entitlement::project("featured_monthly", "trialing"),
            Some(Entitlement::Featured(false))
        );
    }
}
