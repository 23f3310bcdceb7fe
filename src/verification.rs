//! Account verification state machine.
//!
//! A business is `active`, `flagged` (warned, still editable), `suspended`
//! (profile shown without links, edits blocked) or `disabled` (edits
//! blocked, profile hidden once the disable is older than
//! [`DISABLED_RETENTION_DAYS`]).

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::{Business, VerificationStatus};

pub const DISABLED_RETENTION_DAYS: i64 = 7;

pub const SUSPENDED_CODE: &str = "ACCOUNT_SUSPENDED";
pub const DISABLED_CODE: &str = "ACCOUNT_DISABLED";

const DEFAULT_SUSPENDED_MESSAGE: &str =
    "Your account has been suspended. Your profile is visible without links until an administrator reviews it.";
const DEFAULT_DISABLED_MESSAGE: &str =
    "Your account has been disabled. Contact support to restore access.";

/// Normalizes a stored status, falling back to the legacy timestamps when the
/// column is NULL.
pub fn resolve_status(
    stored: Option<VerificationStatus>,
    disabled_at: Option<DateTime<Utc>>,
    suspended_at: Option<DateTime<Utc>>,
) -> VerificationStatus {
    match stored {
        Some(status) => status,
        None if disabled_at.is_some() => VerificationStatus::Disabled,
        None if suspended_at.is_some() => VerificationStatus::Suspended,
        None => VerificationStatus::Active,
    }
}

/// Structured 403 payload returned to a restricted business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestrictionError {
    pub code: &'static str,
    pub status: VerificationStatus,
    pub message: String,
}

pub fn restriction_for(
    status: VerificationStatus,
    override_message: Option<&str>,
) -> Option<RestrictionError> {
    let (code, default_message) = match status {
        VerificationStatus::Suspended => (SUSPENDED_CODE, DEFAULT_SUSPENDED_MESSAGE),
        VerificationStatus::Disabled => (DISABLED_CODE, DEFAULT_DISABLED_MESSAGE),
        VerificationStatus::Active | VerificationStatus::Flagged => return None,
    };

    let message = override_message
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .unwrap_or(default_message)
        .to_string();

    Some(RestrictionError {
        code,
        status,
        message,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileVisibility {
    /// Business record and its active social links.
    Full,
    /// Business record only; links are withheld.
    Restricted,
    /// Treated as not found.
    Hidden,
}

pub fn public_visibility(
    status: VerificationStatus,
    disabled_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ProfileVisibility {
    match status {
        VerificationStatus::Disabled => match disabled_at {
            Some(at) if now - at > Duration::days(DISABLED_RETENTION_DAYS) => {
                ProfileVisibility::Hidden
            }
            _ => ProfileVisibility::Full,
        },
        VerificationStatus::Suspended => ProfileVisibility::Restricted,
        VerificationStatus::Active | VerificationStatus::Flagged => ProfileVisibility::Full,
    }
}

pub fn business_visibility(business: &Business, now: DateTime<Utc>) -> ProfileVisibility {
    public_visibility(business.status(), business.disabled_at, now)
}

/// Column values written by a single status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub verification_status: VerificationStatus,
    pub suspended_at: Option<DateTime<Utc>>,
    pub disabled_at: Option<DateTime<Utc>>,
    pub policy_code: Option<String>,
    pub policy_violation_text: Option<String>,
    pub nudge_message: Option<String>,
    pub last_nudge_at: Option<DateTime<Utc>>,
}

impl StatusChange {
    /// Snapshot of the current row; used as the base for every plan.
    pub fn unchanged(business: &Business) -> Self {
        Self {
            verification_status: business.status(),
            suspended_at: business.suspended_at,
            disabled_at: business.disabled_at,
            policy_code: business.policy_code.clone(),
            policy_violation_text: business.policy_violation_text.clone(),
            nudge_message: business.nudge_message.clone(),
            last_nudge_at: business.last_nudge_at,
        }
    }
}

/// Plans an admin-driven status transition.
///
/// `active` clears every restriction and policy field. `suspended` and
/// `disabled` keep their original timestamp when re-applied, and replace the
/// nudge message so the default restriction text applies when none is given.
pub fn plan_admin_transition(
    business: &Business,
    target: VerificationStatus,
    message: Option<String>,
    policy_code: Option<String>,
    now: DateTime<Utc>,
) -> StatusChange {
    let current = StatusChange::unchanged(business);
    let message = message.filter(|m| !m.trim().is_empty());

    match target {
        VerificationStatus::Active => StatusChange {
            verification_status: target,
            suspended_at: None,
            disabled_at: None,
            policy_code: None,
            policy_violation_text: None,
            nudge_message: None,
            ..current
        },
        VerificationStatus::Flagged => StatusChange {
            verification_status: target,
            suspended_at: None,
            disabled_at: None,
            policy_code: policy_code.or(current.policy_code.clone()),
            nudge_message: message.or(current.nudge_message.clone()),
            ..current
        },
        VerificationStatus::Suspended => StatusChange {
            verification_status: target,
            suspended_at: Some(current.suspended_at.unwrap_or(now)),
            disabled_at: None,
            policy_code: policy_code.or(current.policy_code.clone()),
            nudge_message: message,
            ..current
        },
        VerificationStatus::Disabled => StatusChange {
            verification_status: target,
            disabled_at: Some(current.disabled_at.unwrap_or(now)),
            policy_code: policy_code.or(current.policy_code.clone()),
            nudge_message: message,
            ..current
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    pub(crate) fn business_with(
        stored: Option<VerificationStatus>,
        suspended_at: Option<DateTime<Utc>>,
        disabled_at: Option<DateTime<Utc>>,
    ) -> Business {
        let now = Utc::now();
        Business {
            id: Uuid::new_v4(),
            slug: "blue-door".into(),
            business_name: "Blue Door".into(),
            email: "owner@bluedoor.test".into(),
            password_hash: "$argon2id$stub".into(),
            description: None,
            category: None,
            website: None,
            phone: None,
            logo_url: None,
            verification_status: stored,
            is_approved: false,
            is_verified: false,
            suspended_at,
            disabled_at,
            policy_code: None,
            policy_violation_text: None,
            nudge_message: None,
            last_nudge_at: None,
            community_support_text: None,
            community_support_links: json!([]),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(business: &mut Business, change: StatusChange) {
        business.verification_status = Some(change.verification_status);
        business.suspended_at = change.suspended_at;
        business.disabled_at = change.disabled_at;
        business.policy_code = change.policy_code;
        business.policy_violation_text = change.policy_violation_text;
        business.nudge_message = change.nudge_message;
        business.last_nudge_at = change.last_nudge_at;
    }

    #[test]
    fn resolves_active_when_nothing_is_set() {
        assert_eq!(resolve_status(None, None, None), VerificationStatus::Active);
    }

    #[test]
    fn resolves_disabled_from_timestamp_alone() {
        let at = Utc::now();
        assert_eq!(resolve_status(None, Some(at), None), VerificationStatus::Disabled);
        assert_eq!(resolve_status(None, None, Some(at)), VerificationStatus::Suspended);
        assert_eq!(resolve_status(None, Some(at), Some(at)), VerificationStatus::Disabled);
    }

    #[test]
    fn stored_status_wins_over_timestamps() {
        let at = Utc::now();
        assert_eq!(
            resolve_status(Some(VerificationStatus::Flagged), Some(at), None),
            VerificationStatus::Flagged
        );
    }

    #[test]
    fn restriction_only_for_suspended_and_disabled() {
        assert!(restriction_for(VerificationStatus::Active, None).is_none());
        assert!(restriction_for(VerificationStatus::Flagged, Some("warning")).is_none());

        let suspended = restriction_for(VerificationStatus::Suspended, None).unwrap();
        assert_eq!(suspended.code, SUSPENDED_CODE);
        assert_eq!(suspended.message, DEFAULT_SUSPENDED_MESSAGE);

        let disabled = restriction_for(VerificationStatus::Disabled, Some("   ")).unwrap();
        assert_eq!(disabled.code, DISABLED_CODE);
        assert_eq!(disabled.message, DEFAULT_DISABLED_MESSAGE);
    }

    #[test]
    fn admin_message_overrides_default_restriction_text() {
        let restriction =
            restriction_for(VerificationStatus::Suspended, Some("Remove the personal link")).unwrap();
        assert_eq!(restriction.message, "Remove the personal link");
        assert_eq!(restriction.status, VerificationStatus::Suspended);
    }

    #[test]
    fn disabled_profile_expires_after_seven_days() {
        let now = Utc::now();
        let recent = now - Duration::days(2);
        let old = now - Duration::days(8);

        assert_eq!(
            public_visibility(VerificationStatus::Disabled, Some(recent), now),
            ProfileVisibility::Full
        );
        assert_eq!(
            public_visibility(VerificationStatus::Disabled, Some(old), now),
            ProfileVisibility::Hidden
        );
        assert_eq!(
            public_visibility(VerificationStatus::Disabled, None, now),
            ProfileVisibility::Full
        );
    }

    #[test]
    fn suspended_profile_is_restricted() {
        let business = business_with(None, Some(Utc::now()), None);
        assert_eq!(business_visibility(&business, Utc::now()), ProfileVisibility::Restricted);
    }

    #[test]
    fn activating_clears_timestamps_and_policy() {
        let mut business = business_with(Some(VerificationStatus::Suspended), Some(Utc::now()), None);
        business.policy_code = Some("personal_profile_link".into());
        business.nudge_message = Some("fix it".into());

        let change = plan_admin_transition(&business, VerificationStatus::Active, None, None, Utc::now());
        assert_eq!(change.verification_status, VerificationStatus::Active);
        assert!(change.suspended_at.is_none());
        assert!(change.policy_code.is_none());
        assert!(change.nudge_message.is_none());
    }

    #[test]
    fn re_suspending_keeps_original_timestamp() {
        let first = Utc::now() - Duration::days(3);
        let business = business_with(Some(VerificationStatus::Suspended), Some(first), None);

        let change = plan_admin_transition(
            &business,
            VerificationStatus::Suspended,
            Some("Still under review".into()),
            None,
            Utc::now(),
        );
        assert_eq!(change.suspended_at, Some(first));
        assert_eq!(change.nudge_message.as_deref(), Some("Still under review"));
    }

    #[test]
    fn disabling_stamps_now_and_drops_stale_nudge() {
        let now = Utc::now();
        let mut business = business_with(Some(VerificationStatus::Flagged), None, None);
        business.nudge_message = Some("auto nudge".into());

        let change = plan_admin_transition(&business, VerificationStatus::Disabled, None, None, now);
        assert_eq!(change.disabled_at, Some(now));
        assert!(change.nudge_message.is_none());
        let restriction = restriction_for(change.verification_status, change.nudge_message.as_deref())
            .unwrap();
        assert_eq!(restriction.message, DEFAULT_DISABLED_MESSAGE);
    }

    #[test]
    fn suspending_a_flagged_business_uses_the_default_message() {
        let now = Utc::now();
        let mut business = business_with(Some(VerificationStatus::Active), None, None);
        let plan = crate::policy::plan_personal_profile_nudge(
            &business,
            "https://linkedin.com/in/jane",
            now,
        );
        apply(&mut business, plan.change);
        assert_eq!(business.status(), VerificationStatus::Flagged);
        assert!(business.policy_violation_text.is_some());

        let change = plan_admin_transition(&business, VerificationStatus::Suspended, None, None, now);
        apply(&mut business, change);

        let restriction = business.restriction().unwrap();
        assert_eq!(restriction.code, SUSPENDED_CODE);
        assert_eq!(restriction.message, DEFAULT_SUSPENDED_MESSAGE);
        // The violation record survives for admins.
        assert!(business.policy_violation_text.is_some());
    }

    #[test]
    fn disabling_with_a_message_overrides_the_default() {
        let now = Utc::now();
        let mut business = business_with(Some(VerificationStatus::Flagged), None, None);
        business.policy_violation_text = Some("Social link appears to be a personal profile".into());

        let change = plan_admin_transition(
            &business,
            VerificationStatus::Disabled,
            Some("Closed after repeated warnings".into()),
            None,
            now,
        );
        apply(&mut business, change);
        assert_eq!(business.restriction().unwrap().message, "Closed after repeated warnings");
    }
}
