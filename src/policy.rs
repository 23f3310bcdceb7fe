//! Personal-profile link policy.
//!
//! Business pages must link to business accounts. When a social link looks
//! like an individual's profile the business is flagged and nudged by email.

use chrono::{DateTime, Duration, Utc};
use reqwest::Url;

use crate::models::{Business, VerificationStatus};
use crate::verification::StatusChange;

pub const PERSONAL_PROFILE_POLICY_CODE: &str = "personal_profile_link";

/// Minimum gap between two nudge emails to the same business.
pub const NUDGE_EMAIL_COOLDOWN_HOURS: i64 = 24;

pub const PERSONAL_PROFILE_NUDGE: &str = "One of your social links appears to point to a personal profile. \
Please replace it with your business page so customers can find you.";

/// Heuristic: facebook `profile.php` / `people/` pages and linkedin `in/` /
/// `pub/` pages belong to individuals.
pub fn looks_like_personal_profile(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };

    let host = host.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host);

    let first_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next())
        .unwrap_or("")
        .to_ascii_lowercase();

    match host {
        "facebook.com" | "fb.com" => first_segment == "profile.php" || first_segment == "people",
        "linkedin.com" => first_segment == "in" || first_segment == "pub",
        _ => false,
    }
}

/// Outcome of running the policy against a link the business just saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NudgePlan {
    pub change: StatusChange,
    pub send_email: bool,
}

/// Flags an active business; suspended or disabled businesses keep their
/// status but still get the policy fields recorded.
pub fn plan_personal_profile_nudge(business: &Business, url: &str, now: DateTime<Utc>) -> NudgePlan {
    let current = StatusChange::unchanged(business);
    let verification_status = match current.verification_status {
        VerificationStatus::Active => VerificationStatus::Flagged,
        other => other,
    };

    NudgePlan {
        send_email: nudge_email_due(business.last_nudge_at, now),
        change: StatusChange {
            verification_status,
            policy_code: Some(PERSONAL_PROFILE_POLICY_CODE.to_string()),
            policy_violation_text: Some(format!("Social link appears to be a personal profile: {url}")),
            nudge_message: Some(PERSONAL_PROFILE_NUDGE.to_string()),
            last_nudge_at: Some(now),
            ..current
        },
    }
}

/// Plans a manual nudge written by an admin. Status is left alone.
pub fn plan_admin_nudge(
    business: &Business,
    message: String,
    policy_code: Option<String>,
    now: DateTime<Utc>,
) -> StatusChange {
    let current = StatusChange::unchanged(business);
    StatusChange {
        policy_code: policy_code.or(current.policy_code.clone()),
        nudge_message: Some(message),
        last_nudge_at: Some(now),
        ..current
    }
}

pub fn nudge_email_due(last_nudge_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_nudge_at {
        Some(at) => now - at >= Duration::hours(NUDGE_EMAIL_COOLDOWN_HOURS),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::tests::business_with;

    #[test]
    fn flags_facebook_personal_pages() {
        assert!(looks_like_personal_profile("https://www.facebook.com/profile.php?id=1000123"));
        assert!(looks_like_personal_profile("https://m.facebook.com/people/Jane-Doe/1000123/"));
        assert!(looks_like_personal_profile("https://FACEBOOK.com/profile.php"));
    }

    #[test]
    fn flags_linkedin_member_pages() {
        assert!(looks_like_personal_profile("https://www.linkedin.com/in/jane-doe"));
        assert!(looks_like_personal_profile("https://linkedin.com/pub/jane-doe/1/2/3"));
    }

    #[test]
    fn leaves_business_pages_alone() {
        assert!(!looks_like_personal_profile("https://www.facebook.com/bluedoorbakery"));
        assert!(!looks_like_personal_profile("https://www.linkedin.com/company/blue-door"));
        assert!(!looks_like_personal_profile("https://instagram.com/bluedoor"));
        assert!(!looks_like_personal_profile("https://example.com/in/profile.php"));
        assert!(!looks_like_personal_profile("not a url"));
    }

    #[test]
    fn nudge_flags_active_business() {
        let business = business_with(None, None, None);
        let now = Utc::now();
        let plan = plan_personal_profile_nudge(&business, "https://linkedin.com/in/jane", now);

        assert_eq!(plan.change.verification_status, VerificationStatus::Flagged);
        assert_eq!(plan.change.policy_code.as_deref(), Some(PERSONAL_PROFILE_POLICY_CODE));
        assert!(plan.change.nudge_message.is_some());
        assert_eq!(plan.change.last_nudge_at, Some(now));
        assert!(plan.send_email);
    }

    #[test]
    fn nudge_never_lifts_a_suspension() {
        let business = business_with(Some(VerificationStatus::Suspended), Some(Utc::now()), None);
        let plan = plan_personal_profile_nudge(&business, "https://linkedin.com/in/jane", Utc::now());
        assert_eq!(plan.change.verification_status, VerificationStatus::Suspended);
        assert_eq!(plan.change.suspended_at, business.suspended_at);
    }

    #[test]
    fn email_respects_cooldown() {
        let now = Utc::now();
        let mut business = business_with(Some(VerificationStatus::Flagged), None, None);
        business.last_nudge_at = Some(now - Duration::hours(2));

        let plan = plan_personal_profile_nudge(&business, "https://facebook.com/profile.php", now);
        assert!(!plan.send_email);
        assert_eq!(plan.change.last_nudge_at, Some(now));

        assert!(nudge_email_due(Some(now - Duration::hours(25)), now));
    }

    #[test]
    fn admin_nudge_keeps_status() {
        let business = business_with(Some(VerificationStatus::Active), None, None);
        let change = plan_admin_nudge(&business, "Please add opening hours".into(), None, Utc::now());
        assert_eq!(change.verification_status, VerificationStatus::Active);
        assert_eq!(change.nudge_message.as_deref(), Some("Please add opening hours"));
    }
}
