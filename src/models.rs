use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::verification::{self, RestrictionError};

// ============================================================================
// ENUMS
// ============================================================================

/// Business verification status (this is also a Postgres enum)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "verification_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Active,
    Flagged,
    Suspended,
    Disabled,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Active => "active",
            VerificationStatus::Flagged => "flagged",
            VerificationStatus::Suspended => "suspended",
            VerificationStatus::Disabled => "disabled",
        }
    }
}

/// Administrator role (also a Postgres enum)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "admin_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

/// Badge request workflow state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "badge_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BadgeRequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// Review state of an uploaded business document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "document_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

/// Decision an admin takes on a badge request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn resulting_status(&self) -> BadgeRequestStatus {
        match self {
            ReviewDecision::Approve => BadgeRequestStatus::Approved,
            ReviewDecision::Reject => BadgeRequestStatus::Rejected,
        }
    }
}

// ============================================================================
// BUSINESSES
// ============================================================================

/// Business account persisted in database
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Business {
    pub id: Uuid,
    pub slug: String,
    pub business_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    /// Raw column value; NULL on legacy rows. Use [`Business::status`].
    #[serde(skip_serializing)]
    pub verification_status: Option<VerificationStatus>,
    pub is_approved: bool,
    pub is_verified: bool,
    pub suspended_at: Option<DateTime<Utc>>,
    pub disabled_at: Option<DateTime<Utc>>,
    pub policy_code: Option<String>,
    pub policy_violation_text: Option<String>,
    pub nudge_message: Option<String>,
    pub last_nudge_at: Option<DateTime<Utc>>,
    pub community_support_text: Option<String>,
    pub community_support_links: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    pub fn status(&self) -> VerificationStatus {
        verification::resolve_status(self.verification_status, self.disabled_at, self.suspended_at)
    }

    pub fn restriction(&self) -> Option<RestrictionError> {
        verification::restriction_for(self.status(), self.admin_message())
    }

    /// Message an admin (or a policy trigger) left for the owner. Restriction
    /// text comes from here only, never from `policy_violation_text`.
    pub fn admin_message(&self) -> Option<&str> {
        self.nudge_message.as_deref()
    }
}

/// Helper struct used when inserting a new business
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub id: Uuid,
    pub slug: String,
    pub business_name: String,
    pub email: String,
    pub password_hash: String,
    pub category: Option<String>,
}

/// Owner/admin view of a business: every column except the password hash,
/// with the resolved status and any active restriction.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessAccount {
    #[serde(flatten)]
    pub business: Business,
    pub verification_status: VerificationStatus,
    pub restriction: Option<RestrictionError>,
}

impl From<Business> for BusinessAccount {
    fn from(business: Business) -> Self {
        let verification_status = business.status();
        let restriction = business.restriction();
        Self {
            business,
            verification_status,
            restriction,
        }
    }
}

/// Fields of a business that are safe to show to anyone
#[derive(Debug, Clone, Serialize)]
pub struct PublicBusiness {
    pub id: Uuid,
    pub slug: String,
    pub business_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub verification_status: VerificationStatus,
    pub is_verified: bool,
    pub community_support_text: Option<String>,
    pub community_support_links: Value,
    pub created_at: DateTime<Utc>,
}

impl From<&Business> for PublicBusiness {
    fn from(business: &Business) -> Self {
        Self {
            id: business.id,
            slug: business.slug.clone(),
            business_name: business.business_name.clone(),
            description: business.description.clone(),
            category: business.category.clone(),
            website: business.website.clone(),
            phone: business.phone.clone(),
            logo_url: business.logo_url.clone(),
            verification_status: business.status(),
            is_verified: business.is_verified,
            community_support_text: business.community_support_text.clone(),
            community_support_links: business.community_support_links.clone(),
            created_at: business.created_at,
        }
    }
}

/// Public profile page payload
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub business: PublicBusiness,
    pub social_links: Vec<SocialLink>,
    pub badges: Vec<GrantedBadge>,
}

/// Dashboard banner data for the signed-in business
#[derive(Debug, Serialize)]
pub struct AccountStatus {
    pub verification_status: VerificationStatus,
    pub policy_code: Option<String>,
    pub policy_violation_text: Option<String>,
    pub nudge_message: Option<String>,
    pub last_nudge_at: Option<DateTime<Utc>>,
    pub restriction: Option<RestrictionError>,
}

impl From<&Business> for AccountStatus {
    fn from(business: &Business) -> Self {
        Self {
            verification_status: business.status(),
            policy_code: business.policy_code.clone(),
            policy_violation_text: business.policy_violation_text.clone(),
            nudge_message: business.nudge_message.clone(),
            last_nudge_at: business.last_nudge_at,
            restriction: business.restriction(),
        }
    }
}

/// Link entry of the community-support section
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct CommunityLink {
    #[validate(length(min = 1, max = 80))]
    pub label: String,
    #[validate(url, length(max = 2048))]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CommunitySupport {
    pub text: Option<String>,
    pub links: Value,
}

impl From<&Business> for CommunitySupport {
    fn from(business: &Business) -> Self {
        Self {
            text: business.community_support_text.clone(),
            links: business.community_support_links.clone(),
        }
    }
}

// ============================================================================
// SOCIAL LINKS
// ============================================================================

/// Social link shown on a business profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SocialLink {
    pub id: Uuid,
    pub business_id: Uuid,
    pub platform: String,
    pub url: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Helper for creating a new social link
#[derive(Debug, Clone)]
pub struct NewSocialLink {
    pub id: Uuid,
    pub business_id: Uuid,
    pub platform: String,
    pub url: String,
    pub display_order: Option<i32>,
    pub is_active: bool,
}

// ============================================================================
// CUSTOMERS
// ============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// ADMINS
// ============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Counters for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_businesses: i64,
    pub active: i64,
    pub flagged: i64,
    pub suspended: i64,
    pub disabled: i64,
    pub pending_badge_requests: i64,
    pub pending_documents: i64,
    pub customers: i64,
}

// ============================================================================
// BADGES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Badge {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub is_requestable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Badge as granted to a business, joined with its catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GrantedBadge {
    pub badge_id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub granted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BadgeRequest {
    pub id: Uuid,
    pub business_id: Uuid,
    pub badge_id: Uuid,
    pub status: BadgeRequestStatus,
    pub message: Option<String>,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Badge request joined with business and badge names for review queues
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BadgeRequestDetail {
    pub id: Uuid,
    pub business_id: Uuid,
    pub business_name: String,
    pub business_slug: String,
    pub badge_id: Uuid,
    pub badge_code: String,
    pub badge_name: String,
    pub status: BadgeRequestStatus,
    pub message: Option<String>,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BusinessBadges {
    pub badges: Vec<GrantedBadge>,
    pub requests: Vec<BadgeRequestDetail>,
}

// ============================================================================
// DOCUMENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessDocument {
    pub id: Uuid,
    pub business_id: Uuid,
    pub doc_type: String,
    pub original_name: String,
    pub file_path: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub status: DocumentStatus,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBusinessDocument {
    pub id: Uuid,
    pub business_id: Uuid,
    pub doc_type: String,
    pub original_name: String,
    pub file_path: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
}

// ============================================================================
// REQUEST/RESPONSE DTOs
// ============================================================================

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error_with_details(message: String, details: Option<Value>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            details,
            timestamp: Utc::now(),
        }
    }
}

/// Page of results with pagination metadata
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub businesses: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Normalized page/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 25;
    /// Largest page whose offset still fits in an `i64`.
    pub const MAX_PAGE: i64 = i64::MAX / Self::MAX_LIMIT;

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, Self::MAX_PAGE),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn with_total(&self, total: i64) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            total_pages: total.saturating_add(self.limit - 1) / self.limit,
        }
    }
}

/// Slugs that collide with fixed routes under `/api/businesses`
pub const RESERVED_SLUGS: &[&str] = &["profile", "community-support", "status", "documents"];

/// Lowercase the name and collapse every run of non-alphanumerics into `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let mut slug = slug.trim_end_matches('-').to_string();
    slug.truncate(60);
    slug.trim_end_matches('-').to_string()
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = (3..=60).contains(&slug.len())
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-');
    if !well_formed {
        return Err(ValidationError::new("slug")
            .with_message("Slug must be 3-60 lowercase letters, digits or dashes".into()));
    }
    if RESERVED_SLUGS.contains(&slug) {
        return Err(ValidationError::new("reserved_slug")
            .with_message("This slug is reserved".into()));
    }
    Ok(())
}

fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("http_url")
            .with_message("URL must start with http:// or https://".into()))
    }
}

/// Payload sent by a business to create an account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterBusinessRequest {
    #[validate(length(min = 2, max = 120))]
    pub business_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 120))]
    pub category: Option<String>,
}

impl RegisterBusinessRequest {
    /// Explicit slug, or one derived from the business name.
    pub fn resolved_slug(&self) -> Result<String, ValidationError> {
        let slug = match &self.slug {
            Some(slug) => slug.trim().to_ascii_lowercase(),
            None => slugify(&self.business_name),
        };
        validate_slug(&slug)?;
        Ok(slug)
    }

    pub fn into_new_business(self, slug: String, password_hash: String) -> NewBusiness {
        NewBusiness {
            id: Uuid::new_v4(),
            slug,
            business_name: self.business_name.trim().to_string(),
            email: self.email.trim().to_ascii_lowercase(),
            password_hash,
            category: self.category,
        }
    }
}

/// Email/password pair shared by every login route
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct BusinessAuthResponse {
    pub token: String,
    pub business: BusinessAccount,
}

/// Profile edit performed by the owning business
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 120))]
    pub business_name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 120))]
    pub category: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
}

impl UpdateProfileRequest {
    pub fn apply_to_existing(self, existing: &mut Business) {
        if let Some(business_name) = self.business_name {
            existing.business_name = business_name.trim().to_string();
        }
        if self.description.is_some() {
            existing.description = self.description;
        }
        if self.category.is_some() {
            existing.category = self.category;
        }
        if self.website.is_some() {
            existing.website = self.website;
        }
        if self.phone.is_some() {
            existing.phone = self.phone;
        }
        if self.logo_url.is_some() {
            existing.logo_url = self.logo_url;
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommunitySupportRequest {
    #[validate(length(max = 2000))]
    pub text: Option<String>,
    #[validate(length(max = 10))]
    #[validate(nested)]
    #[serde(default)]
    pub links: Vec<CommunityLink>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSocialLinkRequest {
    #[validate(length(min = 1, max = 40))]
    pub platform: String,
    #[validate(url, length(max = 2048), custom(function = "validate_http_url"))]
    pub url: String,
    #[validate(range(min = 0, max = 1000))]
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl CreateSocialLinkRequest {
    pub fn into_new_social_link(self, business_id: Uuid) -> NewSocialLink {
        NewSocialLink {
            id: Uuid::new_v4(),
            business_id,
            platform: self.platform.trim().to_ascii_lowercase(),
            url: self.url.trim().to_string(),
            display_order: self.display_order,
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSocialLinkRequest {
    #[validate(length(min = 1, max = 40))]
    pub platform: Option<String>,
    #[validate(url, length(max = 2048), custom(function = "validate_http_url"))]
    pub url: Option<String>,
    #[validate(range(min = 0, max = 1000))]
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl UpdateSocialLinkRequest {
    /// Applies the patch and reports whether the URL changed.
    pub fn apply_to_existing(self, existing: &mut SocialLink) -> bool {
        if let Some(platform) = self.platform {
            existing.platform = platform.trim().to_ascii_lowercase();
        }
        let mut url_changed = false;
        if let Some(url) = self.url {
            let url = url.trim().to_string();
            url_changed = url != existing.url;
            existing.url = url;
        }
        if let Some(display_order) = self.display_order {
            existing.display_order = display_order;
        }
        if let Some(is_active) = self.is_active {
            existing.is_active = is_active;
        }
        url_changed
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReorderSocialLinksRequest {
    #[validate(length(min = 1, max = 100))]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBadgeRequestRequest {
    pub badge_id: Uuid,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewBadgeRequestRequest {
    pub decision: ReviewDecision,
    #[validate(length(max = 2000))]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBadgeRequest {
    #[validate(length(min = 2, max = 60))]
    pub code: String,
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(url)]
    pub icon_url: Option<String>,
    pub is_requestable: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBadgeRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(url)]
    pub icon_url: Option<String>,
    pub is_requestable: Option<bool>,
}

impl UpdateBadgeRequest {
    pub fn apply_to_existing(self, existing: &mut Badge) {
        if let Some(name) = self.name {
            existing.name = name;
        }
        if self.description.is_some() {
            existing.description = self.description;
        }
        if self.icon_url.is_some() {
            existing.icon_url = self.icon_url;
        }
        if let Some(is_requestable) = self.is_requestable {
            existing.is_requestable = is_requestable;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GrantBadgeRequest {
    pub badge_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AdminAuthResponse {
    pub token: String,
    pub admin: Admin,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: VerificationStatus,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    #[validate(length(max = 64))]
    pub policy_code: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NudgeRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[validate(length(max = 64))]
    pub policy_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub is_approved: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewDocumentRequest {
    pub status: DocumentStatus,
    #[validate(length(max = 2000))]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCustomerRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 80))]
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerAuthResponse {
    pub token: String,
    pub customer: Customer,
}

// ============================================================================
// QUERY STRINGS
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct PublicSearchQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub badge: Option<String>,
    pub community_support: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminBusinessQuery {
    pub q: Option<String>,
    pub status: Option<VerificationStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BadgeRequestQuery {
    pub status: Option<BadgeRequestStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    pub business_id: Option<Uuid>,
    pub status: Option<DocumentStatus>,
}
