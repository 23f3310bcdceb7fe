use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use super::{load_business, validated};
use crate::auth::{hash_password, verify_password, AuthError, AuthenticatedAdmin, Subject, TokenService};
use crate::clients::mailer::Mailer;
use crate::database::{BadgeReviewOutcome, BusinessFilter, Database};
use crate::errors::{ApiError, ApiResult};
use crate::models::{
    Admin, AdminAuthResponse, AdminBusinessQuery, AdminRole, ApiResponse, ApprovalRequest,
    BadgeRequestQuery, BadgeRequestStatus, BusinessAccount, CreateAdminRequest, CreateBadgeRequest, DocumentQuery,
    DocumentStatus, GrantBadgeRequest, LoginRequest, NudgeRequest, PageRequest, Paginated,
    ReviewBadgeRequestRequest, ReviewDocumentRequest, UpdateBadgeRequest, UpdateStatusRequest,
    VerificationStatus,
};
use crate::policy::plan_admin_nudge;
use crate::verification::plan_admin_transition;

/// Resolves the token to a live admin row; deleted admins lose access.
async fn current_admin(db: &Database, caller: AuthenticatedAdmin) -> ApiResult<Admin> {
    db.get_admin(caller.admin_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("Admin account no longer exists".into()))
}

async fn require_super_admin(db: &Database, caller: AuthenticatedAdmin) -> ApiResult<Admin> {
    let admin = current_admin(db, caller).await?;
    if admin.role != AdminRole::SuperAdmin {
        return Err(ApiError::Forbidden("Only super admins can manage administrators".into()));
    }
    Ok(admin)
}

fn not_found_on_missing_row(message: &'static str) -> impl Fn(sqlx::Error) -> ApiError {
    move |err| match err {
        sqlx::Error::RowNotFound => ApiError::NotFound(message.into()),
        other => ApiError::Database(other),
    }
}

/// Creates the first super admin when the table is empty. Returns `None`
/// when admins already exist.
pub async fn bootstrap_super_admin(db: &Database, email: &str, password: &str) -> ApiResult<Option<Admin>> {
    if db.count_admins().await? > 0 {
        return Ok(None);
    }

    let password_hash = hash_password(password)?;
    let admin = db
        .create_admin(email, &password_hash, "Administrator", AdminRole::SuperAdmin)
        .await?;
    log::info!("Bootstrapped super admin {}", admin.email);
    Ok(Some(admin))
}

// ============================================================================
// AUTH
// ============================================================================

#[post("/admin/auth/login")]
pub async fn login(
    db: web::Data<Database>,
    tokens: web::Data<TokenService>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;

    let admin = db
        .get_admin_by_email(&body.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let stored_hash = admin.password_hash.clone();
    let password = body.password;
    if !web::block(move || verify_password(&password, &stored_hash)).await?? {
        log::warn!("Failed admin login for {}", admin.email);
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = tokens.issue(Subject::Admin(admin.id))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(AdminAuthResponse { token, admin })))
}

#[get("/admin/auth/me")]
pub async fn me(db: web::Data<Database>, caller: AuthenticatedAdmin) -> ApiResult<HttpResponse> {
    let admin = current_admin(&db, caller).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(admin)))
}

// ============================================================================
// ADMINISTRATORS
// ============================================================================

#[get("/admin/admins")]
pub async fn list_admins(db: web::Data<Database>, caller: AuthenticatedAdmin) -> ApiResult<HttpResponse> {
    current_admin(&db, caller).await?;
    let admins = db.list_admins().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(admins)))
}

#[post("/admin/admins")]
pub async fn create_admin(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    payload: web::Json<CreateAdminRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let actor = require_super_admin(&db, caller).await?;

    let password = body.password;
    let password_hash = web::block(move || hash_password(&password)).await??;

    let admin = db
        .create_admin(
            &body.email,
            &password_hash,
            &body.name,
            body.role.unwrap_or(AdminRole::Admin),
        )
        .await
        .map_err(|err| ApiError::conflict_on_duplicate(err, "An admin with this email already exists"))?;

    log::info!("Admin {} created admin {}", actor.id, admin.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(admin)))
}

#[delete("/admin/admins/{admin_id}")]
pub async fn delete_admin(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    admin_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let admin_id = admin_id.into_inner();
    let actor = require_super_admin(&db, caller).await?;
    if actor.id == admin_id {
        return Err(ApiError::BadRequest("You cannot delete your own account".into()));
    }

    db.delete_admin(admin_id)
        .await
        .map_err(not_found_on_missing_row("Admin not found"))?;

    log::info!("Admin {} deleted admin {}", actor.id, admin_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "deleted": admin_id }))))
}

#[get("/admin/stats")]
pub async fn get_stats(db: web::Data<Database>, caller: AuthenticatedAdmin) -> ApiResult<HttpResponse> {
    current_admin(&db, caller).await?;
    let stats = db.get_admin_stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}

// ============================================================================
// BUSINESS REVIEW
// ============================================================================

#[get("/admin/businesses")]
pub async fn list_businesses(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    query: web::Query<AdminBusinessQuery>,
) -> ApiResult<HttpResponse> {
    current_admin(&db, caller).await?;

    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit);
    let filter = BusinessFilter {
        query: query.q,
        status: query.status,
        ..Default::default()
    };

    let (businesses, total) = db.search_businesses(&filter, page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(Paginated {
        businesses: businesses.into_iter().map(BusinessAccount::from).collect(),
        pagination: page.with_total(total),
    })))
}

#[get("/admin/businesses/{business_id}")]
pub async fn get_business(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    business_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    current_admin(&db, caller).await?;
    let business = load_business(&db, business_id.into_inner()).await?;

    let social_links = db.list_social_links(business.id, false).await?;
    let badges = db.list_business_badges(business.id).await?;
    let documents = db.list_documents(Some(business.id), None).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
        "business": BusinessAccount::from(business),
        "social_links": social_links,
        "badges": badges,
        "documents": documents,
    }))))
}

#[put("/admin/businesses/{business_id}/status")]
pub async fn update_status(
    db: web::Data<Database>,
    mailer: web::Data<Mailer>,
    caller: AuthenticatedAdmin,
    business_id: web::Path<Uuid>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let actor = current_admin(&db, caller).await?;
    let business = load_business(&db, business_id.into_inner()).await?;

    let previous = business.status();
    let change = plan_admin_transition(&business, body.status, body.message, body.policy_code, Utc::now());
    let updated = db.apply_status_change(business.id, &change).await?;
    let current = updated.status();

    log::info!(
        "Admin {} moved business {} from {} to {}",
        actor.id,
        updated.id,
        previous.as_str(),
        current.as_str()
    );

    if previous != current {
        let message = match updated.restriction() {
            Some(restriction) => restriction.message,
            None if current == VerificationStatus::Active => {
                "Your account is in good standing again.".to_string()
            }
            None => updated
                .admin_message()
                .or(updated.policy_violation_text.as_deref())
                .unwrap_or_default()
                .to_string(),
        };
        mailer.send_in_background(mailer.status_notice(
            &updated.email,
            &updated.business_name,
            current.as_str(),
            &message,
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(BusinessAccount::from(updated))))
}

#[post("/admin/businesses/{business_id}/nudge")]
pub async fn nudge_business(
    db: web::Data<Database>,
    mailer: web::Data<Mailer>,
    caller: AuthenticatedAdmin,
    business_id: web::Path<Uuid>,
    payload: web::Json<NudgeRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let actor = current_admin(&db, caller).await?;
    let business = load_business(&db, business_id.into_inner()).await?;

    let message = body.message.trim().to_string();
    let change = plan_admin_nudge(&business, message.clone(), body.policy_code, Utc::now());
    let updated = db.apply_status_change(business.id, &change).await?;

    log::info!("Admin {} nudged business {}", actor.id, updated.id);
    mailer.send_in_background(mailer.policy_nudge(&updated.email, &updated.business_name, &message));

    Ok(HttpResponse::Ok().json(ApiResponse::success(BusinessAccount::from(updated))))
}

#[put("/admin/businesses/{business_id}/approval")]
pub async fn update_approval(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    business_id: web::Path<Uuid>,
    payload: web::Json<ApprovalRequest>,
) -> ApiResult<HttpResponse> {
    current_admin(&db, caller).await?;
    let updated = db
        .set_business_approval(business_id.into_inner(), payload.is_approved)
        .await?
        .ok_or_else(|| ApiError::NotFound("Business not found".into()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(BusinessAccount::from(updated))))
}

#[delete("/admin/businesses/{business_id}")]
pub async fn delete_business(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    business_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = current_admin(&db, caller).await?;
    let business_id = business_id.into_inner();

    db.delete_business(business_id)
        .await
        .map_err(not_found_on_missing_row("Business not found"))?;

    log::info!("Admin {} deleted business {}", actor.id, business_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "deleted": business_id }))))
}

// ============================================================================
// BADGES
// ============================================================================

#[post("/admin/businesses/{business_id}/badges")]
pub async fn grant_badge(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    business_id: web::Path<Uuid>,
    payload: web::Json<GrantBadgeRequest>,
) -> ApiResult<HttpResponse> {
    let actor = current_admin(&db, caller).await?;
    let business = load_business(&db, business_id.into_inner()).await?;
    let badge = db
        .get_badge(payload.badge_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Badge not found".into()))?;

    let created = db.grant_badge(business.id, badge.id, Some(actor.id)).await?;
    if created {
        log::info!("Admin {} granted badge {} to business {}", actor.id, badge.code, business.id);
    }

    let badges = db.list_business_badges(business.id).await?;
    let response = ApiResponse::success(badges);
    Ok(if created {
        HttpResponse::Created().json(response)
    } else {
        HttpResponse::Ok().json(response)
    })
}

#[delete("/admin/businesses/{business_id}/badges/{badge_id}")]
pub async fn revoke_badge(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let actor = current_admin(&db, caller).await?;
    let (business_id, badge_id) = path.into_inner();

    db.revoke_badge(business_id, badge_id)
        .await
        .map_err(not_found_on_missing_row("Badge is not granted to this business"))?;

    log::info!("Admin {} revoked badge {} from business {}", actor.id, badge_id, business_id);
    let badges = db.list_business_badges(business_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(badges)))
}

#[get("/admin/badges")]
pub async fn list_badges(db: web::Data<Database>, caller: AuthenticatedAdmin) -> ApiResult<HttpResponse> {
    current_admin(&db, caller).await?;
    let badges = db.list_badges().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(badges)))
}

#[post("/admin/badges")]
pub async fn create_badge(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    payload: web::Json<CreateBadgeRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    current_admin(&db, caller).await?;

    let badge = db
        .create_badge(
            &body.code,
            &body.name,
            body.description,
            body.icon_url,
            body.is_requestable.unwrap_or(true),
        )
        .await
        .map_err(|err| ApiError::conflict_on_duplicate(err, "A badge with this code already exists"))?;

    Ok(HttpResponse::Created().json(ApiResponse::success(badge)))
}

#[put("/admin/badges/{badge_id}")]
pub async fn update_badge(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    badge_id: web::Path<Uuid>,
    payload: web::Json<UpdateBadgeRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    current_admin(&db, caller).await?;

    let mut badge = db
        .get_badge(badge_id.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Badge not found".into()))?;
    body.apply_to_existing(&mut badge);

    let updated = db.update_badge(&badge).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

#[delete("/admin/badges/{badge_id}")]
pub async fn delete_badge(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    badge_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    current_admin(&db, caller).await?;
    let badge_id = badge_id.into_inner();

    db.delete_badge(badge_id)
        .await
        .map_err(not_found_on_missing_row("Badge not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "deleted": badge_id }))))
}

#[get("/admin/badge-requests")]
pub async fn list_badge_requests(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    query: web::Query<BadgeRequestQuery>,
) -> ApiResult<HttpResponse> {
    current_admin(&db, caller).await?;
    let requests = db.list_badge_requests(query.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(requests)))
}

#[post("/admin/badge-requests/{request_id}/review")]
pub async fn review_badge_request(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    request_id: web::Path<Uuid>,
    payload: web::Json<ReviewBadgeRequestRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let actor = current_admin(&db, caller).await?;
    let request_id = request_id.into_inner();

    match db
        .review_badge_request(request_id, actor.id, body.decision, body.admin_notes)
        .await?
    {
        BadgeReviewOutcome::Reviewed(request) => {
            log::info!(
                "Admin {} marked badge request {} as {:?}",
                actor.id,
                request.id,
                request.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
        }
        BadgeReviewOutcome::NotFound => Err(ApiError::NotFound("Badge request not found".into())),
        BadgeReviewOutcome::AlreadyReviewed(status) => {
            let outcome = match status {
                BadgeRequestStatus::Approved => "approved",
                BadgeRequestStatus::Rejected => "rejected",
                BadgeRequestStatus::Pending => "pending",
            };
            Err(ApiError::Conflict(format!("Badge request was already {outcome}")))
        }
    }
}

// ============================================================================
// DOCUMENTS
// ============================================================================

#[get("/admin/documents")]
pub async fn list_documents(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    query: web::Query<DocumentQuery>,
) -> ApiResult<HttpResponse> {
    current_admin(&db, caller).await?;
    let documents = db.list_documents(query.business_id, query.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(documents)))
}

#[put("/admin/documents/{document_id}")]
pub async fn review_document(
    db: web::Data<Database>,
    caller: AuthenticatedAdmin,
    document_id: web::Path<Uuid>,
    payload: web::Json<ReviewDocumentRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    if body.status == DocumentStatus::Pending {
        return Err(ApiError::BadRequest("A review must approve or reject the document".into()));
    }
    let actor = current_admin(&db, caller).await?;

    let document = db
        .review_document(document_id.into_inner(), actor.id, body.status, body.admin_notes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".into()))?;

    log::info!("Admin {} reviewed document {}", actor.id, document.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(document)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::tests::{bearer, offline_app};
    use actix_web::{http::StatusCode, test};

    #[actix_rt::test]
    async fn customer_token_cannot_review_badges() {
        let app = offline_app!();
        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/badge-requests/{}/review", Uuid::new_v4()))
            .insert_header(("Authorization", bearer(Subject::Customer(Uuid::new_v4()))))
            .set_json(serde_json::json!({ "decision": "approve" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn unknown_decision_is_a_400() {
        let app = offline_app!();
        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/badge-requests/{}/review", Uuid::new_v4()))
            .insert_header(("Authorization", bearer(Subject::Admin(Uuid::new_v4()))))
            .set_json(serde_json::json!({ "decision": "maybe" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn document_review_cannot_reset_to_pending() {
        let app = offline_app!();
        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/documents/{}", Uuid::new_v4()))
            .insert_header(("Authorization", bearer(Subject::Admin(Uuid::new_v4()))))
            .set_json(serde_json::json!({ "status": "pending" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
