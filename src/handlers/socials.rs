use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use super::{load_editable_business, validated};
use crate::auth::AuthenticatedBusiness;
use crate::clients::mailer::Mailer;
use crate::database::Database;
use crate::errors::{ApiError, ApiResult};
use crate::models::{
    ApiResponse, Business, CreateSocialLinkRequest, ReorderSocialLinksRequest, SocialLink,
    UpdateSocialLinkRequest,
};
use crate::policy::{looks_like_personal_profile, plan_personal_profile_nudge};

/// Flags the business and queues a nudge email when `url` looks like an
/// individual's profile.
async fn enforce_link_policy(
    db: &Database,
    mailer: &Mailer,
    business: &Business,
    url: &str,
) -> ApiResult<()> {
    if !looks_like_personal_profile(url) {
        return Ok(());
    }

    let plan = plan_personal_profile_nudge(business, url, Utc::now());
    let updated = db.apply_status_change(business.id, &plan.change).await?;
    log::info!(
        "Business {} linked a personal profile, status now {}",
        updated.id,
        updated.status().as_str()
    );

    if plan.send_email {
        let message = updated.admin_message().unwrap_or_default();
        mailer.send_in_background(mailer.policy_nudge(&updated.email, &updated.business_name, message));
    } else {
        log::info!("Nudge email for business {} skipped, last one was recent", updated.id);
    }

    Ok(())
}

/// Runs [`enforce_link_policy`] after the link write has committed. A policy
/// failure is logged and the saved link is still returned.
async fn apply_link_policy(db: &Database, mailer: &Mailer, business: &Business, url: &str) {
    if let Err(err) = enforce_link_policy(db, mailer, business, url).await {
        log::error!("Link policy check failed for business {}: {err}", business.id);
    }
}

async fn load_owned_link(db: &Database, business_id: Uuid, link_id: Uuid) -> ApiResult<SocialLink> {
    let link = db
        .get_social_link(link_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Social link not found".into()))?;

    if link.business_id != business_id {
        return Err(ApiError::Forbidden("This social link belongs to another business".into()));
    }
    Ok(link)
}

#[get("/socials")]
pub async fn list_links(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
) -> ApiResult<HttpResponse> {
    let links = db.list_social_links(caller.business_id, false).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(links)))
}

#[post("/socials")]
pub async fn create_link(
    db: web::Data<Database>,
    mailer: web::Data<Mailer>,
    caller: AuthenticatedBusiness,
    payload: web::Json<CreateSocialLinkRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let business = load_editable_business(&db, caller.business_id).await?;

    let link = db.create_social_link(body.into_new_social_link(business.id)).await?;
    apply_link_policy(&db, &mailer, &business, &link.url).await;

    Ok(HttpResponse::Created().json(ApiResponse::success(link)))
}

#[put("/socials/reorder")]
pub async fn reorder_links(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
    payload: web::Json<ReorderSocialLinksRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let business = load_editable_business(&db, caller.business_id).await?;

    if !db.reorder_social_links(business.id, &body.ids).await? {
        return Err(ApiError::Forbidden(
            "One or more links do not belong to your business".into(),
        ));
    }

    let links = db.list_social_links(business.id, false).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(links)))
}

#[put("/socials/{link_id}")]
pub async fn update_link(
    db: web::Data<Database>,
    mailer: web::Data<Mailer>,
    caller: AuthenticatedBusiness,
    link_id: web::Path<Uuid>,
    payload: web::Json<UpdateSocialLinkRequest>,
) -> ApiResult<HttpResponse> {
    let link_id = link_id.into_inner();
    let body = validated(payload)?;
    let business = load_editable_business(&db, caller.business_id).await?;

    let mut link = load_owned_link(&db, business.id, link_id).await?;
    let url_changed = body.apply_to_existing(&mut link);
    let link = db.update_social_link(&link).await?;

    if url_changed {
        apply_link_policy(&db, &mailer, &business, &link.url).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(link)))
}

#[delete("/socials/{link_id}")]
pub async fn delete_link(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
    link_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let link_id = link_id.into_inner();
    let business = load_editable_business(&db, caller.business_id).await?;

    load_owned_link(&db, business.id, link_id).await?;
    db.delete_social_link(business.id, link_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "deleted": link_id }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::tests::offline_db;
    use crate::models::VerificationStatus;
    use crate::verification::tests::business_with;

    fn mailer() -> Mailer {
        Mailer::new(None, None, "pages@example.com".into(), "http://localhost:5173")
    }

    #[actix_rt::test]
    async fn business_links_skip_the_status_update() {
        let business = business_with(Some(VerificationStatus::Active), None, None);
        let result =
            enforce_link_policy(&offline_db(), &mailer(), &business, "https://instagram.com/bluedoor").await;
        assert!(result.is_ok());
    }

    #[actix_rt::test]
    async fn policy_failure_does_not_fail_the_request() {
        let business = business_with(Some(VerificationStatus::Active), None, None);
        let db = offline_db();

        let direct = enforce_link_policy(&db, &mailer(), &business, "https://linkedin.com/in/jane").await;
        assert!(direct.is_err());

        // Same write failure, swallowed after logging.
        apply_link_policy(&db, &mailer(), &business, "https://linkedin.com/in/jane").await;
    }
}
