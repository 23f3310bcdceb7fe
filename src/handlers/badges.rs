use actix_web::{get, post, web, HttpResponse};

use super::{load_editable_business, validated};
use crate::auth::AuthenticatedBusiness;
use crate::database::Database;
use crate::errors::{ApiError, ApiResult};
use crate::models::{ApiResponse, BusinessBadges, CreateBadgeRequestRequest};

#[get("/badges")]
pub async fn list_catalog(db: web::Data<Database>) -> ApiResult<HttpResponse> {
    let badges = db.list_badges().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(badges)))
}

#[get("/badges/mine")]
pub async fn list_mine(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
) -> ApiResult<HttpResponse> {
    let badges = db.list_business_badges(caller.business_id).await?;
    let requests = db.list_badge_requests_for_business(caller.business_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(BusinessBadges { badges, requests })))
}

#[post("/badges/requests")]
pub async fn request_badge(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
    payload: web::Json<CreateBadgeRequestRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let business = load_editable_business(&db, caller.business_id).await?;

    let badge = db
        .get_badge(body.badge_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Badge not found".into()))?;
    if !badge.is_requestable {
        return Err(ApiError::BadRequest(format!(
            "The '{}' badge is granted by administrators only",
            badge.name
        )));
    }
    if db.business_has_badge(business.id, badge.id).await? {
        return Err(ApiError::Conflict("You already hold this badge".into()));
    }

    // The partial unique index turns a second pending request into a 409.
    let request = db
        .create_badge_request(business.id, badge.id, body.message)
        .await
        .map_err(|err| {
            ApiError::conflict_on_duplicate(err, "A request for this badge is already pending")
        })?;

    log::info!("Business {} requested badge {}", business.id, badge.code);
    Ok(HttpResponse::Created().json(ApiResponse::success(request)))
}
