use actix_web::{get, post, web, HttpResponse};

use super::{load_business, validated};
use crate::auth::{hash_password, verify_password, AuthError, AuthenticatedBusiness, Subject, TokenService};
use crate::database::Database;
use crate::errors::{ApiError, ApiResult};
use crate::models::{
    ApiResponse, BusinessAccount, BusinessAuthResponse, LoginRequest, RegisterBusinessRequest,
};

#[post("/auth/register")]
pub async fn register(
    db: web::Data<Database>,
    tokens: web::Data<TokenService>,
    payload: web::Json<RegisterBusinessRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let slug = body.resolved_slug().map_err(|err| {
        ApiError::BadRequest(
            err.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Business name does not produce a usable slug".into()),
        )
    })?;

    let password = body.password.clone();
    let password_hash = web::block(move || hash_password(&password)).await??;

    let business = db
        .create_business(body.into_new_business(slug, password_hash))
        .await
        .map_err(|err| ApiError::conflict_on_duplicate(err, "A business with this email or slug already exists"))?;

    log::info!("Registered business {} ({})", business.slug, business.id);

    let token = tokens.issue(Subject::Business(business.id))?;
    Ok(HttpResponse::Created().json(ApiResponse::success(BusinessAuthResponse {
        token,
        business: BusinessAccount::from(business),
    })))
}

#[post("/auth/login")]
pub async fn login(
    db: web::Data<Database>,
    tokens: web::Data<TokenService>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;

    let business = db
        .get_business_by_email(&body.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let stored_hash = business.password_hash.clone();
    let password = body.password;
    let matches = web::block(move || verify_password(&password, &stored_hash)).await??;
    if !matches {
        return Err(AuthError::InvalidCredentials.into());
    }

    if let Some(restriction) = business.restriction() {
        log::info!(
            "Refused login for {} business {}",
            restriction.status.as_str(),
            business.id
        );
        return Err(ApiError::Restricted(restriction));
    }

    let token = tokens.issue(Subject::Business(business.id))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(BusinessAuthResponse {
        token,
        business: BusinessAccount::from(business),
    })))
}

#[get("/auth/me")]
pub async fn me(db: web::Data<Database>, caller: AuthenticatedBusiness) -> ApiResult<HttpResponse> {
    let business = load_business(&db, caller.business_id).await?;

    let badges = db.list_business_badges(business.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
        "business": BusinessAccount::from(business),
        "badges": badges,
    }))))
}
