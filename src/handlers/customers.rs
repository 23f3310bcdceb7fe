use actix_web::{delete, get, post, web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use super::validated;
use crate::auth::{hash_password, verify_password, AuthError, AuthenticatedCustomer, Subject, TokenService};
use crate::database::Database;
use crate::errors::{ApiError, ApiResult};
use crate::models::{
    ApiResponse, CustomerAuthResponse, LoginRequest, PublicBusiness, RegisterCustomerRequest,
};
use crate::verification::{business_visibility, ProfileVisibility};

#[post("/customers/register")]
pub async fn register(
    db: web::Data<Database>,
    tokens: web::Data<TokenService>,
    payload: web::Json<RegisterCustomerRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;

    let password = body.password;
    let password_hash = web::block(move || hash_password(&password)).await??;

    let customer = db
        .create_customer(&body.email, &password_hash, &body.display_name)
        .await
        .map_err(|err| ApiError::conflict_on_duplicate(err, "A customer with this email already exists"))?;

    let token = tokens.issue(Subject::Customer(customer.id))?;
    Ok(HttpResponse::Created().json(ApiResponse::success(CustomerAuthResponse { token, customer })))
}

#[post("/customers/login")]
pub async fn login(
    db: web::Data<Database>,
    tokens: web::Data<TokenService>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;

    let customer = db
        .get_customer_by_email(&body.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let stored_hash = customer.password_hash.clone();
    let password = body.password;
    if !web::block(move || verify_password(&password, &stored_hash)).await?? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = tokens.issue(Subject::Customer(customer.id))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(CustomerAuthResponse { token, customer })))
}

#[get("/customers/me")]
pub async fn me(
    db: web::Data<Database>,
    caller: AuthenticatedCustomer,
) -> ApiResult<HttpResponse> {
    let customer = db
        .get_customer(caller.customer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".into()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(customer)))
}

#[get("/customers/favorites")]
pub async fn list_favorites(
    db: web::Data<Database>,
    caller: AuthenticatedCustomer,
) -> ApiResult<HttpResponse> {
    let now = Utc::now();
    let favorites: Vec<PublicBusiness> = db
        .list_favorite_businesses(caller.customer_id)
        .await?
        .iter()
        .filter(|business| business_visibility(business, now) != ProfileVisibility::Hidden)
        .map(PublicBusiness::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(favorites)))
}

#[post("/customers/favorites/{business_id}")]
pub async fn add_favorite(
    db: web::Data<Database>,
    caller: AuthenticatedCustomer,
    business_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let business_id = business_id.into_inner();
    let business = db
        .get_business(business_id)
        .await?
        .filter(|business| business_visibility(business, Utc::now()) != ProfileVisibility::Hidden)
        .ok_or_else(|| ApiError::NotFound("Business not found".into()))?;

    let created = db
        .add_favorite(caller.customer_id, business.id)
        .await
        .map_err(|err| ApiError::not_found_on_missing_reference(err, "Customer or business not found"))?;
    let response = ApiResponse::success(PublicBusiness::from(&business));
    Ok(if created {
        HttpResponse::Created().json(response)
    } else {
        HttpResponse::Ok().json(response)
    })
}

#[delete("/customers/favorites/{business_id}")]
pub async fn remove_favorite(
    db: web::Data<Database>,
    caller: AuthenticatedCustomer,
    business_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let business_id = business_id.into_inner();
    db.remove_favorite(caller.customer_id, business_id)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Favorite not found".into()),
            other => ApiError::Database(other),
        })?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "removed": business_id }))))
}
