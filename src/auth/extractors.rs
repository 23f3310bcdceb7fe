use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use super::{AuthError, Claims, TokenService};
use crate::errors::ApiError;

/// Caller holding a token with a `businessId` claim
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedBusiness {
    pub business_id: Uuid,
}

/// Caller holding a token with an `adminId` claim
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedAdmin {
    pub admin_id: Uuid,
}

/// Caller holding a token with a `customerId` claim
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedCustomer {
    pub customer_id: Uuid,
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::MissingToken)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

fn claims_from_request(req: &HttpRequest) -> Result<Claims, ApiError> {
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| ApiError::Internal("TokenService is not registered".into()))?;
    let token = bearer_token(req)?;
    Ok(tokens.verify(token)?)
}

impl FromRequest for AuthenticatedBusiness {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(claims_from_request(req).and_then(|claims| {
            claims
                .business_id
                .map(|business_id| Self { business_id })
                .ok_or_else(|| AuthError::WrongActor.into())
        }))
    }
}

impl FromRequest for AuthenticatedAdmin {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(claims_from_request(req).and_then(|claims| {
            claims
                .admin_id
                .map(|admin_id| Self { admin_id })
                .ok_or_else(|| AuthError::WrongActor.into())
        }))
    }
}

impl FromRequest for AuthenticatedCustomer {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(claims_from_request(req).and_then(|claims| {
            claims
                .customer_id
                .map(|customer_id| Self { customer_id })
                .ok_or_else(|| AuthError::WrongActor.into())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Subject;
    use actix_web::{http::StatusCode, test, App, HttpResponse};

    fn tokens() -> TokenService {
        TokenService::new("extractor-test-secret".into(), 1)
    }

    async fn whoami(business: AuthenticatedBusiness) -> HttpResponse {
        HttpResponse::Ok().body(business.business_id.to_string())
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(tokens()))
                    .route("/whoami", web::get().to(whoami)),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn business_token_is_accepted() {
        let app = app!();
        let id = Uuid::new_v4();
        let token = tokens().issue(Subject::Business(id)).unwrap();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, id.to_string().as_bytes());
    }

    #[actix_rt::test]
    async fn missing_header_is_unauthorized() {
        let app = app!();
        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn garbage_token_is_forbidden() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn customer_token_cannot_act_as_business() {
        let app = app!();
        let token = tokens().issue(Subject::Customer(Uuid::new_v4())).unwrap();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
