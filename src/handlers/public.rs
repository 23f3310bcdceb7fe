use actix_web::{get, web, HttpResponse};

use crate::database::{BusinessFilter, Database};
use crate::errors::ApiResult;
use crate::models::{
    ApiResponse, PageRequest, Paginated, PublicBusiness, PublicSearchQuery, VerificationStatus,
};

/// Directory search over active businesses only.
#[get("/public/businesses")]
pub async fn search_businesses(
    db: web::Data<Database>,
    query: web::Query<PublicSearchQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit);
    let filter = BusinessFilter {
        query: query.q,
        status: Some(VerificationStatus::Active),
        badge_code: query.badge,
        community_support_only: query.community_support.unwrap_or(false),
    };

    let (businesses, total) = db.search_businesses(&filter, page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(Paginated {
        businesses: businesses.iter().map(PublicBusiness::from).collect(),
        pagination: page.with_total(total),
    })))
}

#[cfg(test)]
mod tests {
    use crate::handlers::tests::offline_app;
    use actix_web::{http::StatusCode, test};

    #[actix_rt::test]
    async fn non_numeric_page_is_a_400() {
        let app = offline_app!();
        let req = test::TestRequest::get()
            .uri("/api/public/businesses?page=first")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
