use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use actix_web::{get, post, put, web, HttpResponse};
use futures_util::TryStreamExt;
use uuid::Uuid;

use super::{ensure_not_restricted, load_business, load_editable_business, validated};
use crate::auth::AuthenticatedBusiness;
use crate::database::Database;
use crate::errors::{ApiError, ApiResult};
use crate::models::{
    AccountStatus, ApiResponse, Business, BusinessAccount, CommunitySupport, NewBusinessDocument,
    PublicBusiness, PublicProfile, UpdateCommunitySupportRequest, UpdateProfileRequest,
};
use crate::verification::{business_visibility, ProfileVisibility};

pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;
const DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "png", "jpg", "jpeg"];
const DEFAULT_DOC_TYPE: &str = "verification";

/// Root directory for uploaded files, also served under `/api/uploads`
#[derive(Debug, Clone)]
pub struct UploadDir(pub PathBuf);

// ============================================================================
// PROFILE
// ============================================================================

#[get("/businesses/{slug}")]
pub async fn get_public_profile(
    db: web::Data<Database>,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let slug = slug.into_inner();
    let business = db
        .get_business_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Business not found".into()))?;

    let social_links = match business_visibility(&business, chrono::Utc::now()) {
        ProfileVisibility::Hidden => return Err(ApiError::NotFound("Business not found".into())),
        ProfileVisibility::Restricted => Vec::new(),
        ProfileVisibility::Full => db.list_social_links(business.id, true).await?,
    };
    let badges = db.list_business_badges(business.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(PublicProfile {
        business: PublicBusiness::from(&business),
        social_links,
        badges,
    })))
}

#[put("/businesses/{slug}")]
pub async fn update_profile_by_slug(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
    slug: web::Path<String>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let slug = slug.into_inner();
    let business = db
        .get_business_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Business not found".into()))?;

    if business.id != caller.business_id {
        return Err(ApiError::Forbidden("You can only edit your own business".into()));
    }
    ensure_not_restricted(&business)?;

    let body = validated(payload)?;
    save_profile(&db, business, body).await
}

#[put("/businesses/profile/update")]
pub async fn update_own_profile(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let business = load_editable_business(&db, caller.business_id).await?;
    save_profile(&db, business, body).await
}

async fn save_profile(
    db: &Database,
    mut business: Business,
    body: UpdateProfileRequest,
) -> ApiResult<HttpResponse> {
    body.apply_to_existing(&mut business);
    let updated = db.update_business_profile(&business).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(BusinessAccount::from(updated))))
}

// ============================================================================
// COMMUNITY SUPPORT
// ============================================================================

#[get("/businesses/community-support")]
pub async fn get_community_support(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
) -> ApiResult<HttpResponse> {
    let business = load_business(&db, caller.business_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(CommunitySupport::from(&business))))
}

#[put("/businesses/community-support")]
pub async fn update_community_support(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
    payload: web::Json<UpdateCommunitySupportRequest>,
) -> ApiResult<HttpResponse> {
    let body = validated(payload)?;
    let business = load_editable_business(&db, caller.business_id).await?;

    let text = body
        .text
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    let links = serde_json::to_value(&body.links)
        .map_err(|err| ApiError::Internal(format!("Failed to encode community links: {err}")))?;

    let updated = db.update_community_support(business.id, text, links).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(CommunitySupport::from(&updated))))
}

// ============================================================================
// ACCOUNT STATUS
// ============================================================================

#[get("/businesses/status")]
pub async fn get_status(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
) -> ApiResult<HttpResponse> {
    let business = load_business(&db, caller.business_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(AccountStatus::from(&business))))
}

// ============================================================================
// VERIFICATION DOCUMENTS
// ============================================================================

/// Lowercased extension when it is one of the accepted document types.
pub fn document_extension(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    DOCUMENT_EXTENSIONS
        .into_iter()
        .find(|allowed| *allowed == extension)
}

struct UploadedFile {
    original_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

async fn read_document_form(mut payload: Multipart) -> ApiResult<(Option<UploadedFile>, Option<String>)> {
    let bad_form = |err: actix_multipart::MultipartError| ApiError::BadRequest(format!("Invalid upload: {err}"));

    let mut file = None;
    let mut doc_type = None;

    while let Some(mut field) = payload.try_next().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let original_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string)
                    .unwrap_or_default();
                let content_type = field.content_type().map(|mime| mime.to_string());

                let mut bytes = Vec::new();
                while let Some(chunk) = field.try_next().await.map_err(bad_form)? {
                    if bytes.len() + chunk.len() > MAX_DOCUMENT_BYTES {
                        return Err(ApiError::BadRequest("File exceeds the 10 MiB limit".into()));
                    }
                    bytes.extend_from_slice(&chunk);
                }

                file = Some(UploadedFile {
                    original_name,
                    content_type,
                    bytes,
                });
            }
            "doc_type" => {
                let mut raw = Vec::new();
                while let Some(chunk) = field.try_next().await.map_err(bad_form)? {
                    raw.extend_from_slice(&chunk);
                    if raw.len() > 256 {
                        return Err(ApiError::BadRequest("doc_type is too long".into()));
                    }
                }
                let value = String::from_utf8_lossy(&raw).trim().to_ascii_lowercase();
                if !value.is_empty() {
                    doc_type = Some(value);
                }
            }
            // Unknown fields are drained and ignored.
            _ => {
                while field.try_next().await.map_err(bad_form)?.is_some() {}
            }
        }
    }

    Ok((file, doc_type))
}

#[post("/businesses/documents")]
pub async fn upload_document(
    db: web::Data<Database>,
    upload_dir: web::Data<UploadDir>,
    caller: AuthenticatedBusiness,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let business = load_editable_business(&db, caller.business_id).await?;

    let (file, doc_type) = read_document_form(payload).await?;
    let file = file.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".into()))?;
    if file.bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".into()));
    }
    let extension = document_extension(&file.original_name)
        .ok_or_else(|| ApiError::BadRequest("Only pdf, png, jpg and jpeg files are accepted".into()))?;

    let doc_type = doc_type.unwrap_or_else(|| DEFAULT_DOC_TYPE.to_string());
    if doc_type.len() > 60 {
        return Err(ApiError::BadRequest("doc_type must be at most 60 characters".into()));
    }

    let id = Uuid::new_v4();
    let relative_path = format!("documents/{id}.{extension}");
    let documents_dir = upload_dir.0.join("documents");
    tokio::fs::create_dir_all(&documents_dir)
        .await
        .map_err(|err| ApiError::Internal(format!("Failed to create upload directory: {err}")))?;
    let stored_path = upload_dir.0.join(&relative_path);
    tokio::fs::write(&stored_path, &file.bytes)
        .await
        .map_err(|err| ApiError::Internal(format!("Failed to store document: {err}")))?;

    let inserted = db
        .create_document(NewBusinessDocument {
            id,
            business_id: business.id,
            doc_type,
            original_name: file.original_name,
            file_path: relative_path,
            content_type: file.content_type,
            size_bytes: file.bytes.len() as i64,
        })
        .await;
    let document = match inserted {
        Ok(document) => document,
        Err(err) => {
            discard_stored_file(&stored_path).await;
            return Err(err.into());
        }
    };

    log::info!("Business {} uploaded document {}", business.id, document.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(document)))
}

/// Removes a file whose database row was never written.
async fn discard_stored_file(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        log::error!("Failed to remove orphaned upload {}: {err}", path.display());
    }
}

#[get("/businesses/documents")]
pub async fn list_documents(
    db: web::Data<Database>,
    caller: AuthenticatedBusiness,
) -> ApiResult<HttpResponse> {
    let documents = db.list_documents(Some(caller.business_id), None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(documents)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Subject;
    use crate::handlers::tests::{bearer, offline_app};
    use actix_web::{http::StatusCode, test as actix_test};

    #[test]
    fn accepts_only_document_extensions() {
        assert_eq!(document_extension("licence.PDF"), Some("pdf"));
        assert_eq!(document_extension("shopfront.jpeg"), Some("jpeg"));
        assert_eq!(document_extension("scan.png"), Some("png"));
        assert_eq!(document_extension("payload.exe"), None);
        assert_eq!(document_extension("no_extension"), None);
        assert_eq!(document_extension(""), None);
    }

    #[actix_rt::test]
    async fn discarding_removes_the_orphaned_file() {
        let path = std::env::temp_dir().join(format!("orphan-{}.pdf", Uuid::new_v4()));
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        discard_stored_file(&path).await;
        assert!(!path.exists());

        // A second attempt only logs.
        discard_stored_file(&path).await;
    }

    #[actix_rt::test]
    async fn reserved_paths_are_not_treated_as_slugs() {
        let app = offline_app!();
        for uri in ["/api/businesses/status", "/api/businesses/community-support", "/api/businesses/documents"] {
            let req = actix_test::TestRequest::get().uri(uri).to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[actix_rt::test]
    async fn profile_update_validates_before_loading() {
        let app = offline_app!();
        let req = actix_test::TestRequest::put()
            .uri("/api/businesses/profile/update")
            .insert_header(("Authorization", bearer(Subject::Business(Uuid::new_v4()))))
            .set_json(serde_json::json!({ "website": "not a url" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
