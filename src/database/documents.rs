use uuid::Uuid;

use super::Database;
use crate::models::{BusinessDocument, DocumentStatus, NewBusinessDocument};

const DOCUMENT_COLUMNS: &str = r#"
    id,
    business_id,
    doc_type,
    original_name,
    file_path,
    content_type,
    size_bytes,
    status,
    admin_notes,
    reviewed_by,
    reviewed_at,
    uploaded_at
"#;

impl Database {
    pub async fn create_document(&self, document: NewBusinessDocument) -> Result<BusinessDocument, sqlx::Error> {
        let NewBusinessDocument {
            id,
            business_id,
            doc_type,
            original_name,
            file_path,
            content_type,
            size_bytes,
        } = document;

        let sql = format!(
            r#"
            INSERT INTO business_documents (
                id, business_id, doc_type, original_name, file_path, content_type, size_bytes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, BusinessDocument>(&sql)
            .bind(id)
            .bind(business_id)
            .bind(doc_type)
            .bind(original_name)
            .bind(file_path)
            .bind(content_type)
            .bind(size_bytes)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_documents(
        &self,
        business_id: Option<Uuid>,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<BusinessDocument>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM business_documents
            WHERE ($1::uuid IS NULL OR business_id = $1)
              AND ($2::document_status IS NULL OR status = $2)
            ORDER BY uploaded_at DESC
            "#
        );

        sqlx::query_as::<_, BusinessDocument>(&sql)
            .bind(business_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn review_document(
        &self,
        document_id: Uuid,
        reviewer_id: Uuid,
        status: DocumentStatus,
        admin_notes: Option<String>,
    ) -> Result<Option<BusinessDocument>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE business_documents
            SET status = $2, admin_notes = $3, reviewed_by = $4, reviewed_at = NOW()
            WHERE id = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, BusinessDocument>(&sql)
            .bind(document_id)
            .bind(status)
            .bind(admin_notes)
            .bind(reviewer_id)
            .fetch_optional(&self.pool)
            .await
    }
}
