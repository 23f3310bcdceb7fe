use uuid::Uuid;

use super::Database;
use crate::models::{
    Badge, BadgeRequest, BadgeRequestDetail, BadgeRequestStatus, GrantedBadge, ReviewDecision,
};

const BADGE_COLUMNS: &str =
    "id, code, name, description, icon_url, is_requestable, created_at, updated_at";

const BADGE_REQUEST_COLUMNS: &str = r#"
    id,
    business_id,
    badge_id,
    status,
    message,
    admin_notes,
    reviewed_by,
    reviewed_at,
    created_at
"#;

const BADGE_REQUEST_DETAIL_SELECT: &str = r#"
    SELECT
        br.id,
        br.business_id,
        b.business_name,
        b.slug AS business_slug,
        br.badge_id,
        bg.code AS badge_code,
        bg.name AS badge_name,
        br.status,
        br.message,
        br.admin_notes,
        br.reviewed_by,
        br.reviewed_at,
        br.created_at
    FROM badge_requests br
    INNER JOIN businesses b ON b.id = br.business_id
    INNER JOIN badges bg ON bg.id = br.badge_id
"#;

/// Result of reviewing a badge request
#[derive(Debug)]
pub enum BadgeReviewOutcome {
    Reviewed(BadgeRequest),
    NotFound,
    AlreadyReviewed(BadgeRequestStatus),
}

impl Database {
    // ========================================================================
    // CATALOG
    // ========================================================================

    pub async fn list_badges(&self) -> Result<Vec<Badge>, sqlx::Error> {
        let sql = format!("SELECT {BADGE_COLUMNS} FROM badges ORDER BY name ASC");
        sqlx::query_as::<_, Badge>(&sql).fetch_all(&self.pool).await
    }

    pub async fn get_badge(&self, badge_id: Uuid) -> Result<Option<Badge>, sqlx::Error> {
        let sql = format!("SELECT {BADGE_COLUMNS} FROM badges WHERE id = $1");
        sqlx::query_as::<_, Badge>(&sql)
            .bind(badge_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create_badge(
        &self,
        code: &str,
        name: &str,
        description: Option<String>,
        icon_url: Option<String>,
        is_requestable: bool,
    ) -> Result<Badge, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO badges (id, code, name, description, icon_url, is_requestable)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BADGE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Badge>(&sql)
            .bind(Uuid::new_v4())
            .bind(code.trim().to_ascii_lowercase())
            .bind(name.trim())
            .bind(description)
            .bind(icon_url)
            .bind(is_requestable)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn update_badge(&self, badge: &Badge) -> Result<Badge, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE badges
            SET name = $2, description = $3, icon_url = $4, is_requestable = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {BADGE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Badge>(&sql)
            .bind(badge.id)
            .bind(&badge.name)
            .bind(&badge.description)
            .bind(&badge.icon_url)
            .bind(badge.is_requestable)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn delete_badge(&self, badge_id: Uuid) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM badges WHERE id = $1")
            .bind(badge_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }

    // ========================================================================
    // GRANTS
    // ========================================================================

    pub async fn list_business_badges(&self, business_id: Uuid) -> Result<Vec<GrantedBadge>, sqlx::Error> {
        sqlx::query_as::<_, GrantedBadge>(
            r#"
            SELECT
                bg.id AS badge_id,
                bg.code,
                bg.name,
                bg.description,
                bg.icon_url,
                bb.granted_at
            FROM business_badges bb
            INNER JOIN badges bg ON bg.id = bb.badge_id
            WHERE bb.business_id = $1
            ORDER BY bb.granted_at ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn business_has_badge(&self, business_id: Uuid, badge_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM business_badges WHERE business_id = $1 AND badge_id = $2)",
        )
        .bind(business_id)
        .bind(badge_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Idempotent; returns whether a new grant was written.
    pub async fn grant_badge(
        &self,
        business_id: Uuid,
        badge_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO business_badges (id, business_id, badge_id, granted_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (business_id, badge_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(business_id)
        .bind(badge_id)
        .bind(granted_by)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn revoke_badge(&self, business_id: Uuid, badge_id: Uuid) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM business_badges WHERE business_id = $1 AND badge_id = $2")
            .bind(business_id)
            .bind(badge_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }

    // ========================================================================
    // REQUEST / REVIEW WORKFLOW
    // ========================================================================

    pub async fn create_badge_request(
        &self,
        business_id: Uuid,
        badge_id: Uuid,
        message: Option<String>,
    ) -> Result<BadgeRequest, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO badge_requests (id, business_id, badge_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING {BADGE_REQUEST_COLUMNS}
            "#
        );

        sqlx::query_as::<_, BadgeRequest>(&sql)
            .bind(Uuid::new_v4())
            .bind(business_id)
            .bind(badge_id)
            .bind(message)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_badge_requests(
        &self,
        status: Option<BadgeRequestStatus>,
    ) -> Result<Vec<BadgeRequestDetail>, sqlx::Error> {
        let sql = format!(
            "{BADGE_REQUEST_DETAIL_SELECT} WHERE ($1::badge_request_status IS NULL OR br.status = $1) \
             ORDER BY br.created_at ASC"
        );
        sqlx::query_as::<_, BadgeRequestDetail>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn list_badge_requests_for_business(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<BadgeRequestDetail>, sqlx::Error> {
        let sql = format!("{BADGE_REQUEST_DETAIL_SELECT} WHERE br.business_id = $1 ORDER BY br.created_at DESC");
        sqlx::query_as::<_, BadgeRequestDetail>(&sql)
            .bind(business_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Locks the request row, moves it out of `pending` and, on approval,
    /// grants the badge in the same transaction.
    pub async fn review_badge_request(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        decision: ReviewDecision,
        admin_notes: Option<String>,
    ) -> Result<BadgeReviewOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let existing = {
            let conn = tx.as_mut();
            let sql = format!("SELECT {BADGE_REQUEST_COLUMNS} FROM badge_requests WHERE id = $1 FOR UPDATE");
            sqlx::query_as::<_, BadgeRequest>(&sql)
                .bind(request_id)
                .fetch_optional(conn)
                .await?
        };

        let Some(existing) = existing else {
            return Ok(BadgeReviewOutcome::NotFound);
        };

        if existing.status != BadgeRequestStatus::Pending {
            return Ok(BadgeReviewOutcome::AlreadyReviewed(existing.status));
        }

        let updated = {
            let conn = tx.as_mut();
            let sql = format!(
                r#"
                UPDATE badge_requests
                SET status = $2, admin_notes = $3, reviewed_by = $4, reviewed_at = NOW()
                WHERE id = $1
                RETURNING {BADGE_REQUEST_COLUMNS}
                "#
            );
            sqlx::query_as::<_, BadgeRequest>(&sql)
                .bind(request_id)
                .bind(decision.resulting_status())
                .bind(admin_notes)
                .bind(reviewer_id)
                .fetch_one(conn)
                .await?
        };

        if decision == ReviewDecision::Approve {
            let conn = tx.as_mut();
            sqlx::query(
                r#"
                INSERT INTO business_badges (id, business_id, badge_id, granted_by)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (business_id, badge_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(updated.business_id)
            .bind(updated.badge_id)
            .bind(reviewer_id)
            .execute(conn)
            .await?;
        }

        tx.commit().await?;

        Ok(BadgeReviewOutcome::Reviewed(updated))
    }
}
