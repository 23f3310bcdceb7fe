use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{Database, BUSINESS_COLUMNS, RESOLVED_STATUS_SQL};
use crate::models::{Business, NewBusiness, PageRequest, VerificationStatus};
use crate::verification::StatusChange;

/// Filters shared by the public directory and the admin review list
#[derive(Debug, Clone, Default)]
pub struct BusinessFilter {
    pub query: Option<String>,
    pub status: Option<VerificationStatus>,
    pub badge_code: Option<String>,
    pub community_support_only: bool,
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &BusinessFilter) {
    builder.push(" WHERE TRUE");

    if let Some(status) = filter.status {
        builder
            .push(" AND ")
            .push(RESOLVED_STATUS_SQL)
            .push(" = ")
            .push_bind(status.as_str());
    }

    if let Some(query) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(query));
        builder
            .push(" AND (business_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR slug ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR category ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(code) = filter.badge_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM business_badges bb \
                 INNER JOIN badges bg ON bg.id = bb.badge_id \
                 WHERE bb.business_id = businesses.id AND bg.code = ",
            )
            .push_bind(code.to_string())
            .push(")");
    }

    if filter.community_support_only {
        builder.push(
            " AND (COALESCE(BTRIM(community_support_text), '') <> '' \
             OR jsonb_array_length(community_support_links) > 0)",
        );
    }
}

impl Database {
    pub async fn create_business(&self, business: NewBusiness) -> Result<Business, sqlx::Error> {
        let NewBusiness {
            id,
            slug,
            business_name,
            email,
            password_hash,
            category,
        } = business;

        let sql = format!(
            r#"
            INSERT INTO businesses (id, slug, business_name, email, password_hash, category, verification_status)
            VALUES ($1, $2, $3, $4, $5, $6, 'active')
            RETURNING {BUSINESS_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Business>(&sql)
            .bind(id)
            .bind(slug)
            .bind(business_name)
            .bind(email)
            .bind(password_hash)
            .bind(category)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_business(&self, business_id: Uuid) -> Result<Option<Business>, sqlx::Error> {
        let sql = format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = $1");
        sqlx::query_as::<_, Business>(&sql)
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_business_by_slug(&self, slug: &str) -> Result<Option<Business>, sqlx::Error> {
        let sql = format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE slug = LOWER($1)");
        sqlx::query_as::<_, Business>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_business_by_email(&self, email: &str) -> Result<Option<Business>, sqlx::Error> {
        let sql = format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, Business>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn update_business_profile(&self, business: &Business) -> Result<Business, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE businesses
            SET
                business_name = $2,
                description = $3,
                category = $4,
                website = $5,
                phone = $6,
                logo_url = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BUSINESS_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Business>(&sql)
            .bind(business.id)
            .bind(&business.business_name)
            .bind(&business.description)
            .bind(&business.category)
            .bind(&business.website)
            .bind(&business.phone)
            .bind(&business.logo_url)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn update_community_support(
        &self,
        business_id: Uuid,
        text: Option<String>,
        links: Value,
    ) -> Result<Business, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE businesses
            SET
                community_support_text = $2,
                community_support_links = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BUSINESS_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Business>(&sql)
            .bind(business_id)
            .bind(text)
            .bind(links)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn apply_status_change(
        &self,
        business_id: Uuid,
        change: &StatusChange,
    ) -> Result<Business, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE businesses
            SET
                verification_status = $2,
                suspended_at = $3,
                disabled_at = $4,
                policy_code = $5,
                policy_violation_text = $6,
                nudge_message = $7,
                last_nudge_at = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BUSINESS_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Business>(&sql)
            .bind(business_id)
            .bind(change.verification_status)
            .bind(change.suspended_at)
            .bind(change.disabled_at)
            .bind(&change.policy_code)
            .bind(&change.policy_violation_text)
            .bind(&change.nudge_message)
            .bind(change.last_nudge_at)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn set_business_approval(
        &self,
        business_id: Uuid,
        is_approved: bool,
    ) -> Result<Option<Business>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE businesses
            SET is_approved = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {BUSINESS_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Business>(&sql)
            .bind(business_id)
            .bind(is_approved)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete_business(&self, business_id: Uuid) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(business_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }

    /// Returns one page of matches and the total match count.
    pub async fn search_businesses(
        &self,
        filter: &BusinessFilter,
        page: PageRequest,
    ) -> Result<(Vec<Business>, i64), sqlx::Error> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM businesses");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {BUSINESS_COLUMNS} FROM businesses"));
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY business_name ASC, id ASC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let businesses = select
            .build_query_as::<Business>()
            .fetch_all(&self.pool)
            .await?;

        Ok((businesses, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(filter: &BusinessFilter) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM businesses");
        push_filters(&mut builder, filter);
        builder.sql().to_string()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(
            rendered(&BusinessFilter::default()),
            "SELECT COUNT(*) FROM businesses WHERE TRUE"
        );
    }

    #[test]
    fn status_filter_uses_resolved_status() {
        let sql = rendered(&BusinessFilter {
            status: Some(VerificationStatus::Active),
            ..Default::default()
        });
        assert!(sql.contains("verification_status::text"));
        assert!(sql.contains("= $1"));
    }

    #[test]
    fn every_filter_binds_its_own_parameter() {
        let sql = rendered(&BusinessFilter {
            query: Some("bakery".into()),
            status: Some(VerificationStatus::Active),
            badge_code: Some("verified".into()),
            community_support_only: true,
        });
        assert!(sql.contains("description ILIKE $5"));
        assert!(sql.contains("bg.code = $6"));
        assert!(sql.contains("jsonb_array_length"));
    }

    #[test]
    fn blank_query_is_ignored() {
        let sql = rendered(&BusinessFilter {
            query: Some("   ".into()),
            ..Default::default()
        });
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
