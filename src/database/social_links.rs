use std::collections::HashSet;

use uuid::Uuid;

use super::Database;
use crate::models::{NewSocialLink, SocialLink};

const SOCIAL_LINK_COLUMNS: &str = r#"
    id,
    business_id,
    platform,
    url,
    display_order,
    is_active,
    created_at,
    updated_at
"#;

impl Database {
    pub async fn list_social_links(
        &self,
        business_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<SocialLink>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {SOCIAL_LINK_COLUMNS}
            FROM social_links
            WHERE business_id = $1 AND (is_active OR NOT $2)
            ORDER BY display_order ASC, created_at ASC
            "#
        );

        sqlx::query_as::<_, SocialLink>(&sql)
            .bind(business_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_social_link(&self, link_id: Uuid) -> Result<Option<SocialLink>, sqlx::Error> {
        let sql = format!("SELECT {SOCIAL_LINK_COLUMNS} FROM social_links WHERE id = $1");
        sqlx::query_as::<_, SocialLink>(&sql)
            .bind(link_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Inserts a link; without an explicit order it goes after the last one.
    pub async fn create_social_link(&self, link: NewSocialLink) -> Result<SocialLink, sqlx::Error> {
        let NewSocialLink {
            id,
            business_id,
            platform,
            url,
            display_order,
            is_active,
        } = link;

        let sql = format!(
            r#"
            INSERT INTO social_links (id, business_id, platform, url, display_order, is_active)
            VALUES (
                $1, $2, $3, $4,
                COALESCE($5, (
                    SELECT COALESCE(MAX(display_order) + 1, 0)
                    FROM social_links
                    WHERE business_id = $2
                )),
                $6
            )
            RETURNING {SOCIAL_LINK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, SocialLink>(&sql)
            .bind(id)
            .bind(business_id)
            .bind(platform)
            .bind(url)
            .bind(display_order)
            .bind(is_active)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn update_social_link(&self, link: &SocialLink) -> Result<SocialLink, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE social_links
            SET
                platform = $3,
                url = $4,
                display_order = $5,
                is_active = $6,
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {SOCIAL_LINK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, SocialLink>(&sql)
            .bind(link.id)
            .bind(link.business_id)
            .bind(&link.platform)
            .bind(&link.url)
            .bind(link.display_order)
            .bind(link.is_active)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn delete_social_link(&self, business_id: Uuid, link_id: Uuid) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM social_links WHERE id = $1 AND business_id = $2")
            .bind(link_id)
            .bind(business_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }

    /// Assigns `display_order` by position. Returns `false` without touching
    /// anything when an id is not owned by the business.
    pub async fn reorder_social_links(
        &self,
        business_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<bool, sqlx::Error> {
        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = ordered_ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let mut tx = self.pool.begin().await?;

        let owned: i64 = {
            let conn = tx.as_mut();
            sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM social_links
                WHERE business_id = $1 AND id = ANY($2)
                "#,
            )
            .bind(business_id)
            .bind(&ids)
            .fetch_one(conn)
            .await?
        };

        if owned != ids.len() as i64 {
            return Ok(false);
        }

        for (position, id) in ids.iter().enumerate() {
            let conn = tx.as_mut();
            sqlx::query(
                r#"
                UPDATE social_links
                SET display_order = $3, updated_at = NOW()
                WHERE id = $1 AND business_id = $2
                "#,
            )
            .bind(id)
            .bind(business_id)
            .bind(position as i32)
            .execute(conn)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}
