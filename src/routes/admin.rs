/**
 * Admin Configuration Routes
 * Read-only reference table for content editors: which fields and which
 * child-collection editors apply to each section type. Has no effect on
 * stored data or on the public API output.
 */
use axum::{extract::Path, Json};

use crate::admin_fields::{self, SectionFieldConfig};
use crate::db::models::SectionType;
use crate::error::{ApiError, ApiResult};

/// GET /api/admin/section-config - Full table, one entry per section type
pub async fn section_config_table() -> Json<Vec<SectionFieldConfig>> {
    Json(admin_fields::full_table())
}

/// GET /api/admin/section-config/:type - Config for one section type
pub async fn section_config(Path(tag): Path<String>) -> ApiResult<Json<SectionFieldConfig>> {
    let section_type =
        SectionType::parse(&tag).ok_or(ApiError::NotFound("section type"))?;
    Ok(Json(admin_fields::config_for(section_type)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_table_endpoint_lists_every_type() {
        let Json(table) = section_config_table().await;
        assert_eq!(table.len(), SectionType::ALL.len());
    }

    #[tokio::test]
    async fn test_unknown_type_is_not_found() {
        let result = section_config(Path("banner".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
