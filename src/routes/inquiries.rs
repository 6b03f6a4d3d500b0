/**
 * Inquiry Routes
 * CRUD API endpoints for contact-form submissions, keyed by numeric id.
 * Written once by the public form; responses include the human-readable
 * label for the inquiry type.
 */
use axum::{extract::Path, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::db::{
    self,
    models::{Inquiry, InquiryType},
};
use crate::error::{ApiError, ApiResult, FieldError};
use crate::routes::SuccessResponse;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct InquiryResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub r#type: String,
    pub type_label: &'static str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInquiryRequest {
    pub name: String,
    pub email: String,
    pub message: String,
    pub r#type: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInquiryRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub r#type: Option<String>,
}

fn inquiry_response(inquiry: Inquiry) -> InquiryResponse {
    let type_label = InquiryType::parse(&inquiry.r#type)
        .map(|t| t.label())
        .unwrap_or("Other");
    InquiryResponse {
        id: inquiry.id,
        name: inquiry.name,
        email: inquiry.email,
        message: inquiry.message,
        r#type: inquiry.r#type,
        type_label,
        created_at: inquiry.created_at,
    }
}

fn validate_create(payload: &CreateInquiryRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("name", "required"));
    }
    if !EMAIL_REGEX.is_match(&payload.email) {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
    if payload.message.trim().is_empty() {
        errors.push(FieldError::new("message", "required"));
    }
    if InquiryType::parse(&payload.r#type).is_none() {
        errors.push(FieldError::new(
            "type",
            "must be app_development, mvp, uiux or other",
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/inquiries - List inquiries, newest first (staff view)
pub async fn list_inquiries() -> ApiResult<Json<Vec<InquiryResponse>>> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let inquiries = sqlx::query_as::<_, Inquiry>(
        "SELECT * FROM inquiries ORDER BY created_at DESC, id ASC",
    )
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(inquiries.into_iter().map(inquiry_response).collect()))
}

/// GET /api/inquiries/:id - Get a single inquiry
pub async fn get_inquiry(Path(id): Path<i64>) -> ApiResult<Json<InquiryResponse>> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let inquiry = sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries WHERE id = $1")
        .bind(id)
        .fetch_optional(pool.as_ref())
        .await?
        .ok_or(ApiError::NotFound("inquiry"))?;

    Ok(Json(inquiry_response(inquiry)))
}

/// POST /api/inquiries - Record a contact-form submission
pub async fn create_inquiry(
    Json(payload): Json<CreateInquiryRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_create(&payload)?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let inquiry = sqlx::query_as::<_, Inquiry>(
        r#"
        INSERT INTO inquiries (name, email, message, type)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.message)
    .bind(&payload.r#type)
    .fetch_one(pool.as_ref())
    .await?;

    tracing::info!(id = inquiry.id, r#type = %inquiry.r#type, "inquiry received");
    Ok((StatusCode::CREATED, Json(inquiry_response(inquiry))))
}

/// PUT/PATCH /api/inquiries/:id - Update an inquiry
pub async fn update_inquiry(
    Path(id): Path<i64>,
    Json(payload): Json<UpdateInquiryRequest>,
) -> ApiResult<Json<InquiryResponse>> {
    let mut errors = Vec::new();
    if let Some(email) = &payload.email {
        if !EMAIL_REGEX.is_match(email) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
    }
    if let Some(tag) = &payload.r#type {
        if InquiryType::parse(tag).is_none() {
            errors.push(FieldError::new(
                "type",
                "must be app_development, mvp, uiux or other",
            ));
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let existing = sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries WHERE id = $1")
        .bind(id)
        .fetch_optional(pool.as_ref())
        .await?
        .ok_or(ApiError::NotFound("inquiry"))?;

    let inquiry = sqlx::query_as::<_, Inquiry>(
        r#"
        UPDATE inquiries
        SET name = $1, email = $2, message = $3, type = $4
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.email.unwrap_or(existing.email))
    .bind(payload.message.unwrap_or(existing.message))
    .bind(payload.r#type.unwrap_or(existing.r#type))
    .bind(id)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(Json(inquiry_response(inquiry)))
}

/// DELETE /api/inquiries/:id - Delete an inquiry
pub async fn delete_inquiry(Path(id): Path<i64>) -> ApiResult<Json<SuccessResponse>> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let result = sqlx::query("DELETE FROM inquiries WHERE id = $1")
        .bind(id)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("inquiry"));
    }

    tracing::info!(id = id, "inquiry deleted");
    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_mvp_inquiry_carries_display_label() {
        let inquiry = Inquiry {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Need an MVP".to_string(),
            r#type: "mvp".to_string(),
            created_at: Utc::now(),
        };
        let response = inquiry_response(inquiry);
        assert_eq!(response.r#type, "mvp");
        assert_eq!(response.type_label, "MVP");
    }

    #[test]
    fn test_create_validation_rejects_bad_email_and_type() {
        let payload = CreateInquiryRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            message: "hello".to_string(),
            r#type: "billing".to_string(),
        };
        match validate_create(&payload) {
            Err(ApiError::Validation(fields)) => {
                assert!(fields.iter().any(|f| f.field == "email"));
                assert!(fields.iter().any(|f| f.field == "type"));
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_create_validation_accepts_all_known_types() {
        for tag in ["app_development", "mvp", "uiux", "other"] {
            let payload = CreateInquiryRequest {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                message: "hello".to_string(),
                r#type: tag.to_string(),
            };
            assert!(validate_create(&payload).is_ok(), "rejected {}", tag);
        }
    }
}
