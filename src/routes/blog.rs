/**
 * Blog Routes
 * CRUD API endpoints for blog posts, keyed by slug. Slugs are derived from
 * the title at creation when absent and never recomputed afterwards, so
 * existing URLs survive title edits.
 */
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{self, models::BlogPost};
use crate::error::{ApiError, ApiResult, FieldError};
use crate::media::{request_base_url, MediaRef};
use crate::routes::{double_option, is_valid_slug, SuccessResponse};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Full blog post response
#[derive(Debug, Serialize)]
pub struct BlogPostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub tags: String,
    pub estimated_read_time: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for POST /api/blogposts (create)
#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    /// Optional: derived from the title when absent.
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub estimated_read_time: String,
}

/// Request body for PUT/PATCH /api/blogposts/:slug (update). The slug is
/// deliberately not updatable. `cover_image` distinguishes an explicit
/// `null` (clear the stored value) from an absent field (keep it).
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,
    pub tags: Option<String>,
    pub estimated_read_time: Option<String>,
}

/// The update statement never mentions `slug` in its SET list; the stored
/// slug outlives any number of title edits.
const UPDATE_POST_SQL: &str = r#"
    UPDATE blog_posts
    SET title = $1, excerpt = $2, content = $3, cover_image = $4,
        tags = $5, estimated_read_time = $6
    WHERE slug = $7
    RETURNING *
"#;

// ============================================================================
// Slug derivation
// ============================================================================

/// Fold common accented Latin letters to their ASCII base letter. Input is
/// already lowercased; anything unhandled is dropped from the slug.
fn ascii_fold(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => 'i',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ś' | 'š' => 's',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => return None,
    };
    Some(folded)
}

/// Lowercase the title, fold accented letters to ASCII, collapse runs of
/// everything else to single hyphens, trim leading/trailing hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        let kept = if c.is_ascii_alphanumeric() {
            Some(c)
        } else {
            ascii_fold(c)
        };
        match kept {
            Some(c) => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c);
            }
            None => pending_hyphen = true,
        }
    }

    slug
}

/// Sanitize rich HTML content using ammonia
fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

fn blog_response(post: BlogPost, base_url: &str) -> BlogPostResponse {
    BlogPostResponse {
        id: post.id,
        cover_image: MediaRef::upload_only(&post.cover_image).resolve(base_url),
        title: post.title,
        slug: post.slug,
        excerpt: post.excerpt,
        content: post.content,
        tags: post.tags,
        estimated_read_time: post.estimated_read_time,
        created_at: post.created_at,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/blogposts - List blog posts, newest first
pub async fn list_posts(headers: HeaderMap) -> ApiResult<Json<Vec<BlogPostResponse>>> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let base_url = request_base_url(&headers);

    let posts = sqlx::query_as::<_, BlogPost>(
        "SELECT * FROM blog_posts ORDER BY created_at DESC, id ASC",
    )
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(
        posts
            .into_iter()
            .map(|p| blog_response(p, &base_url))
            .collect(),
    ))
}

/// GET /api/blogposts/:slug - Get single blog post by slug
pub async fn get_post(
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Json<BlogPostResponse>> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let base_url = request_base_url(&headers);

    let post = sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(pool.as_ref())
        .await?
        .ok_or(ApiError::NotFound("blog post"))?;

    Ok(Json(blog_response(post, &base_url)))
}

/// POST /api/blogposts - Create a blog post, deriving the slug from the
/// title when none is supplied
pub async fn create_post(
    headers: HeaderMap,
    Json(payload): Json<CreateBlogRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = Vec::new();
    if payload.title.trim().is_empty() {
        errors.push(FieldError::new("title", "required"));
    }
    if payload.content.trim().is_empty() {
        errors.push(FieldError::new("content", "required"));
    }

    let slug = match &payload.slug {
        Some(slug) if !slug.trim().is_empty() => {
            if !is_valid_slug(slug) {
                errors.push(FieldError::new(
                    "slug",
                    "must contain only lowercase letters, numbers, and hyphens",
                ));
            }
            slug.clone()
        }
        _ => {
            let derived = slugify(&payload.title);
            if derived.is_empty() {
                errors.push(FieldError::new("title", "cannot derive a slug from title"));
            }
            derived
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let base_url = request_base_url(&headers);
    let content = sanitize_html(&payload.content);

    let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM blog_posts WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(pool.as_ref())
        .await?;
    if taken.is_some() {
        return Err(ApiError::invalid("slug", "already exists"));
    }

    let post = sqlx::query_as::<_, BlogPost>(
        r#"
        INSERT INTO blog_posts
            (title, slug, excerpt, content, cover_image, tags, estimated_read_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&payload.title)
    .bind(&slug)
    .bind(&payload.excerpt)
    .bind(&content)
    .bind(&payload.cover_image)
    .bind(&payload.tags)
    .bind(&payload.estimated_read_time)
    .fetch_one(pool.as_ref())
    .await?;

    tracing::info!(slug = %post.slug, "blog post created");
    Ok((StatusCode::CREATED, Json(blog_response(post, &base_url))))
}

/// PUT/PATCH /api/blogposts/:slug - Update a blog post. The stored slug is
/// never recomputed, even when the title changes.
pub async fn update_post(
    headers: HeaderMap,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateBlogRequest>,
) -> ApiResult<Json<BlogPostResponse>> {
    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return Err(ApiError::invalid("title", "must not be empty"));
        }
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let base_url = request_base_url(&headers);

    let existing = sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(pool.as_ref())
        .await?
        .ok_or(ApiError::NotFound("blog post"))?;

    let content = payload
        .content
        .map(|c| sanitize_html(&c))
        .unwrap_or(existing.content);

    let post = sqlx::query_as::<_, BlogPost>(UPDATE_POST_SQL)
        .bind(payload.title.unwrap_or(existing.title))
        .bind(payload.excerpt.unwrap_or(existing.excerpt))
        .bind(&content)
        .bind(payload.cover_image.unwrap_or(existing.cover_image))
        .bind(payload.tags.unwrap_or(existing.tags))
        .bind(payload.estimated_read_time.unwrap_or(existing.estimated_read_time))
        .bind(&slug)
        .fetch_one(pool.as_ref())
        .await?;

    tracing::info!(slug = %post.slug, "blog post updated");
    Ok(Json(blog_response(post, &base_url)))
}

/// DELETE /api/blogposts/:slug - Delete a blog post
pub async fn delete_post(Path(slug): Path<String>) -> ApiResult<Json<SuccessResponse>> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let result = sqlx::query("DELETE FROM blog_posts WHERE slug = $1")
        .bind(&slug)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("blog post"));
    }

    tracing::info!(slug = %slug, "blog post deleted");
    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World!"), "hello-world");
    }

    #[test]
    fn test_slugify_collapses_symbol_runs() {
        assert_eq!(slugify("Rust -- and &&& Axum"), "rust-and-axum");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  ...Design Process...  "), "design-process");
    }

    #[test]
    fn test_slugify_keeps_numbers() {
        assert_eq!(slugify("Top 10 UI Trends 2024"), "top-10-ui-trends-2024");
    }

    #[test]
    fn test_slugify_of_symbols_only_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_output_is_a_valid_slug() {
        for title in ["Hello World!", "A/B testing, explained", "MVP -> v1"] {
            assert!(is_valid_slug(&slugify(title)), "bad slug for {:?}", title);
        }
    }

    #[test]
    fn test_slugify_folds_accents_to_ascii() {
        assert_eq!(slugify("Café Guide"), "cafe-guide");
        assert_eq!(slugify("Über Änderungen"), "uber-anderungen");
        assert_eq!(slugify("Señor Nuñez"), "senor-nunez");
    }

    #[test]
    fn test_update_statement_leaves_slug_untouched() {
        let set_clause = UPDATE_POST_SQL.split("WHERE").next().unwrap();
        assert!(
            !set_clause.contains("slug"),
            "slug must never appear in the update SET list"
        );
    }

    #[test]
    fn test_update_cover_image_null_clears_absent_keeps() {
        let stored = Some("media/old.png".to_string());

        let cleared: UpdateBlogRequest = serde_json::from_str(r#"{"cover_image": null}"#).unwrap();
        assert_eq!(cleared.cover_image.unwrap_or(stored.clone()), None);

        let untouched: UpdateBlogRequest = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        assert_eq!(untouched.cover_image.unwrap_or(stored.clone()), stored);
    }
}
