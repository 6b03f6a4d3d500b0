/**
 * Project Routes
 * CRUD API endpoints for portfolio projects, keyed by slug. A project is
 * serialized with its gallery images and its ordered sections; every
 * section carries all six child collections regardless of its type.
 */
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::{
    self,
    models::{
        Project, ProjectImage, ProjectSection, SectionFaq, SectionFeature, SectionMediaTab,
        SectionMetric, SectionSpec, SectionTile, SectionType,
    },
};
use crate::error::{ApiError, ApiResult, FieldError};
use crate::media::{request_base_url, MediaRef, HERO_PLACEHOLDER, LOGO_PLACEHOLDER};
use crate::routes::{double_option, is_valid_slug, is_valid_url, SuccessResponse};

const THEMES: &[&str] = &["light", "dark", "accent"];
const FEATURE_STYLES: &[&str] = &["portrait", "square"];

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    /// Resolved: upload wins, else external URL, else the fixed placeholder.
    pub hero_image: String,
    pub logo: String,
    pub industry: String,
    pub video: Option<String>,
    pub client: String,
    pub date: String,
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub images: Vec<ProjectImageResponse>,
    pub sections: Vec<SectionResponse>,
}

#[derive(Debug, Serialize)]
pub struct ProjectImageResponse {
    pub id: i64,
    pub image: String,
    pub is_gif: bool,
}

#[derive(Debug, Serialize)]
pub struct SectionResponse {
    pub id: i64,
    pub order: i32,
    pub r#type: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub theme: String,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub extra: Option<serde_json::Value>,
    pub metrics: Vec<MetricResponse>,
    pub features: Vec<FeatureResponse>,
    pub media_tabs: Vec<MediaTabResponse>,
    pub tiles: Vec<TileResponse>,
    pub specs: Vec<SpecResponse>,
    pub faqs: Vec<FaqResponse>,
}

#[derive(Debug, Serialize)]
pub struct MetricResponse {
    pub id: i64,
    pub order: i32,
    pub value: String,
    pub label: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeatureResponse {
    pub id: i64,
    pub order: i32,
    pub title: String,
    pub description: String,
    pub icon_text: Option<String>,
    pub icon_image: Option<String>,
    pub style: String,
    pub background_image: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub modal_title: Option<String>,
    pub modal_description: Option<String>,
    pub modal_image: Option<String>,
    pub modal_video_url: Option<String>,
    pub modal_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TileResponse {
    pub id: i64,
    pub order: i32,
    pub icon_text: Option<String>,
    pub icon_image: Option<String>,
    pub title: String,
    pub body: String,
    pub action_text: Option<String>,
    pub action_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpecResponse {
    pub id: i64,
    pub order: i32,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct FaqResponse {
    pub id: i64,
    pub order: i32,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct MediaTabResponse {
    pub id: i64,
    pub order: i32,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub video_url: Option<String>,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: String,
    pub hero_image: Option<String>,
    pub hero_image_url: Option<String>,
    pub logo: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub industry: String,
    pub video: Option<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub date: String,
    pub website_url: Option<String>,
    pub images: Option<Vec<ImageInput>>,
    pub sections: Option<Vec<SectionInput>>,
}

/// Nullable media/URL fields use the double-Option pattern: an absent
/// field keeps the stored value, an explicit `null` clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub short_description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub hero_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub hero_image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub video: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub video_url: Option<Option<String>>,
    pub client: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub website_url: Option<Option<String>>,
    /// When present, replaces the gallery wholesale.
    pub images: Option<Vec<ImageInput>>,
    /// When present, replaces all sections (and their children) wholesale.
    pub sections: Option<Vec<SectionInput>>,
}

#[derive(Debug, Deserialize)]
pub struct ImageInput {
    pub image: String,
    #[serde(default)]
    pub is_gif: bool,
}

#[derive(Debug, Deserialize)]
pub struct SectionInput {
    #[serde(default)]
    pub order: i32,
    pub r#type: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub video: Option<String>,
    pub video_url: Option<String>,
    pub extra: Option<serde_json::Value>,
    #[serde(default)]
    pub metrics: Vec<MetricInput>,
    #[serde(default)]
    pub features: Vec<FeatureInput>,
    #[serde(default)]
    pub tiles: Vec<TileInput>,
    #[serde(default)]
    pub specs: Vec<SpecInput>,
    #[serde(default)]
    pub faqs: Vec<FaqInput>,
    #[serde(default)]
    pub media_tabs: Vec<MediaTabInput>,
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_feature_style() -> String {
    "portrait".to_string()
}

#[derive(Debug, Deserialize)]
pub struct MetricInput {
    #[serde(default)]
    pub order: i32,
    pub value: String,
    pub label: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeatureInput {
    #[serde(default)]
    pub order: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub icon_text: Option<String>,
    pub icon_image: Option<String>,
    #[serde(default = "default_feature_style")]
    pub style: String,
    pub background_image: Option<String>,
    pub background_image_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub modal_title: Option<String>,
    pub modal_description: Option<String>,
    pub modal_image: Option<String>,
    pub modal_video_url: Option<String>,
    pub modal_content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TileInput {
    #[serde(default)]
    pub order: i32,
    pub icon_text: Option<String>,
    pub icon_image: Option<String>,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub action_text: Option<String>,
    pub action_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpecInput {
    #[serde(default)]
    pub order: i32,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct FaqInput {
    #[serde(default)]
    pub order: i32,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct MediaTabInput {
    #[serde(default)]
    pub order: i32,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

// ============================================================================
// Validation
// ============================================================================

fn check_url(field: &str, value: &Option<String>, errors: &mut Vec<FieldError>) {
    if let Some(url) = value {
        if !url.is_empty() && !is_valid_url(url) {
            errors.push(FieldError::new(field, "must be an http(s) URL"));
        }
    }
}

fn check_patch_url(field: &str, value: &Option<Option<String>>, errors: &mut Vec<FieldError>) {
    if let Some(Some(url)) = value {
        if !url.is_empty() && !is_valid_url(url) {
            errors.push(FieldError::new(field, "must be an http(s) URL"));
        }
    }
}

fn check_order(field: &str, order: i32, errors: &mut Vec<FieldError>) {
    if order < 0 {
        errors.push(FieldError::new(field, "must be a non-negative integer"));
    }
}

fn validate_sections(sections: &[SectionInput], errors: &mut Vec<FieldError>) {
    for (i, section) in sections.iter().enumerate() {
        let at = |field: &str| format!("sections[{}].{}", i, field);

        if SectionType::parse(&section.r#type).is_none() {
            errors.push(FieldError::new(at("type"), "unknown section type"));
        }
        if !THEMES.contains(&section.theme.as_str()) {
            errors.push(FieldError::new(at("theme"), "must be light, dark or accent"));
        }
        check_order(&at("order"), section.order, errors);
        check_url(&at("cta_url"), &section.cta_url, errors);
        check_url(&at("image_url"), &section.image_url, errors);
        check_url(&at("video_url"), &section.video_url, errors);

        for (j, metric) in section.metrics.iter().enumerate() {
            check_order(&format!("sections[{}].metrics[{}].order", i, j), metric.order, errors);
        }
        for (j, feature) in section.features.iter().enumerate() {
            let fat = |field: &str| format!("sections[{}].features[{}].{}", i, j, field);
            check_order(&fat("order"), feature.order, errors);
            if !FEATURE_STYLES.contains(&feature.style.as_str()) {
                errors.push(FieldError::new(fat("style"), "must be portrait or square"));
            }
            check_url(&fat("background_image_url"), &feature.background_image_url, errors);
            check_url(&fat("modal_video_url"), &feature.modal_video_url, errors);
        }
        for (j, tile) in section.tiles.iter().enumerate() {
            let tat = |field: &str| format!("sections[{}].tiles[{}].{}", i, j, field);
            check_order(&tat("order"), tile.order, errors);
            check_url(&tat("action_url"), &tile.action_url, errors);
        }
        for (j, spec) in section.specs.iter().enumerate() {
            check_order(&format!("sections[{}].specs[{}].order", i, j), spec.order, errors);
        }
        for (j, faq) in section.faqs.iter().enumerate() {
            check_order(&format!("sections[{}].faqs[{}].order", i, j), faq.order, errors);
        }
        for (j, tab) in section.media_tabs.iter().enumerate() {
            let mat = |field: &str| format!("sections[{}].media_tabs[{}].{}", i, j, field);
            check_order(&mat("order"), tab.order, errors);
            check_url(&mat("image_url"), &tab.image_url, errors);
            check_url(&mat("video_url"), &tab.video_url, errors);
        }
    }
}

fn validate_create(payload: &CreateProjectRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if payload.title.trim().is_empty() {
        errors.push(FieldError::new("title", "required"));
    }
    // Projects never auto-derive slugs; an explicit one is required.
    if payload.slug.trim().is_empty() {
        errors.push(FieldError::new("slug", "required"));
    } else if !is_valid_slug(&payload.slug) {
        errors.push(FieldError::new(
            "slug",
            "must contain only lowercase letters, numbers, and hyphens",
        ));
    }
    check_url("hero_image_url", &payload.hero_image_url, &mut errors);
    check_url("logo_url", &payload.logo_url, &mut errors);
    check_url("video_url", &payload.video_url, &mut errors);
    check_url("website_url", &payload.website_url, &mut errors);
    if let Some(sections) = &payload.sections {
        validate_sections(sections, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

fn validate_update(payload: &UpdateProjectRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            errors.push(FieldError::new("title", "must not be empty"));
        }
    }
    check_patch_url("hero_image_url", &payload.hero_image_url, &mut errors);
    check_patch_url("logo_url", &payload.logo_url, &mut errors);
    check_patch_url("video_url", &payload.video_url, &mut errors);
    check_patch_url("website_url", &payload.website_url, &mut errors);
    if let Some(sections) = &payload.sections {
        validate_sections(sections, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

// ============================================================================
// Serialization
// ============================================================================

fn image_response(image: ProjectImage, base_url: &str) -> ProjectImageResponse {
    ProjectImageResponse {
        id: image.id,
        image: format!("{}/uploads/{}", base_url, image.image),
        is_gif: image.is_gif,
    }
}

fn metric_response(m: SectionMetric) -> MetricResponse {
    MetricResponse {
        id: m.id,
        order: m.order,
        value: m.value,
        label: m.label,
        description: m.description,
    }
}

fn feature_response(f: SectionFeature, base_url: &str) -> FeatureResponse {
    FeatureResponse {
        id: f.id,
        order: f.order,
        icon_image: MediaRef::upload_only(&f.icon_image).resolve(base_url),
        background_image: MediaRef::new(&f.background_image, &f.background_image_url)
            .resolve(base_url),
        modal_image: MediaRef::upload_only(&f.modal_image).resolve(base_url),
        title: f.title,
        description: f.description,
        icon_text: f.icon_text,
        style: f.style,
        background_color: f.background_color,
        text_color: f.text_color,
        modal_title: f.modal_title,
        modal_description: f.modal_description,
        modal_video_url: f.modal_video_url,
        modal_content: f.modal_content,
    }
}

fn tile_response(t: SectionTile, base_url: &str) -> TileResponse {
    TileResponse {
        id: t.id,
        order: t.order,
        icon_image: MediaRef::upload_only(&t.icon_image).resolve(base_url),
        icon_text: t.icon_text,
        title: t.title,
        body: t.body,
        action_text: t.action_text,
        action_url: t.action_url,
    }
}

fn spec_response(s: SectionSpec) -> SpecResponse {
    SpecResponse {
        id: s.id,
        order: s.order,
        label: s.label,
        value: s.value,
    }
}

fn faq_response(f: SectionFaq) -> FaqResponse {
    FaqResponse {
        id: f.id,
        order: f.order,
        question: f.question,
        answer: f.answer,
    }
}

fn media_tab_response(t: SectionMediaTab, base_url: &str) -> MediaTabResponse {
    MediaTabResponse {
        id: t.id,
        order: t.order,
        image: MediaRef::new(&t.image, &t.image_url).resolve(base_url),
        title: t.title,
        subtitle: t.subtitle,
        description: t.description,
        video_url: t.video_url,
    }
}

/// Flatten one section and its child rows into a single object. All six
/// child arrays are emitted regardless of the section type.
#[allow(clippy::too_many_arguments)]
fn section_response(
    section: ProjectSection,
    metrics: Vec<SectionMetric>,
    features: Vec<SectionFeature>,
    tiles: Vec<SectionTile>,
    specs: Vec<SectionSpec>,
    faqs: Vec<SectionFaq>,
    media_tabs: Vec<SectionMediaTab>,
    base_url: &str,
) -> SectionResponse {
    SectionResponse {
        id: section.id,
        order: section.order,
        image: MediaRef::new(&section.image, &section.image_url).resolve(base_url),
        video: MediaRef::new(&section.video, &section.video_url).resolve(base_url),
        r#type: section.r#type,
        title: section.title,
        subtitle: section.subtitle,
        content: section.content,
        theme: section.theme,
        cta_text: section.cta_text,
        cta_url: section.cta_url,
        extra: section.extra,
        metrics: metrics.into_iter().map(metric_response).collect(),
        features: features
            .into_iter()
            .map(|f| feature_response(f, base_url))
            .collect(),
        media_tabs: media_tabs
            .into_iter()
            .map(|t| media_tab_response(t, base_url))
            .collect(),
        tiles: tiles.into_iter().map(|t| tile_response(t, base_url)).collect(),
        specs: specs.into_iter().map(spec_response).collect(),
        faqs: faqs.into_iter().map(faq_response).collect(),
    }
}

/// Fetch one child collection, ordered by `order` with insertion order
/// breaking ties.
macro_rules! fetch_children {
    ($pool:expr, $section_id:expr, $model:ty, $table:literal) => {
        sqlx::query_as::<_, $model>(concat!(
            "SELECT * FROM ",
            $table,
            " WHERE section_id = $1 ORDER BY \"order\" ASC, id ASC"
        ))
        .bind($section_id)
        .fetch_all($pool)
    };
}

async fn build_section(
    pool: &PgPool,
    section: ProjectSection,
    base_url: &str,
) -> Result<SectionResponse, ApiError> {
    let metrics = fetch_children!(pool, section.id, SectionMetric, "section_metrics").await?;
    let features = fetch_children!(pool, section.id, SectionFeature, "section_features").await?;
    let tiles = fetch_children!(pool, section.id, SectionTile, "section_tiles").await?;
    let specs = fetch_children!(pool, section.id, SectionSpec, "section_specs").await?;
    let faqs = fetch_children!(pool, section.id, SectionFaq, "section_faqs").await?;
    let media_tabs =
        fetch_children!(pool, section.id, SectionMediaTab, "section_media_tabs").await?;

    Ok(section_response(
        section, metrics, features, tiles, specs, faqs, media_tabs, base_url,
    ))
}

async fn build_project(
    pool: &PgPool,
    project: Project,
    base_url: &str,
) -> Result<ProjectResponse, ApiError> {
    let images = sqlx::query_as::<_, ProjectImage>(
        "SELECT * FROM project_images WHERE project_id = $1 ORDER BY id ASC",
    )
    .bind(project.id)
    .fetch_all(pool)
    .await?;

    let sections = sqlx::query_as::<_, ProjectSection>(
        r#"SELECT * FROM project_sections WHERE project_id = $1 ORDER BY "order" ASC, id ASC"#,
    )
    .bind(project.id)
    .fetch_all(pool)
    .await?;

    let mut section_responses = Vec::with_capacity(sections.len());
    for section in sections {
        section_responses.push(build_section(pool, section, base_url).await?);
    }

    Ok(ProjectResponse {
        id: project.id,
        hero_image: MediaRef::new(&project.hero_image, &project.hero_image_url)
            .resolve_or(base_url, HERO_PLACEHOLDER),
        logo: MediaRef::new(&project.logo, &project.logo_url).resolve_or(base_url, LOGO_PLACEHOLDER),
        video: MediaRef::new(&project.video, &project.video_url).resolve(base_url),
        title: project.title,
        slug: project.slug,
        short_description: project.short_description,
        industry: project.industry,
        client: project.client,
        date: project.date,
        website_url: project.website_url,
        created_at: project.created_at,
        images: images
            .into_iter()
            .map(|i| image_response(i, base_url))
            .collect(),
        sections: section_responses,
    })
}

// ============================================================================
// Persistence helpers
// ============================================================================

async fn insert_sections(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    project_id: i64,
    sections: &[SectionInput],
) -> Result<(), ApiError> {
    for section in sections {
        let (section_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO project_sections
                (project_id, "order", type, title, subtitle, content, theme,
                 cta_text, cta_url, image, image_url, video, video_url, extra)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(project_id)
        .bind(section.order)
        .bind(&section.r#type)
        .bind(&section.title)
        .bind(&section.subtitle)
        .bind(&section.content)
        .bind(&section.theme)
        .bind(&section.cta_text)
        .bind(&section.cta_url)
        .bind(&section.image)
        .bind(&section.image_url)
        .bind(&section.video)
        .bind(&section.video_url)
        .bind(&section.extra)
        .fetch_one(&mut **tx)
        .await?;

        for m in &section.metrics {
            sqlx::query(
                r#"
                INSERT INTO section_metrics (section_id, "order", value, label, description)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(section_id)
            .bind(m.order)
            .bind(&m.value)
            .bind(&m.label)
            .bind(&m.description)
            .execute(&mut **tx)
            .await?;
        }

        for f in &section.features {
            sqlx::query(
                r#"
                INSERT INTO section_features
                    (section_id, "order", title, description, icon_text, icon_image,
                     style, background_image, background_image_url, background_color,
                     text_color, modal_title, modal_description, modal_image,
                     modal_video_url, modal_content)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                "#,
            )
            .bind(section_id)
            .bind(f.order)
            .bind(&f.title)
            .bind(&f.description)
            .bind(&f.icon_text)
            .bind(&f.icon_image)
            .bind(&f.style)
            .bind(&f.background_image)
            .bind(&f.background_image_url)
            .bind(&f.background_color)
            .bind(&f.text_color)
            .bind(&f.modal_title)
            .bind(&f.modal_description)
            .bind(&f.modal_image)
            .bind(&f.modal_video_url)
            .bind(&f.modal_content)
            .execute(&mut **tx)
            .await?;
        }

        for t in &section.tiles {
            sqlx::query(
                r#"
                INSERT INTO section_tiles
                    (section_id, "order", icon_text, icon_image, title, body, action_text, action_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(section_id)
            .bind(t.order)
            .bind(&t.icon_text)
            .bind(&t.icon_image)
            .bind(&t.title)
            .bind(&t.body)
            .bind(&t.action_text)
            .bind(&t.action_url)
            .execute(&mut **tx)
            .await?;
        }

        for s in &section.specs {
            sqlx::query(
                r#"
                INSERT INTO section_specs (section_id, "order", label, value)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(section_id)
            .bind(s.order)
            .bind(&s.label)
            .bind(&s.value)
            .execute(&mut **tx)
            .await?;
        }

        for f in &section.faqs {
            sqlx::query(
                r#"
                INSERT INTO section_faqs (section_id, "order", question, answer)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(section_id)
            .bind(f.order)
            .bind(&f.question)
            .bind(&f.answer)
            .execute(&mut **tx)
            .await?;
        }

        for t in &section.media_tabs {
            sqlx::query(
                r#"
                INSERT INTO section_media_tabs
                    (section_id, "order", title, subtitle, description, image, image_url, video_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(section_id)
            .bind(t.order)
            .bind(&t.title)
            .bind(&t.subtitle)
            .bind(&t.description)
            .bind(&t.image)
            .bind(&t.image_url)
            .bind(&t.video_url)
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}

async fn insert_images(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    project_id: i64,
    images: &[ImageInput],
) -> Result<(), ApiError> {
    for image in images {
        sqlx::query("INSERT INTO project_images (project_id, image, is_gif) VALUES ($1, $2, $3)")
            .bind(project_id)
            .bind(&image.image)
            .bind(image.is_gif)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn fetch_by_slug(pool: &PgPool, slug: &str) -> Result<Project, ApiError> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("project"))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/projects - List all projects, newest first
pub async fn list_projects(headers: HeaderMap) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let base_url = request_base_url(&headers);

    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects ORDER BY created_at DESC, id ASC",
    )
    .fetch_all(pool.as_ref())
    .await?;

    let mut responses = Vec::with_capacity(projects.len());
    for project in projects {
        responses.push(build_project(pool.as_ref(), project, &base_url).await?);
    }

    Ok(Json(responses))
}

/// GET /api/projects/:slug - Get a single project by slug
pub async fn get_project(
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Json<ProjectResponse>> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let base_url = request_base_url(&headers);

    let project = fetch_by_slug(pool.as_ref(), &slug).await?;
    Ok(Json(build_project(pool.as_ref(), project, &base_url).await?))
}

/// POST /api/projects - Create a project, optionally with nested images
/// and sections, in one transaction
pub async fn create_project(
    headers: HeaderMap,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_create(&payload)?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let base_url = request_base_url(&headers);

    let mut tx = pool.begin().await?;

    // A duplicate slug is a caller mistake, not an integrity conflict; the
    // unique index catches the race between this check and the insert.
    let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM projects WHERE slug = $1")
        .bind(&payload.slug)
        .fetch_optional(&mut *tx)
        .await?;
    if taken.is_some() {
        return Err(ApiError::invalid("slug", "already exists"));
    }

    let project = sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects
            (title, slug, short_description, hero_image, hero_image_url, logo,
             logo_url, industry, video, video_url, client, date, website_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.slug)
    .bind(&payload.short_description)
    .bind(&payload.hero_image)
    .bind(&payload.hero_image_url)
    .bind(&payload.logo)
    .bind(&payload.logo_url)
    .bind(&payload.industry)
    .bind(&payload.video)
    .bind(&payload.video_url)
    .bind(&payload.client)
    .bind(&payload.date)
    .bind(&payload.website_url)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(images) = &payload.images {
        insert_images(&mut tx, project.id, images).await?;
    }
    if let Some(sections) = &payload.sections {
        insert_sections(&mut tx, project.id, sections).await?;
    }

    tx.commit().await?;

    tracing::info!(slug = %project.slug, "project created");
    let response = build_project(pool.as_ref(), project, &base_url).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT/PATCH /api/projects/:slug - Update scalar fields; supplied `images`
/// or `sections` arrays replace the nested collections wholesale
pub async fn update_project(
    headers: HeaderMap,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    validate_update(&payload)?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let base_url = request_base_url(&headers);

    let existing = fetch_by_slug(pool.as_ref(), &slug).await?;

    let mut tx = pool.begin().await?;

    let project = sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects SET
            title = $1, short_description = $2, hero_image = $3,
            hero_image_url = $4, logo = $5, logo_url = $6, industry = $7,
            video = $8, video_url = $9, client = $10, date = $11,
            website_url = $12
        WHERE id = $13
        RETURNING *
        "#,
    )
    .bind(payload.title.unwrap_or(existing.title))
    .bind(payload.short_description.unwrap_or(existing.short_description))
    .bind(payload.hero_image.unwrap_or(existing.hero_image))
    .bind(payload.hero_image_url.unwrap_or(existing.hero_image_url))
    .bind(payload.logo.unwrap_or(existing.logo))
    .bind(payload.logo_url.unwrap_or(existing.logo_url))
    .bind(payload.industry.unwrap_or(existing.industry))
    .bind(payload.video.unwrap_or(existing.video))
    .bind(payload.video_url.unwrap_or(existing.video_url))
    .bind(payload.client.unwrap_or(existing.client))
    .bind(payload.date.unwrap_or(existing.date))
    .bind(payload.website_url.unwrap_or(existing.website_url))
    .bind(existing.id)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(images) = &payload.images {
        sqlx::query("DELETE FROM project_images WHERE project_id = $1")
            .bind(project.id)
            .execute(&mut *tx)
            .await?;
        insert_images(&mut tx, project.id, images).await?;
    }
    if let Some(sections) = &payload.sections {
        // Child rows go with their sections via ON DELETE CASCADE.
        sqlx::query("DELETE FROM project_sections WHERE project_id = $1")
            .bind(project.id)
            .execute(&mut *tx)
            .await?;
        insert_sections(&mut tx, project.id, sections).await?;
    }

    tx.commit().await?;

    tracing::info!(slug = %project.slug, "project updated");
    Ok(Json(build_project(pool.as_ref(), project, &base_url).await?))
}

/// DELETE /api/projects/:slug - Delete a project and, via cascade, all of
/// its sections and their child rows
pub async fn delete_project(Path(slug): Path<String>) -> ApiResult<Json<SuccessResponse>> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let result = sqlx::query("DELETE FROM projects WHERE slug = $1")
        .bind(&slug)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("project"));
    }

    tracing::info!(slug = %slug, "project deleted");
    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bare_section(section_type: &str) -> ProjectSection {
        ProjectSection {
            id: 1,
            project_id: 1,
            order: 0,
            r#type: section_type.to_string(),
            title: None,
            subtitle: None,
            content: None,
            theme: "light".to_string(),
            cta_text: None,
            cta_url: None,
            image: None,
            image_url: None,
            video: None,
            video_url: None,
            extra: None,
        }
    }

    fn bare_project() -> Project {
        Project {
            id: 1,
            title: "WOFA".to_string(),
            slug: "wofa".to_string(),
            short_description: String::new(),
            hero_image: None,
            hero_image_url: None,
            logo: None,
            logo_url: None,
            industry: String::new(),
            video: None,
            video_url: None,
            client: String::new(),
            date: String::new(),
            website_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_section_serializes_all_six_arrays_regardless_of_type() {
        for section_type in ["heading", "metrics", "gallery", "custom"] {
            let response = section_response(
                bare_section(section_type),
                vec![],
                vec![],
                vec![],
                vec![],
                vec![],
                vec![],
                "http://localhost",
            );
            let json = serde_json::to_value(&response).unwrap();
            for key in ["metrics", "features", "tiles", "specs", "faqs", "media_tabs"] {
                assert!(json[key].is_array(), "missing array {} for {}", key, section_type);
                assert_eq!(json[key].as_array().unwrap().len(), 0);
            }
        }
    }

    #[test]
    fn test_section_image_resolution_prefers_upload() {
        let mut section = bare_section("image");
        section.image = Some("projects/sections/images/a.png".to_string());
        section.image_url = Some("https://example.com/b.png".to_string());
        let response =
            section_response(section, vec![], vec![], vec![], vec![], vec![], vec![], "http://h");
        assert_eq!(
            response.image.as_deref(),
            Some("http://h/uploads/projects/sections/images/a.png")
        );
    }

    #[test]
    fn test_extra_passes_through_opaquely() {
        let mut section = bare_section("gallery");
        section.extra = Some(serde_json::json!({ "images": ["a.png", "b.png"] }));
        let response =
            section_response(section, vec![], vec![], vec![], vec![], vec![], vec![], "http://h");
        assert_eq!(
            response.extra,
            Some(serde_json::json!({ "images": ["a.png", "b.png"] }))
        );
    }

    #[test]
    fn test_validate_create_requires_slug() {
        let payload = CreateProjectRequest {
            title: "WOFA".to_string(),
            slug: String::new(),
            short_description: String::new(),
            hero_image: None,
            hero_image_url: None,
            logo: None,
            logo_url: None,
            industry: String::new(),
            video: None,
            video_url: None,
            client: String::new(),
            date: String::new(),
            website_url: None,
            images: None,
            sections: None,
        };
        assert!(matches!(
            validate_create(&payload),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_section_type_and_negative_order() {
        let payload = CreateProjectRequest {
            title: "WOFA".to_string(),
            slug: "wofa".to_string(),
            short_description: String::new(),
            hero_image: None,
            hero_image_url: None,
            logo: None,
            logo_url: None,
            industry: String::new(),
            video: None,
            video_url: None,
            client: String::new(),
            date: String::new(),
            website_url: None,
            images: None,
            sections: Some(vec![SectionInput {
                order: -1,
                r#type: "banner".to_string(),
                title: None,
                subtitle: None,
                content: None,
                theme: "light".to_string(),
                cta_text: None,
                cta_url: None,
                image: None,
                image_url: None,
                video: None,
                video_url: None,
                extra: None,
                metrics: vec![],
                features: vec![],
                tiles: vec![],
                specs: vec![],
                faqs: vec![],
                media_tabs: vec![],
            }]),
        };
        match validate_create(&payload) {
            Err(ApiError::Validation(fields)) => {
                assert!(fields.iter().any(|f| f.field == "sections[0].type"));
                assert!(fields.iter().any(|f| f.field == "sections[0].order"));
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_hero_and_logo_fall_back_to_placeholders() {
        // Serialization of the scalar project fields is pure; exercise the
        // same resolution calls build_project makes.
        let project = bare_project();
        let hero = MediaRef::new(&project.hero_image, &project.hero_image_url)
            .resolve_or("http://h", HERO_PLACEHOLDER);
        let logo = MediaRef::new(&project.logo, &project.logo_url)
            .resolve_or("http://h", LOGO_PLACEHOLDER);
        assert_eq!(hero, HERO_PLACEHOLDER);
        assert_eq!(logo, LOGO_PLACEHOLDER);
    }

    #[test]
    fn test_update_null_clears_while_absent_keeps() {
        let stored = Some("https://example.com/old.jpg".to_string());

        let payload: UpdateProjectRequest =
            serde_json::from_str(r#"{"hero_image_url": null, "title": "New"}"#).unwrap();
        // Explicit null clears; the merge the update handler performs
        // resolves to None.
        assert_eq!(payload.hero_image_url.unwrap_or(stored.clone()), None);
        // Absent field keeps the stored value.
        assert_eq!(payload.logo_url.unwrap_or(stored.clone()), stored);
    }

    #[test]
    fn test_update_validation_checks_patched_urls() {
        let payload: UpdateProjectRequest =
            serde_json::from_str(r#"{"website_url": "not-a-url"}"#).unwrap();
        match validate_update(&payload) {
            Err(ApiError::Validation(fields)) => {
                assert!(fields.iter().any(|f| f.field == "website_url"));
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_hero_uses_external_url_when_no_upload() {
        let mut project = bare_project();
        project.hero_image_url = Some("https://example.com/a.jpg".to_string());
        let hero = MediaRef::new(&project.hero_image, &project.hero_image_url)
            .resolve_or("http://h", HERO_PLACEHOLDER);
        assert_eq!(hero, "https://example.com/a.jpg");
    }
}
