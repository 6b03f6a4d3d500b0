//! Database Models - structs representing database tables (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Section type tags. The type is advisory: it tells the admin UI and the
/// frontend renderer which fields matter, but the API serializes every
/// child collection regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Heading,
    Paragraph,
    Image,
    Gallery,
    Video,
    Features,
    Metrics,
    MediaTabs,
    Quote,
    List,
    Custom,
}

impl SectionType {
    pub const ALL: &'static [SectionType] = &[
        SectionType::Heading,
        SectionType::Paragraph,
        SectionType::Image,
        SectionType::Gallery,
        SectionType::Video,
        SectionType::Features,
        SectionType::Metrics,
        SectionType::MediaTabs,
        SectionType::Quote,
        SectionType::List,
        SectionType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Heading => "heading",
            SectionType::Paragraph => "paragraph",
            SectionType::Image => "image",
            SectionType::Gallery => "gallery",
            SectionType::Video => "video",
            SectionType::Features => "features",
            SectionType::Metrics => "metrics",
            SectionType::MediaTabs => "media_tabs",
            SectionType::Quote => "quote",
            SectionType::List => "list",
            SectionType::Custom => "custom",
        }
    }

    pub fn parse(tag: &str) -> Option<SectionType> {
        SectionType::ALL.iter().copied().find(|t| t.as_str() == tag)
    }
}

/// Inquiry type tags with their human-readable display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryType {
    AppDevelopment,
    Mvp,
    Uiux,
    Other,
}

impl InquiryType {
    pub const ALL: &'static [InquiryType] = &[
        InquiryType::AppDevelopment,
        InquiryType::Mvp,
        InquiryType::Uiux,
        InquiryType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryType::AppDevelopment => "app_development",
            InquiryType::Mvp => "mvp",
            InquiryType::Uiux => "uiux",
            InquiryType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InquiryType::AppDevelopment => "App Development",
            InquiryType::Mvp => "MVP",
            InquiryType::Uiux => "UI/UX",
            InquiryType::Other => "Other",
        }
    }

    pub fn parse(tag: &str) -> Option<InquiryType> {
        InquiryType::ALL.iter().copied().find(|t| t.as_str() == tag)
    }
}

/// Project model. `hero_image`, `logo` and `video` hold uploaded paths
/// relative to the uploads root; the matching `*_url` columns hold the
/// external alternative.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub hero_image: Option<String>,
    pub hero_image_url: Option<String>,
    pub logo: Option<String>,
    pub logo_url: Option<String>,
    pub industry: String,
    pub video: Option<String>,
    pub video_url: Option<String>,
    pub client: String,
    pub date: String,
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Gallery image owned by a project.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProjectImage {
    pub id: i64,
    pub project_id: i64,
    pub image: String,
    pub is_gif: bool,
}

/// One ordered content block within a project page.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProjectSection {
    pub id: i64,
    pub project_id: i64,
    pub order: i32,
    #[sqlx(rename = "type")]
    pub r#type: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub theme: String,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub video: Option<String>,
    pub video_url: Option<String>,
    pub extra: Option<serde_json::Value>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SectionMetric {
    pub id: i64,
    pub section_id: i64,
    pub order: i32,
    pub value: String,
    pub label: String,
    pub description: Option<String>,
}

/// Feature card. `modal_title` being present is what signals the frontend
/// to enable the tap-to-expand overlay.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SectionFeature {
    pub id: i64,
    pub section_id: i64,
    pub order: i32,
    pub title: String,
    pub description: String,
    pub icon_text: Option<String>,
    pub icon_image: Option<String>,
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

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SectionTile {
    pub id: i64,
    pub section_id: i64,
    pub order: i32,
    pub icon_text: Option<String>,
    pub icon_image: Option<String>,
    pub title: String,
    pub body: String,
    pub action_text: Option<String>,
    pub action_url: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: i64,
    pub section_id: i64,
    pub order: i32,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SectionFaq {
    pub id: i64,
    pub section_id: i64,
    pub order: i32,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SectionMediaTab {
    pub id: i64,
    pub section_id: i64,
    pub order: i32,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

/// Blog post model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BlogPost {
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

/// Contact-form submission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    #[sqlx(rename = "type")]
    pub r#type: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_type_round_trips_through_tag() {
        for t in SectionType::ALL {
            assert_eq!(SectionType::parse(t.as_str()), Some(*t));
        }
        assert_eq!(SectionType::parse("feature"), None);
    }

    #[test]
    fn test_inquiry_type_labels() {
        assert_eq!(InquiryType::parse("mvp"), Some(InquiryType::Mvp));
        assert_eq!(InquiryType::Mvp.label(), "MVP");
        assert_eq!(InquiryType::AppDevelopment.label(), "App Development");
        assert_eq!(InquiryType::Uiux.label(), "UI/UX");
        assert_eq!(InquiryType::parse("billing"), None);
    }
}
