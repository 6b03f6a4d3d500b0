//! Reference table for admin UIs: which base fields and which
//! child-collection editors are worth showing for each section type.
//!
//! This is pure configuration. The API itself always stores and returns
//! every field and every child array; an editor just uses this table to
//! hide the irrelevant ones.

use crate::db::models::SectionType;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SectionFieldConfig {
    pub r#type: SectionType,
    /// Fields to show in the section form, beyond order and type.
    pub base_fields: &'static [&'static str],
    /// Child-collection editors to show inline.
    pub inline_editors: &'static [&'static str],
}

pub fn config_for(section_type: SectionType) -> SectionFieldConfig {
    let base_fields: &'static [&'static str] = match section_type {
        SectionType::Heading | SectionType::Paragraph | SectionType::Quote => {
            &["title", "subtitle", "content", "theme", "cta_text", "cta_url", "extra"]
        }
        SectionType::Image => &["title", "image", "image_url", "extra"],
        SectionType::Video => &["title", "video", "video_url", "extra"],
        // Galleries keep their image list in extra = { "images": [...] }.
        SectionType::Gallery => &["title", "extra"],
        // Items managed through the inline editors.
        SectionType::Features | SectionType::Metrics | SectionType::MediaTabs => {
            &["title", "subtitle", "content", "theme"]
        }
        // Lists keep their rows in extra = { "items": [...] }.
        SectionType::List => &["title", "extra"],
        SectionType::Custom => &["title", "subtitle", "content", "theme", "extra"],
    };

    let inline_editors: &'static [&'static str] = match section_type {
        SectionType::Metrics => &["metrics"],
        SectionType::Features => &["features"],
        SectionType::MediaTabs => &["media_tabs"],
        SectionType::Heading | SectionType::Gallery => &["tiles"],
        SectionType::Paragraph | SectionType::Custom => &["tiles", "specs"],
        SectionType::List => &["faqs"],
        SectionType::Image | SectionType::Video | SectionType::Quote => &[],
    };

    SectionFieldConfig {
        r#type: section_type,
        base_fields,
        inline_editors,
    }
}

/// The full table, one entry per section type.
pub fn full_table() -> Vec<SectionFieldConfig> {
    SectionType::ALL.iter().map(|t| config_for(*t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_type_shows_only_metrics_editor() {
        let config = config_for(SectionType::Metrics);
        assert_eq!(config.inline_editors, &["metrics"]);
    }

    #[test]
    fn test_list_type_shows_faq_editor_and_extra_field() {
        let config = config_for(SectionType::List);
        assert_eq!(config.inline_editors, &["faqs"]);
        assert!(config.base_fields.contains(&"extra"));
    }

    #[test]
    fn test_gallery_keeps_images_in_extra() {
        let config = config_for(SectionType::Gallery);
        assert!(config.base_fields.contains(&"extra"));
        assert!(!config.base_fields.contains(&"image"));
    }

    #[test]
    fn test_table_covers_every_section_type() {
        let table = full_table();
        assert_eq!(table.len(), SectionType::ALL.len());
    }
}
