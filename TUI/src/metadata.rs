//! Page metadata derived from the current query and result.
//!
//! The controller only computes this value. Applying it (window title,
//! link-preview panel) happens at the edges in `main.rs` and `ui.rs`.

use crate::config::APP_TITLE;
use crate::link::share_url;
use crate::types::LookupResult;

#[derive(Debug, Clone, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
}

impl PageMetadata {
    pub fn describe(query: &str, result: &LookupResult, share_base: &str) -> Self {
        if query.is_empty() {
            let description = match result {
                LookupResult::Suggestions(s) => s.reason.clone(),
                LookupResult::Recipe(r) => recipe_description(r),
            };
            return Self {
                title: APP_TITLE.to_string(),
                description,
                canonical_url: format!("{}/", share_base.trim_end_matches('/')),
            };
        }

        let (title, description) = match result {
            LookupResult::Recipe(recipe) => (
                format!("{} - {}", recipe.name, APP_TITLE),
                recipe_description(recipe),
            ),
            LookupResult::Suggestions(s) => {
                (format!("{} - {}", query, APP_TITLE), s.reason.clone())
            }
        };

        Self {
            title,
            description,
            canonical_url: share_url(share_base, query),
        }
    }

    /// Name/value pairs for the description, canonical, Open Graph and
    /// Twitter card tags.
    pub fn link_preview(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("description", self.description.as_str()),
            ("canonical", self.canonical_url.as_str()),
            ("og:title", self.title.as_str()),
            ("og:description", self.description.as_str()),
            ("og:url", self.canonical_url.as_str()),
            ("twitter:title", self.title.as_str()),
            ("twitter:description", self.description.as_str()),
            ("twitter:url", self.canonical_url.as_str()),
        ]
    }
}

fn recipe_description(recipe: &crate::types::Recipe) -> String {
    match recipe.description.as_deref().map(str::trim) {
        Some(desc) if !desc.is_empty() => desc.to_string(),
        _ => format!("{}的做法：食材、步骤和小贴士", recipe.name),
    }
}
