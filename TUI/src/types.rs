// Shapes returned by the recipe lookup endpoint

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub title: String,
    pub description: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    #[serde(default)]
    pub tips: Vec<String>,
    /// Related dish names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSuggestions {
    pub recommend: Vec<String>,
    #[serde(default)]
    pub reason: String,
}

impl MenuSuggestions {
    /// The list shown before the first lookup.
    pub fn seed() -> Self {
        Self {
            recommend: vec![
                "宫保鸡丁".to_string(),
                "鱼香肉丝".to_string(),
                "天气冷，吃点什么好？".to_string(),
                "心情抑郁，吃点什么好？".to_string(),
                "手脚酸疼，吃点什么好？".to_string(),
            ],
            reason: "你可以输入任何问题，或者任何描述，我都会给你推荐一个食谱或者菜单".to_string(),
        }
    }
}

/// A lookup response, classified once when it comes off the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Recipe(Recipe),
    Suggestions(MenuSuggestions),
}

impl LookupResult {
    /// Classify a decoded JSON body. An array-valued `recommend` field marks
    /// a suggestions list; everything else has to parse as a recipe.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let is_suggestions = value
            .get("recommend")
            .map(|v| v.is_array())
            .unwrap_or(false);

        if is_suggestions {
            serde_json::from_value(value).map(LookupResult::Suggestions)
        } else {
            serde_json::from_value(value).map(LookupResult::Recipe)
        }
    }

    /// Dish names that can be picked to start a new lookup.
    pub fn suggestion_items(&self) -> &[String] {
        match self {
            LookupResult::Suggestions(s) => &s.recommend,
            LookupResult::Recipe(r) => r.suggestions.as_deref().unwrap_or(&[]),
        }
    }
}
