//! Page identity and construction inputs.

use bifrost_event::PageData;
use bifrost_types::{Color, PageId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a host passes to open a page.
///
/// # Example
///
/// ```
/// use bifrost_runtime::page::PageOptions;
/// use bifrost_types::Color;
/// use serde_json::json;
///
/// let options = PageOptions::new("/profile")
///     .with_arguments(json!({"user": 7}))
///     .with_background(Color::BLACK);
/// assert_eq!(options.route, "/profile");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub route: String,
    pub arguments: Value,
    /// `None` uses the configured default.
    pub background_color: Option<Color>,
}

impl PageOptions {
    #[must_use]
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            arguments: Value::Null,
            background_color: None,
        }
    }

    #[must_use]
    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.arguments = arguments;
        self
    }

    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }
}

/// Immutable identity of one page container.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    id: PageId,
    route: String,
    arguments: Value,
    background_color: Color,
}

impl Page {
    pub(crate) fn new(id: PageId, options: PageOptions, default_background: Color) -> Self {
        Self {
            id,
            route: options.route,
            arguments: options.arguments,
            background_color: options.background_color.unwrap_or(default_background),
        }
    }

    #[must_use]
    pub fn id(&self) -> PageId {
        self.id
    }

    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    #[must_use]
    pub fn arguments(&self) -> &Value {
        &self.arguments
    }

    #[must_use]
    pub fn background_color(&self) -> Color {
        self.background_color
    }

    /// Coordinator record for this page.
    #[must_use]
    pub fn data(&self) -> PageData {
        PageData::new(self.id, self.route.clone(), self.arguments.clone())
    }

    #[must_use]
    pub fn descriptor(&self) -> PageDescriptor {
        PageDescriptor {
            id: self.id,
            route: self.route.clone(),
            arguments: self.arguments.clone(),
            background_color: self.background_color,
        }
    }
}

impl From<PageDescriptor> for Page {
    fn from(descriptor: PageDescriptor) -> Self {
        Self {
            id: descriptor.id,
            route: descriptor.route,
            arguments: descriptor.arguments,
            background_color: descriptor.background_color,
        }
    }
}

/// Saved page identity, kept across container recreation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub id: PageId,
    pub route: String,
    #[serde(default)]
    pub arguments: Value,
    #[serde(default)]
    pub background_color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn background_falls_back_to_default() {
        let page = Page::new(PageId::from_raw(1), PageOptions::new("/a"), Color::WHITE);
        assert_eq!(page.background_color(), Color::WHITE);

        let page = Page::new(
            PageId::from_raw(2),
            PageOptions::new("/b").with_background(Color::BLACK),
            Color::WHITE,
        );
        assert_eq!(page.background_color(), Color::BLACK);
    }

    #[test]
    fn descriptor_survives_serialization() {
        let page = Page::new(
            PageId::from_raw(5),
            PageOptions::new("/detail").with_arguments(json!({"item": [1, 2]})),
            Color::WHITE,
        );
        let text = serde_json::to_string(&page.descriptor()).unwrap();
        let back: PageDescriptor = serde_json::from_str(&text).unwrap();

        assert_eq!(Page::from(back), page);
    }

    #[test]
    fn descriptor_optional_fields_default() {
        let descriptor: PageDescriptor =
            serde_json::from_value(json!({"id": 3, "route": "/x"})).unwrap();
        assert_eq!(descriptor.arguments, Value::Null);
        assert_eq!(descriptor.background_color, Color::WHITE);
    }
}
