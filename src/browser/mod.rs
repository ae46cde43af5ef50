pub mod error;
pub mod poll;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use std::fmt;

pub use error::{BrowserError, map_error};
pub use poll::{PollPolicy, wait_for_tag};
pub use webdriver::WebDriverSession;

/// How to find elements, relative to the document or to a parent element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Id(String),
    Name(String),
    Tag(String),
    /// Any element whose own text is exactly this string.
    Text(String),
    XPath(String),
}

impl Locator {
    pub fn id(id: &str) -> Self {
        Locator::Id(id.to_string())
    }

    pub fn name(name: &str) -> Self {
        Locator::Name(name.to_string())
    }

    pub fn tag(tag: &str) -> Self {
        Locator::Tag(tag.to_string())
    }

    pub fn text(text: &str) -> Self {
        Locator::Text(text.to_string())
    }

    pub fn xpath(xpath: impl Into<String>) -> Self {
        Locator::XPath(xpath.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id:{id}"),
            Locator::Name(name) => write!(f, "name:{name}"),
            Locator::Tag(tag) => write!(f, "tag:{tag}"),
            Locator::Text(text) => write!(f, "text:{text}"),
            Locator::XPath(xpath) => write!(f, "xpath:{xpath}"),
        }
    }
}

/// Quotes `value` for use inside an XPath expression.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

pub type ElementRef = Box<dyn Element>;

#[async_trait]
pub trait Element: Send + Sync {
    /// Inner HTML of the element.
    async fn html(&self) -> Result<String, BrowserError>;
    async fn text(&self) -> Result<String, BrowserError>;
    async fn is_visible(&self) -> Result<bool, BrowserError>;
    async fn click(&self) -> Result<(), BrowserError>;
    /// Replaces the field's value with `value`.
    async fn fill(&self, value: &str) -> Result<(), BrowserError>;
    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, BrowserError>;

    async fn find_first(&self, locator: &Locator) -> Result<Option<ElementRef>, BrowserError> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }
}

#[async_trait]
pub trait Session: Send + Sync {
    async fn visit(&self, url: &str) -> Result<(), BrowserError>;
    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, BrowserError>;
    async fn close(&self) -> Result<(), BrowserError>;

    async fn find_first(&self, locator: &Locator) -> Result<Option<ElementRef>, BrowserError> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }
}

/// First element whose HTML contains `substring`, if any.
pub async fn element_by_substring(
    substring: &str,
    elements: Vec<ElementRef>,
) -> Result<Option<ElementRef>, BrowserError> {
    for element in elements {
        if element.html().await?.contains(substring) {
            return Ok(Some(element));
        }
    }
    Ok(None)
}
