use async_trait::async_trait;
use fantoccini::elements::Element as WdElement;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use log::{debug, info};
use serde_json::{Map, Value, json};

use super::{BrowserError, Element, ElementRef, Locator, Session, xpath_literal};

impl From<CmdError> for BrowserError {
    fn from(err: CmdError) -> Self {
        if err.is_no_such_element() {
            BrowserError::ElementNotFound(err.to_string())
        } else if err.is_stale_element_reference() {
            BrowserError::Stale(err.to_string())
        } else {
            BrowserError::Command(err.to_string())
        }
    }
}

enum Query {
    Css(String),
    Id(String),
    XPath(String),
}

impl From<&Locator> for Query {
    fn from(locator: &Locator) -> Self {
        match locator {
            Locator::Id(id) => Query::Id(id.clone()),
            Locator::Name(name) => Query::Css(format!("[name=\"{name}\"]")),
            Locator::Tag(tag) => Query::Css(tag.clone()),
            Locator::Text(text) => {
                Query::XPath(format!(".//*[normalize-space(text())={}]", xpath_literal(text)))
            }
            Locator::XPath(xpath) => Query::XPath(xpath.clone()),
        }
    }
}

impl Query {
    fn as_locator(&self) -> fantoccini::Locator<'_> {
        match self {
            Query::Css(css) => fantoccini::Locator::Css(css),
            Query::Id(id) => fantoccini::Locator::Id(id),
            Query::XPath(xpath) => fantoccini::Locator::XPath(xpath),
        }
    }
}

fn wrap(elements: Vec<WdElement>) -> Vec<ElementRef> {
    elements
        .into_iter()
        .map(|element| Box::new(WebDriverElement(element)) as ElementRef)
        .collect()
}

pub struct WebDriverElement(WdElement);

#[async_trait]
impl Element for WebDriverElement {
    async fn html(&self) -> Result<String, BrowserError> {
        Ok(self.0.html(true).await?)
    }

    async fn text(&self) -> Result<String, BrowserError> {
        Ok(self.0.text().await?)
    }

    async fn is_visible(&self) -> Result<bool, BrowserError> {
        Ok(self.0.is_displayed().await?)
    }

    async fn click(&self) -> Result<(), BrowserError> {
        self.0.click().await?;
        Ok(())
    }

    async fn fill(&self, value: &str) -> Result<(), BrowserError> {
        self.0.clear().await?;
        self.0.send_keys(value).await?;
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, BrowserError> {
        let query = Query::from(locator);
        Ok(wrap(self.0.find_all(query.as_locator()).await?))
    }
}

pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Starts a Firefox session on the WebDriver server at `url`.
    pub async fn connect(url: &str, headless: bool) -> Result<Self, BrowserError> {
        info!("Connecting to WebDriver at {url}");
        let client = ClientBuilder::native()
            .capabilities(firefox_capabilities(headless))
            .connect(url)
            .await
            .map_err(|e| BrowserError::Connect(e.to_string()))?;
        Ok(Self { client })
    }
}

fn firefox_capabilities(headless: bool) -> Map<String, Value> {
    let args: Vec<&str> = if headless { vec!["-headless"] } else { vec![] };
    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("firefox"));
    caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
    caps
}

#[async_trait]
impl Session for WebDriverSession {
    async fn visit(&self, url: &str) -> Result<(), BrowserError> {
        debug!("  visit: {url}");
        Ok(self.client.goto(url).await?)
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, BrowserError> {
        let query = Query::from(locator);
        Ok(wrap(self.client.find_all(query.as_locator()).await?))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        debug!("closing browser session");
        Ok(self.client.clone().close().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantoccini::error::{ErrorStatus, WebDriver};

    fn webdriver_error(status: ErrorStatus) -> CmdError {
        CmdError::Standard(WebDriver::new(status, "from the driver"))
    }

    #[test]
    fn test_command_error_classification() {
        let err = BrowserError::from(webdriver_error(ErrorStatus::StaleElementReference));
        assert!(err.is_stale());
        let err = BrowserError::from(webdriver_error(ErrorStatus::NoSuchElement));
        assert!(matches!(err, BrowserError::ElementNotFound(_)));
        let err = BrowserError::from(webdriver_error(ErrorStatus::NoSuchWindow));
        assert!(matches!(err, BrowserError::Command(_)));
    }

    #[test]
    fn test_headless_capabilities() {
        let caps = firefox_capabilities(true);
        assert_eq!(caps["browserName"], "firefox");
        assert_eq!(caps["moz:firefoxOptions"]["args"][0], "-headless");
    }

    #[test]
    fn test_headed_capabilities() {
        let caps = firefox_capabilities(false);
        assert!(caps["moz:firefoxOptions"]["args"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_name_locator_is_css() {
        let query = Query::from(&Locator::name("password"));
        assert!(matches!(query, Query::Css(css) if css == "[name=\"password\"]"));
    }

    #[test]
    fn test_text_locator_is_relative_xpath() {
        let query = Query::from(&Locator::text("Enable SSL"));
        assert!(
            matches!(query, Query::XPath(x) if x == ".//*[normalize-space(text())='Enable SSL']")
        );
    }
}
