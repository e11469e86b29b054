use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use regex::Regex;

use crate::models::FeedItem;
use crate::FeedError;

/// Per-fetch cap on processed item elements.
const MAX_ITEMS: usize = 30;

static ITEM_BLOCK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<item\b[^>]*>(.*?)</item\s*>").unwrap());
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").unwrap());
static DESCRIPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<description[^>]*>(.*?)</description\s*>").unwrap());
static PUB_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pubDate[^>]*>(.*?)</pubDate\s*>").unwrap());

/// Parse a feed document from raw bytes.
///
/// A strict XML pass runs first; real-world feeds with broken markup fall
/// back to a lenient tag scan. Fails only when every strategy comes up
/// empty-handed.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedItem>, FeedError> {
    match parse_strict(bytes) {
        Ok(items) => Ok(items),
        Err(strict_err) => {
            tracing::warn!(
                "Strict XML parse failed, falling back to lenient parse: {}",
                strict_err
            );
            let text = String::from_utf8_lossy(bytes);
            let items = parse_lenient(&text);
            if items.is_empty() {
                Err(FeedError::Parse(format!(
                    "all parse strategies failed, last error: {}",
                    strict_err
                )))
            } else {
                Ok(items)
            }
        }
    }
}

/// Event-based pass over well-formed XML.
fn parse_strict(xml: &[u8]) -> Result<Vec<FeedItem>, FeedError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut seen = 0usize;
    let mut buf = Vec::new();

    let mut current_item: Option<ItemBuilder> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    current_item = Some(ItemBuilder::default());
                }
                current_element = name;
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    if let Some(builder) = current_item.take() {
                        if let Some(item) = builder.build() {
                            items.push(item);
                        }
                    }
                    seen += 1;
                    if seen >= MAX_ITEMS {
                        break;
                    }
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = e.unescape().unwrap_or_default().to_string();
                    item.set_field(&current_element, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                    item.set_field(&current_element, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

/// Tag scan for documents the XML reader rejects. Pulls out `<item>`
/// blocks and their title/description/pubDate children with regexes,
/// ignoring everything else.
fn parse_lenient(text: &str) -> Vec<FeedItem> {
    ITEM_BLOCK_PATTERN
        .captures_iter(text)
        .take(MAX_ITEMS)
        .filter_map(|block| {
            let body = block.get(1)?.as_str();
            let mut builder = ItemBuilder::default();
            if let Some(title) = capture_text(&TITLE_PATTERN, body) {
                builder.set_field("title", &title);
            }
            if let Some(description) = capture_text(&DESCRIPTION_PATTERN, body) {
                builder.set_field("description", &description);
            }
            if let Some(pub_date) = capture_text(&PUB_DATE_PATTERN, body) {
                builder.set_field("pubDate", &pub_date);
            }
            builder.build()
        })
        .collect()
}

fn capture_text(pattern: &Regex, body: &str) -> Option<String> {
    let raw = pattern.captures(body)?.get(1)?.as_str();
    Some(unescape_entities(strip_cdata(raw)))
}

fn strip_cdata(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("<![CDATA[")
        .and_then(|inner| inner.strip_suffix("]]>"))
        .unwrap_or(s)
}

fn unescape_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    description: Option<String>,
    pub_date: Option<String>,
}

impl ItemBuilder {
    fn set_field(&mut self, element: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        match element {
            "title" => self.title = Some(value.to_string()),
            "description" => self.description = Some(value.to_string()),
            "pubDate" => self.pub_date = Some(value.to_string()),
            _ => {}
        }
    }

    /// Items with no usable text are dropped. A missing or unparseable
    /// pubDate falls back to the current time rather than failing the item.
    fn build(self) -> Option<FeedItem> {
        let title = self.title.unwrap_or_default();
        let description = self.description.unwrap_or_default();
        if title.trim().is_empty() && description.trim().is_empty() {
            return None;
        }

        let published = self
            .pub_date
            .as_deref()
            .and_then(parse_pub_date)
            .unwrap_or_else(Utc::now);

        Some(FeedItem {
            title,
            description,
            published,
        })
    }
}

/// pubDate is RFC 2822 in the wild, with RFC 3339 from some generators.
fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
