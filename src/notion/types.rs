//! Notion API wire types
//!
//! Only the subset of the Notion object model the blog reads is modelled.
//! Everything else is ignored on decode.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A database row / page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    pub id: String,

    #[serde(default)]
    pub parent: Parent,

    #[serde(default)]
    pub archived: bool,

    /// Page properties keyed by property name.
    ///
    /// Every property is decoded on its own; one malformed value turns into
    /// [`PropertyValue::Other`] instead of failing the whole page.
    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: HashMap<String, PropertyValue>,
}

impl Page {
    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Whether the page is a row of the given database. Ids are compared
    /// without dashes since the API accepts both forms.
    pub fn belongs_to(&self, database_id: &str) -> bool {
        self.parent
            .database_id
            .as_deref()
            .map(|parent| normalize_id(parent) == normalize_id(database_id))
            .unwrap_or(false)
    }
}

/// Where a page lives
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Parent {
    pub database_id: Option<String>,
}

/// Strip dashes and lowercase a Notion id
pub fn normalize_id(id: &str) -> String {
    id.chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether a string has the shape of a Notion id (32 hex digits, dashes optional)
pub fn looks_like_id(s: &str) -> bool {
    let normalized = normalize_id(s);
    normalized.len() == 32 && normalized.chars().all(|c| c.is_ascii_hexdigit())
}

fn lenient_properties<'de, D>(deserializer: D) -> Result<HashMap<String, PropertyValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let value = serde_json::from_value(value).unwrap_or(PropertyValue::Other);
            (name, value)
        })
        .collect())
}

/// A typed page property value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Formula {
        formula: Option<FormulaValue>,
    },
    Date {
        date: Option<DateValue>,
    },
    Files {
        #[serde(default)]
        files: Vec<FileObject>,
    },
    Status {
        status: Option<SelectOption>,
    },
    Select {
        select: Option<SelectOption>,
    },
    #[serde(other)]
    Other,
}

/// Result of a formula property
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaValue {
    String { string: Option<String> },
    Number { number: Option<f64> },
    Boolean { boolean: Option<bool> },
    Date { date: Option<DateValue> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DateValue {
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

/// File reference, either hosted by Notion or external
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileObject {
    pub name: Option<String>,
    pub file: Option<FileUrl>,
    pub external: Option<FileUrl>,
}

impl FileObject {
    /// URL of the file, whichever hosting kind it uses
    pub fn url(&self) -> Option<&str> {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileUrl {
    #[serde(default)]
    pub url: String,
}

/// One segment of rich text
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RichText {
    /// "text", "mention" or "equation"
    #[serde(rename = "type")]
    pub kind: String,
    pub plain_text: String,
    pub href: Option<String>,
    pub annotations: Annotations,
}

impl RichText {
    /// Plain segment with no styling, mostly useful for building fixtures
    pub fn plain(text: &str) -> Self {
        Self {
            kind: "text".to_string(),
            plain_text: text.to_string(),
            ..Default::default()
        }
    }
}

/// Concatenate the plain text of every segment
pub fn plain_text(segments: &[RichText]) -> String {
    segments.iter().map(|s| s.plain_text.as_str()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// A content block from a page body
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    pub id: String,
    pub has_children: bool,
    pub content: BlockContent,
}

impl Block {
    /// Block type name as used by the API ("paragraph", "heading_1", ...)
    pub fn type_name(&self) -> &str {
        self.content.type_name()
    }
}

/// Wire shape of a block: the payload lives under a key named after its type
#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payloads: HashMap<String, serde_json::Value>,
}

impl From<RawBlock> for Block {
    fn from(mut raw: RawBlock) -> Self {
        let payload = raw
            .payloads
            .remove(&raw.kind)
            .unwrap_or(serde_json::Value::Null);
        Self {
            id: raw.id,
            has_children: raw.has_children,
            content: BlockContent::decode(&raw.kind, payload),
        }
    }
}

/// Typed block payloads
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Paragraph(TextPayload),
    Heading1(TextPayload),
    Heading2(TextPayload),
    Heading3(TextPayload),
    BulletedListItem(TextPayload),
    NumberedListItem(TextPayload),
    ToDo(ToDoPayload),
    Quote(TextPayload),
    Callout(CalloutPayload),
    Toggle(TextPayload),
    Code(CodePayload),
    Divider,
    Image(MediaPayload),
    Bookmark(LinkPayload),
    Embed(LinkPayload),
    Equation(EquationPayload),
    ChildPage(ChildPagePayload),
    /// Block type we do not render (or whose payload failed to decode)
    Unsupported(String),
}

impl BlockContent {
    fn decode(kind: &str, payload: serde_json::Value) -> Self {
        fn from<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Option<T> {
            serde_json::from_value(value).ok()
        }

        let decoded = match kind {
            "paragraph" => from(payload).map(BlockContent::Paragraph),
            "heading_1" => from(payload).map(BlockContent::Heading1),
            "heading_2" => from(payload).map(BlockContent::Heading2),
            "heading_3" => from(payload).map(BlockContent::Heading3),
            "bulleted_list_item" => from(payload).map(BlockContent::BulletedListItem),
            "numbered_list_item" => from(payload).map(BlockContent::NumberedListItem),
            "to_do" => from(payload).map(BlockContent::ToDo),
            "quote" => from(payload).map(BlockContent::Quote),
            "callout" => from(payload).map(BlockContent::Callout),
            "toggle" => from(payload).map(BlockContent::Toggle),
            "code" => from(payload).map(BlockContent::Code),
            "divider" => Some(BlockContent::Divider),
            "image" => from(payload).map(BlockContent::Image),
            "bookmark" => from(payload).map(BlockContent::Bookmark),
            "embed" => from(payload).map(BlockContent::Embed),
            "equation" => from(payload).map(BlockContent::Equation),
            "child_page" => from(payload).map(BlockContent::ChildPage),
            _ => None,
        };

        decoded.unwrap_or_else(|| BlockContent::Unsupported(kind.to_string()))
    }

    /// Block type name as used by the API
    pub fn type_name(&self) -> &str {
        match self {
            BlockContent::Paragraph(_) => "paragraph",
            BlockContent::Heading1(_) => "heading_1",
            BlockContent::Heading2(_) => "heading_2",
            BlockContent::Heading3(_) => "heading_3",
            BlockContent::BulletedListItem(_) => "bulleted_list_item",
            BlockContent::NumberedListItem(_) => "numbered_list_item",
            BlockContent::ToDo(_) => "to_do",
            BlockContent::Quote(_) => "quote",
            BlockContent::Callout(_) => "callout",
            BlockContent::Toggle(_) => "toggle",
            BlockContent::Code(_) => "code",
            BlockContent::Divider => "divider",
            BlockContent::Image(_) => "image",
            BlockContent::Bookmark(_) => "bookmark",
            BlockContent::Embed(_) => "embed",
            BlockContent::Equation(_) => "equation",
            BlockContent::ChildPage(_) => "child_page",
            BlockContent::Unsupported(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextPayload {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToDoPayload {
    pub rich_text: Vec<RichText>,
    pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalloutPayload {
    pub rich_text: Vec<RichText>,
    pub icon: Option<Icon>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Icon {
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CodePayload {
    pub rich_text: Vec<RichText>,
    pub language: Option<String>,
    pub caption: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MediaPayload {
    pub file: Option<FileUrl>,
    pub external: Option<FileUrl>,
    pub caption: Vec<RichText>,
}

impl MediaPayload {
    pub fn url(&self) -> Option<&str> {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkPayload {
    pub url: String,
    pub caption: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EquationPayload {
    pub expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChildPagePayload {
    pub title: String,
}

/// One page of a paginated list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedList<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Body of a database query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<PropertyFilter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl QueryRequest {
    pub fn filtered(filter: PropertyFilter) -> Self {
        Self {
            filter: Some(filter),
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Equality filter on a single property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    #[serde(flatten)]
    pub condition: FilterCondition,
}

impl PropertyFilter {
    pub fn status_equals(property: &str, value: &str) -> Self {
        Self {
            property: property.to_string(),
            condition: FilterCondition::Status(TextCondition::equals(value)),
        }
    }

    pub fn formula_string_equals(property: &str, value: &str) -> Self {
        Self {
            property: property.to_string(),
            condition: FilterCondition::Formula(FormulaCondition {
                string: TextCondition::equals(value),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    Status(TextCondition),
    Formula(FormulaCondition),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextCondition {
    pub equals: String,
}

impl TextCondition {
    fn equals(value: &str) -> Self {
        Self {
            equals: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaCondition {
    pub string: TextCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sort {
    pub property: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn descending(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_page_properties() {
        let page: Page = serde_json::from_value(json!({
            "object": "page",
            "id": "abc",
            "properties": {
                "Title": {"id": "title", "type": "title", "title": [{"type": "text", "plain_text": "Hello"}]},
                "Slug": {"id": "s", "type": "formula", "formula": {"type": "string", "string": "hello"}},
                "PublishedDate": {"id": "d", "type": "date", "date": {"start": "2024-01-15"}},
                "Status": {"id": "st", "type": "status", "status": {"name": "Published"}}
            }
        }))
        .unwrap();

        assert_eq!(page.id, "abc");
        assert!(matches!(
            page.property("Slug"),
            Some(PropertyValue::Formula { formula: Some(FormulaValue::String { string: Some(s) }) }) if s == "hello"
        ));
        assert!(matches!(
            page.property("Status"),
            Some(PropertyValue::Status { status: Some(s) }) if s.name == "Published"
        ));
    }

    #[test]
    fn test_page_parent_and_ids() {
        let page: Page = serde_json::from_value(json!({
            "id": "0b8c5f3e-1d2a-4c3b-9e8f-7a6b5c4d3e2f",
            "parent": {"type": "database_id", "database_id": "AAAAAAAA-bbbb-cccc-dddd-eeeeeeeeeeee"},
            "properties": {}
        }))
        .unwrap();

        assert!(page.belongs_to("aaaaaaaabbbbccccddddeeeeeeeeeeee"));
        assert!(!page.belongs_to("ffffffffbbbbccccddddeeeeeeeeeeee"));
        assert!(!page.archived);
        assert!(looks_like_id(&page.id));
        assert!(looks_like_id("0b8c5f3e1d2a4c3b9e8f7a6b5c4d3e2f"));
        assert!(!looks_like_id("hello-world"));
    }

    #[test]
    fn test_malformed_property_becomes_other() {
        let page: Page = serde_json::from_value(json!({
            "id": "abc",
            "properties": {
                "CoverImage": {"files": []},
                "Title": {"type": "title", "title": "not a list"},
                "Rollup": {"type": "rollup", "rollup": {}}
            }
        }))
        .unwrap();

        assert_eq!(page.property("CoverImage"), Some(&PropertyValue::Other));
        assert_eq!(page.property("Title"), Some(&PropertyValue::Other));
        assert_eq!(page.property("Rollup"), Some(&PropertyValue::Other));
    }

    #[test]
    fn test_decode_blocks() {
        let list: PaginatedList<Block> = serde_json::from_value(json!({
            "object": "list",
            "results": [
                {"id": "1", "type": "heading_2", "has_children": false,
                 "heading_2": {"rich_text": [{"type": "text", "plain_text": "Intro"}]}},
                {"id": "2", "type": "image", "has_children": false,
                 "image": {"type": "external", "external": {"url": "https://x/y.png"}, "caption": []}},
                {"id": "3", "type": "synced_block", "has_children": true, "synced_block": {}}
            ],
            "has_more": true,
            "next_cursor": "cur"
        }))
        .unwrap();

        assert_eq!(list.results.len(), 3);
        assert_eq!(list.results[0].type_name(), "heading_2");
        match &list.results[1].content {
            BlockContent::Image(media) => assert_eq!(media.url(), Some("https://x/y.png")),
            other => panic!("unexpected block {:?}", other),
        }
        assert_eq!(
            list.results[2].content,
            BlockContent::Unsupported("synced_block".to_string())
        );
        assert!(list.has_more);
        assert_eq!(list.next_cursor.as_deref(), Some("cur"));
    }

    #[test]
    fn test_serialize_query() {
        let request = QueryRequest::filtered(PropertyFilter::status_equals("Status", "Published"))
            .sorted_by(Sort::descending("PublishedDate"));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "filter": {"property": "Status", "status": {"equals": "Published"}},
                "sorts": [{"property": "PublishedDate", "direction": "descending"}]
            })
        );

        let request = QueryRequest::filtered(PropertyFilter::formula_string_equals("Slug", "a"));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"filter": {"property": "Slug", "formula": {"string": {"equals": "a"}}}})
        );
    }
}
