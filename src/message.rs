use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A webhook message, shaped the way Discord's "Execute Webhook" endpoint expects it.
///
/// Absent values are left out of the payload entirely rather than sent as `null`,
/// and an empty embed list is dropped too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<EmbedSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl MessageSpec {
    pub fn text(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: &str) -> Self {
        self.avatar_url = Some(avatar_url.to_string());
        self
    }

    pub fn with_embed(mut self, embed: EmbedSpec) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Discord refuses a message with nothing to show.
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty) && self.embeds.is_empty()
    }

    /// Reads a message from JSON5, which allows comments and trailing commas.
    pub fn from_json5(source: &str) -> anyhow::Result<Self> {
        Ok(serde_json5::from_str(source)?)
    }

    pub fn to_payload(&self) -> String {
        // Every field is a string, number, bool or timestamp and every key is a
        // plain field name, so encoding cannot fail.
        serde_json::to_string(self).expect("message payload is always encodable")
    }
}

impl EmbedSpec {
    pub fn new(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: &str, value: &str, inline: bool) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            value: value.to_string(),
            inline,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn payload_value(message: &MessageSpec) -> Value {
        serde_json::from_str(&message.to_payload()).unwrap()
    }

    #[test]
    fn test_content_only_message_omits_other_keys() {
        let payload = payload_value(&MessageSpec::text("hello there"));

        assert_eq!(payload, json!({ "content": "hello there" }));
    }

    #[test]
    fn test_embed_only_message_omits_content() {
        let message = MessageSpec::default().with_embed(EmbedSpec::new("Build finished"));

        let payload = payload_value(&message);

        assert!(payload.get("content").is_none());
        assert_eq!(payload["embeds"][0]["title"], "Build finished");
    }

    #[test]
    fn test_overrides_are_included_when_set() {
        let message = MessageSpec::text("hi")
            .with_username("My Bot")
            .with_avatar_url("https://example.com/avatar.png");

        let payload = payload_value(&message);

        assert_eq!(payload["username"], "My Bot");
        assert_eq!(payload["avatar_url"], "https://example.com/avatar.png");
        assert!(payload.get("embeds").is_none());
    }

    #[test]
    fn test_field_order_is_preserved() {
        let embed = EmbedSpec::new("Fields")
            .with_field("b", "2", true)
            .with_field("a", "1", false)
            .with_field("b", "2", true);

        let payload = payload_value(&MessageSpec::default().with_embed(embed));

        assert_eq!(
            payload["embeds"][0]["fields"],
            json!([
                { "name": "b", "value": "2", "inline": true },
                { "name": "a", "value": "1", "inline": false },
                { "name": "b", "value": "2", "inline": true },
            ])
        );
    }

    #[test]
    fn test_full_embed_matches_discord_schema() {
        let embed = EmbedSpec {
            title: Some("Embed Title".to_string()),
            description: Some("This is an example of an embed description.".to_string()),
            url: Some("https://example.com".to_string()),
            color: Some(5814783),
            footer: Some(Footer {
                text: "Footer Text".to_string(),
                icon_url: Some("https://example.com/footer-icon.png".to_string()),
            }),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0),
            author: Some(Author {
                name: "Author Name".to_string(),
                url: Some("https://example.com/author".to_string()),
                icon_url: Some("https://example.com/author-icon.png".to_string()),
            }),
            fields: vec![FieldSpec {
                name: "Field Name 1".to_string(),
                value: "Field Value 1".to_string(),
                inline: true,
            }],
        };

        let payload = payload_value(&MessageSpec::default().with_embed(embed));

        assert_eq!(
            payload["embeds"][0],
            json!({
                "title": "Embed Title",
                "description": "This is an example of an embed description.",
                "url": "https://example.com",
                "color": 5814783,
                "footer": { "text": "Footer Text", "icon_url": "https://example.com/footer-icon.png" },
                "timestamp": "2023-11-14T22:13:20Z",
                "author": {
                    "name": "Author Name",
                    "url": "https://example.com/author",
                    "icon_url": "https://example.com/author-icon.png"
                },
                "fields": [{ "name": "Field Name 1", "value": "Field Value 1", "inline": true }]
            })
        );
    }

    #[test]
    fn test_empty_message_encodes_as_empty_object() {
        assert_eq!(MessageSpec::default().to_payload(), "{}");
    }

    #[test]
    fn test_empty_message_detection() {
        assert!(MessageSpec::default().is_empty());
        assert!(MessageSpec::text("").is_empty());
        assert!(!MessageSpec::text("x").is_empty());
        assert!(!MessageSpec::default().with_embed(EmbedSpec::default()).is_empty());
    }

    #[test]
    fn test_parses_json5_message_file() {
        let source = r#"{
            // Comments and trailing commas are fine
            content: 'Deploy done',
            embeds: [
                { title: 'Deploy', fields: [{ name: 'env', value: 'prod' }] },
            ],
        }"#;

        let message = MessageSpec::from_json5(source).unwrap();

        assert_eq!(message.content.as_deref(), Some("Deploy done"));
        assert_eq!(message.embeds[0].fields[0].name, "env");
        assert!(!message.embeds[0].fields[0].inline);
    }
}
