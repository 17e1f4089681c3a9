//! Legacy oEmbed output
//!
//! Reduces the multi-link discovery payload to the singular-embed oEmbed
//! contract: exactly one record, typed photo/video/rich/link by the best
//! representative link. Also serializes records to the legacy XML envelope
//! and the routing table to JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::meta::MetaMapping;
use crate::pipeline::AggregatedResult;
use crate::plugins::{Link, Rel, RoutingRule};

/// oEmbed type classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OembedType {
    /// Static image representation
    Photo,
    /// Playable video representation
    Video,
    /// Generic embeddable HTML
    Rich,
    /// No embeddable body
    Link,
}

/// A legacy single-object oEmbed record.
///
/// Optional fields are present-or-omitted; absent dimensions are never
/// emitted as null or zero placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Oembed {
    /// oEmbed type class
    #[serde(rename = "type")]
    pub oembed_type: OembedType,
    /// Format version, always `1.0`
    pub version: String,
    /// Page title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Providing site name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// Photo source or target URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Embeddable body for video/rich records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Pixel width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Oembed {
    /// Reduce an aggregated result to the best single oEmbed record.
    ///
    /// A player-relation link wins as `video`; absent that, an
    /// image-relation link wins as `photo`; absent both, the record falls
    /// back to `link` with no embeddable body. Title and provider come from
    /// the canonical meta when supplied.
    pub fn from_result(uri: &Url, result: &AggregatedResult, meta: Option<&MetaMapping>) -> Self {
        let links = result.links.iter_unique();
        let title = meta
            .and_then(|m| m.attribute("title"))
            .map(str::to_string);
        let provider_name = meta
            .and_then(|m| m.attribute("site_name"))
            .map(str::to_string);

        if let Some(player) = links.iter().find(|l| l.has_rel(Rel::Player)) {
            return Self {
                oembed_type: OembedType::Video,
                version: "1.0".to_string(),
                title,
                provider_name,
                url: None,
                html: Some(player_html(player)),
                width: player.width,
                height: player.height,
            };
        }

        if let Some(image) = links.iter().find(|l| l.has_rel(Rel::Image)) {
            return Self {
                oembed_type: OembedType::Photo,
                version: "1.0".to_string(),
                title,
                provider_name,
                url: Some(image.href.clone()),
                html: None,
                width: image.width,
                height: image.height,
            };
        }

        Self {
            oembed_type: OembedType::Link,
            version: "1.0".to_string(),
            title,
            provider_name,
            url: Some(uri.to_string()),
            html: None,
            width: None,
            height: None,
        }
    }

    /// Serialize to the legacy XML envelope.
    ///
    /// Every text value is escaped; absent fields are omitted entirely.
    pub fn to_xml(&self) -> Result<String> {
        let record = serde_json::to_value(self)?;
        let mut out =
            String::from("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>\n<oembed>");
        if let Value::Object(fields) = record {
            for (name, value) in fields {
                let text = match value {
                    Value::String(s) => htmlescape::encode_minimal(&s),
                    Value::Number(n) => n.to_string(),
                    _ => continue,
                };
                out.push_str(&format!("<{name}>{text}</{name}>"));
            }
        }
        out.push_str("</oembed>");
        Ok(out)
    }
}

/// Minimal embeddable body for a player link.
fn player_html(player: &Link) -> String {
    let src = htmlescape::encode_attribute(&player.href);
    match (player.width, player.height) {
        (Some(w), Some(h)) => format!(
            "<iframe src=\"{src}\" width=\"{w}\" height=\"{h}\" frameborder=\"0\" allowfullscreen></iframe>"
        ),
        _ => format!("<iframe src=\"{src}\" frameborder=\"0\" allowfullscreen></iframe>"),
    }
}

/// Serialize a routing table export to JSON.
pub fn routing_table_json(rules: &[RoutingRule]) -> Result<String> {
    Ok(serde_json::to_string(rules)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{LinkAggregator, Links};
    use crate::plugins::LinkCandidate;

    fn result_with(candidates: Vec<LinkCandidate>) -> AggregatedResult {
        AggregatedResult {
            links: LinkAggregator::aggregate(candidates, false),
            ..Default::default()
        }
    }

    fn player_candidate() -> LinkCandidate {
        LinkCandidate {
            href: Some("http://v/player".to_string()),
            media_type: Some("text/html".to_string()),
            rel: vec![Rel::Player],
            width: Some(640),
            height: Some(480),
            media: None,
        }
    }

    #[test]
    fn test_player_wins_as_video() {
        let uri = Url::parse("http://example.com/page").unwrap();
        let result = result_with(vec![
            player_candidate(),
            LinkCandidate {
                href: Some("http://v/img".to_string()),
                rel: vec![Rel::Image],
                ..Default::default()
            },
        ]);
        let oembed = Oembed::from_result(&uri, &result, None);
        assert_eq!(oembed.oembed_type, OembedType::Video);
        assert_eq!(oembed.width, Some(640));
        assert_eq!(oembed.height, Some(480));
        assert!(oembed.html.as_deref().unwrap().contains("http://v/player"));
    }

    #[test]
    fn test_image_wins_as_photo_without_player() {
        let uri = Url::parse("http://example.com/page").unwrap();
        let result = result_with(vec![LinkCandidate {
            href: Some("http://v/img".to_string()),
            media_type: Some("image".to_string()),
            rel: vec![Rel::Image, Rel::Og],
            width: Some(1024),
            height: Some(768),
            media: None,
        }]);
        let oembed = Oembed::from_result(&uri, &result, None);
        assert_eq!(oembed.oembed_type, OembedType::Photo);
        assert_eq!(oembed.url.as_deref(), Some("http://v/img"));
        assert!(oembed.html.is_none());
    }

    #[test]
    fn test_fallback_is_link_with_no_body() {
        let uri = Url::parse("http://example.com/page").unwrap();
        let result = result_with(vec![]);
        let oembed = Oembed::from_result(&uri, &result, None);
        assert_eq!(oembed.oembed_type, OembedType::Link);
        assert_eq!(oembed.url.as_deref(), Some("http://example.com/page"));
        assert!(oembed.html.is_none());
        assert!(oembed.width.is_none());
    }

    #[test]
    fn test_xml_escapes_text_and_omits_absent_fields() {
        let oembed = Oembed {
            oembed_type: OembedType::Link,
            version: "1.0".to_string(),
            title: Some("Fish & <Chips>".to_string()),
            provider_name: None,
            url: Some("http://example.com/?a=1&b=2".to_string()),
            html: None,
            width: None,
            height: None,
        };
        let xml = oembed.to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("<type>link</type>"));
        assert!(xml.contains("<title>Fish &amp; &lt;Chips&gt;</title>"));
        assert!(xml.contains("&amp;b=2"));
        assert!(!xml.contains("<width>"));
        assert!(!xml.contains("<html>"));
    }

    #[test]
    fn test_grouped_result_still_reduces() {
        let uri = Url::parse("http://example.com/page").unwrap();
        let result = AggregatedResult {
            links: LinkAggregator::aggregate(vec![player_candidate()], true),
            ..Default::default()
        };
        assert!(matches!(result.links, Links::Grouped(_)));
        let oembed = Oembed::from_result(&uri, &result, None);
        assert_eq!(oembed.oembed_type, OembedType::Video);
    }

    #[test]
    fn test_routing_table_json() {
        let rules = vec![RoutingRule {
            source: "example\\.com".to_string(),
            flags: String::new(),
        }];
        let json = routing_table_json(&rules).unwrap();
        assert_eq!(json, r#"[{"source":"example\\.com","flags":""}]"#);
    }
}
