//! Legacy oEmbed output tests
//!
//! Verify the single-record reduction precedence and the XML round trip.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;

use embedkit::fetch::{PageData, StaticFetcher};
use embedkit::meta::MetaMapping;
use embedkit::whitelist::StaticWhitelist;
use embedkit::{
    DiscoveryEngine, DiscoveryOptions, Oembed, OembedType, PluginRegistry,
};

fn discover(meta: serde_json::Value) -> (Url, embedkit::AggregatedResult, MetaMapping) {
    let page = PageData {
        meta: meta.clone(),
        oembed: None,
    };
    let engine = DiscoveryEngine::new(
        PluginRegistry::with_defaults(),
        StaticFetcher::new().with_fallback(page),
        StaticWhitelist::new(),
    );
    let uri = Url::parse("http://example.com/page").unwrap();
    let result = tokio_test::block_on(
        engine.discover("http://example.com/page", DiscoveryOptions::default()),
    )
    .unwrap();
    let mapping = MetaMapping::normalize(&meta, None);
    (uri, result, mapping)
}

/// Pull `<tag>text</tag>` back out of the serialized XML.
fn xml_field<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

#[test]
fn player_link_round_trips_through_xml() {
    let (uri, result, mapping) = discover(json!({
        "og": {
            "title": "A clip",
            "video": {"url": "http://v/1", "type": "video/mp4", "width": 640, "height": 480},
        }
    }));

    let oembed = Oembed::from_result(&uri, &result, Some(&mapping));
    assert_eq!(oembed.oembed_type, OembedType::Video);
    assert_eq!(oembed.width, Some(640));
    assert_eq!(oembed.height, Some(480));
    assert_eq!(oembed.title.as_deref(), Some("A clip"));

    let xml = oembed.to_xml().unwrap();
    assert_eq!(xml_field(&xml, "type"), Some("video"));
    assert_eq!(xml_field(&xml, "version"), Some("1.0"));
    assert_eq!(xml_field(&xml, "title"), Some("A clip"));
    // Numeric fields survive modulo string coercion.
    assert_eq!(xml_field(&xml, "width"), Some("640"));
    assert_eq!(xml_field(&xml, "height"), Some("480"));
}

#[test]
fn image_only_page_becomes_photo() {
    let (uri, result, mapping) = discover(json!({
        "og": {"image": {"url": "http://i/1.jpg", "width": 1024, "height": 768}}
    }));

    let oembed = Oembed::from_result(&uri, &result, Some(&mapping));
    assert_eq!(oembed.oembed_type, OembedType::Photo);
    assert_eq!(oembed.url.as_deref(), Some("http://i/1.jpg"));
    assert_eq!(oembed.width, Some(1024));
    assert!(oembed.html.is_none());
}

#[test]
fn bare_page_becomes_link_record() {
    let (uri, result, mapping) = discover(json!({"title": "Just a page"}));

    let oembed = Oembed::from_result(&uri, &result, Some(&mapping));
    assert_eq!(oembed.oembed_type, OembedType::Link);
    assert_eq!(oembed.url.as_deref(), Some("http://example.com/page"));
    assert_eq!(oembed.title.as_deref(), Some("Just a page"));
    assert!(oembed.width.is_none());
    assert!(oembed.height.is_none());

    let xml = oembed.to_xml().unwrap();
    assert!(xml_field(&xml, "width").is_none());
    assert!(xml_field(&xml, "html").is_none());
}

#[test]
fn provider_name_comes_from_site_name() {
    let (uri, result, mapping) = discover(json!({
        "og": {"site_name": "Example Video", "video": "http://v/1"}
    }));

    let oembed = Oembed::from_result(&uri, &result, Some(&mapping));
    assert_eq!(oembed.provider_name.as_deref(), Some("Example Video"));
}

#[test]
fn xml_escapes_markup_in_title() {
    let (uri, result, mapping) = discover(json!({
        "og": {"title": "<b>bold & bad</b>", "video": "http://v/1"}
    }));

    let xml = Oembed::from_result(&uri, &result, Some(&mapping))
        .to_xml()
        .unwrap();
    assert!(xml.contains("&lt;b&gt;bold &amp; bad&lt;/b&gt;"));
    assert!(!xml.contains("<b>bold"));
}
