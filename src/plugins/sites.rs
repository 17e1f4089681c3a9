//! Domain-specific extraction rules
//!
//! Hand-written per-site plugins. Pattern-routed rules run for any URI one
//! of their expressions matches; domain-routed rules run on a host suffix
//! match. Both kinds may consult the target URI in addition to the meta
//! mapping.

use regex::Regex;
use serde_json::json;

use super::{LinkCandidate, Plugin, PluginContext, Rel, TEXT_HTML};
use crate::error::Result;
use crate::meta::Source;

/// YouTube watch pages and short links.
pub struct YouTube {
    patterns: Vec<Regex>,
}

impl YouTube {
    /// Compile the routing patterns. Called once at registry construction.
    pub fn new() -> Self {
        Self {
            patterns: vec![
                Regex::new(r"(?i)youtube\.com/watch").expect("static pattern"),
                Regex::new(r"(?i)youtu\.be/([\w-]+)").expect("static pattern"),
            ],
        }
    }

    fn video_id(ctx: &PluginContext<'_>) -> Option<String> {
        if let Some((_, id)) = ctx.uri.query_pairs().find(|(key, _)| key == "v") {
            return Some(id.into_owned());
        }
        // Short-link form: the id is the first path segment.
        if ctx.uri.host_str() == Some("youtu.be") {
            return ctx
                .uri
                .path_segments()
                .and_then(|mut segments| segments.next())
                .filter(|id| !id.is_empty())
                .map(str::to_string);
        }
        None
    }
}

impl Default for YouTube {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for YouTube {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn domain(&self) -> Option<&str> {
        Some("youtube.com")
    }

    fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        let Some(id) = Self::video_id(ctx) else {
            return Ok(vec![]);
        };

        Ok(vec![
            LinkCandidate {
                href: Some(format!("https://www.youtube.com/embed/{id}")),
                media_type: Some(TEXT_HTML.to_string()),
                rel: vec![Rel::Player],
                width: None,
                height: None,
                media: Some(json!({"aspect-ratio": 16.0 / 9.0})),
            },
            LinkCandidate {
                href: Some(format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg")),
                media_type: Some("image/jpeg".to_string()),
                rel: vec![Rel::Thumbnail, Rel::Image],
                width: Some(480),
                height: Some(360),
                media: None,
            },
        ])
    }
}

/// Vimeo pages: prefer the secure Open Graph player URL.
pub struct Vimeo;

impl Plugin for Vimeo {
    fn name(&self) -> &'static str {
        "vimeo"
    }

    fn domain(&self) -> Option<&str> {
        Some("vimeo.com")
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        let href = ctx
            .meta
            .get(Source::Og, "video.secure_url")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .or_else(|| ctx.meta.get_str(Source::Og, "video"));
        let Some(href) = href else {
            return Ok(vec![]);
        };

        let width = ctx
            .meta
            .get(Source::Og, "video.width")
            .and_then(serde_json::Value::as_u64);
        let height = ctx
            .meta
            .get(Source::Og, "video.height")
            .and_then(serde_json::Value::as_u64);

        Ok(vec![LinkCandidate {
            href: Some(href),
            media_type: Some(TEXT_HTML.to_string()),
            rel: vec![Rel::Player, Rel::Og],
            width: width.and_then(|w| u32::try_from(w).ok()),
            height: height.and_then(|h| u32::try_from(h).ok()),
            media: None,
        }])
    }
}

/// Medium articles: offer the canonical URL as a readable rendition.
pub struct MediumReader;

impl Plugin for MediumReader {
    fn name(&self) -> &'static str {
        "medium-reader"
    }

    fn domain(&self) -> Option<&str> {
        Some("medium.com")
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        let href = ctx
            .meta
            .attribute("canonical")
            .map(str::to_string)
            .unwrap_or_else(|| ctx.uri.to_string());

        Ok(vec![LinkCandidate {
            href: Some(href),
            media_type: Some(TEXT_HTML.to_string()),
            rel: vec![Rel::Reader],
            width: None,
            height: None,
            media: None,
        }])
    }
}

/// The built-in domain plugin set, in registration order.
pub fn default_plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(YouTube::new()),
        Box::new(Vimeo),
        Box::new(MediumReader),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::MetaMapping;
    use serde_json::json;
    use url::Url;

    fn ctx_parts(uri: &str, meta: serde_json::Value) -> (Url, MetaMapping) {
        let uri = Url::parse(uri).unwrap();
        let mapping = MetaMapping::normalize(&meta, None);
        (uri, mapping)
    }

    #[test]
    fn test_youtube_watch_uri() {
        let (uri, meta) = ctx_parts("https://www.youtube.com/watch?v=dQw4w9WgXcQ", json!({}));
        let links = YouTube::new()
            .links(&PluginContext { uri: &uri, meta: &meta })
            .unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0].href.as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(links[0].rel, vec![Rel::Player]);
        assert!(links[0].media.is_some());
        assert_eq!(
            links[1].href.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
    }

    #[test]
    fn test_youtube_short_link() {
        let (uri, meta) = ctx_parts("https://youtu.be/dQw4w9WgXcQ", json!({}));
        let links = YouTube::new()
            .links(&PluginContext { uri: &uri, meta: &meta })
            .unwrap();
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_youtube_no_id() {
        let (uri, meta) = ctx_parts("https://www.youtube.com/feed/subscriptions", json!({}));
        let links = YouTube::new()
            .links(&PluginContext { uri: &uri, meta: &meta })
            .unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_youtube_patterns_match() {
        let yt = YouTube::new();
        assert!(yt
            .patterns()
            .iter()
            .any(|re| re.is_match("https://WWW.YOUTUBE.COM/watch?v=x")));
        assert!(yt.patterns().iter().any(|re| re.is_match("https://youtu.be/x")));
    }

    #[test]
    fn test_vimeo_prefers_secure_url() {
        let (uri, meta) = ctx_parts(
            "https://vimeo.com/123",
            json!({"og": {"video": {
                "url": "http://player.vimeo.com/v/123",
                "secure_url": "https://player.vimeo.com/v/123",
                "width": 1280, "height": 720,
            }}}),
        );
        let links = Vimeo.links(&PluginContext { uri: &uri, meta: &meta }).unwrap();
        assert_eq!(
            links[0].href.as_deref(),
            Some("https://player.vimeo.com/v/123")
        );
        assert_eq!(links[0].width, Some(1280));
    }

    #[test]
    fn test_medium_reader_uses_canonical() {
        let (uri, meta) = ctx_parts(
            "https://medium.com/@a/post-1",
            json!({"og": {"url": "https://medium.com/@a/post-1-canonical"}}),
        );
        let links = MediumReader
            .links(&PluginContext { uri: &uri, meta: &meta })
            .unwrap();
        assert_eq!(
            links[0].href.as_deref(),
            Some("https://medium.com/@a/post-1-canonical")
        );
        assert_eq!(links[0].rel, vec![Rel::Reader]);
    }
}
