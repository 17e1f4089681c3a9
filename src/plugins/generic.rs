//! Generic fallback extractors
//!
//! Domain-agnostic plugins that read only the normalized meta mapping.
//! They always run, after (or mixed with) any domain-specific matches, and
//! overlapping contributions are merged by the aggregator rather than
//! skipped.

use serde_json::Value;

use super::{LinkCandidate, Plugin, PluginContext, Rel, TEXT_HTML};
use crate::error::Result;
use crate::meta::{scalar, Source};

/// MIME class used for image links without a declared type.
const IMAGE: &str = "image";

/// Pixel dimension out of a raw meta node (number or numeric string).
fn dim(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Plain string at a path, without scalar object resolution.
fn str_at<'a>(ctx: &'a PluginContext<'_>, source: Source, path: &str) -> Option<&'a str> {
    ctx.meta.get(source, path).and_then(Value::as_str)
}

/// `og:video` extractor.
///
/// Emits one candidate for the primary URL and one for `secure_url`; the
/// second candidate is emitted even when `secure_url` is absent and relies
/// on the aggregator to drop it.
pub struct OgVideo;

impl Plugin for OgVideo {
    fn name(&self) -> &'static str {
        "og-video"
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        let Some(video) = ctx.meta.get(Source::Og, "video") else {
            return Ok(vec![]);
        };
        if video.is_null() {
            return Ok(vec![]);
        }

        let media_type = str_at(ctx, Source::Og, "video.type")
            .unwrap_or(TEXT_HTML)
            .to_string();
        let width = dim(ctx.meta.get(Source::Og, "video.width"));
        let height = dim(ctx.meta.get(Source::Og, "video.height"));

        Ok(vec![
            LinkCandidate {
                href: scalar(video),
                media_type: Some(media_type.clone()),
                rel: vec![Rel::Player, Rel::Og],
                width,
                height,
                media: None,
            },
            LinkCandidate {
                href: str_at(ctx, Source::Og, "video.secure_url").map(str::to_string),
                media_type: Some(media_type),
                rel: vec![Rel::Player, Rel::Og],
                width,
                height,
                media: None,
            },
        ])
    }
}

/// `og:image` extractor, same two-candidate shape as `og:video`.
pub struct OgImage;

impl Plugin for OgImage {
    fn name(&self) -> &'static str {
        "og-image"
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        let Some(image) = ctx.meta.get(Source::Og, "image") else {
            return Ok(vec![]);
        };
        if image.is_null() {
            return Ok(vec![]);
        }

        let media_type = str_at(ctx, Source::Og, "image.type")
            .unwrap_or(IMAGE)
            .to_string();
        let width = dim(ctx.meta.get(Source::Og, "image.width"));
        let height = dim(ctx.meta.get(Source::Og, "image.height"));

        Ok(vec![
            LinkCandidate {
                href: scalar(image),
                media_type: Some(media_type.clone()),
                rel: vec![Rel::Image, Rel::Og],
                width,
                height,
                media: None,
            },
            LinkCandidate {
                href: str_at(ctx, Source::Og, "image.secure_url").map(str::to_string),
                media_type: Some(media_type),
                rel: vec![Rel::Image, Rel::Og],
                width,
                height,
                media: None,
            },
        ])
    }
}

/// `twitter:player` extractor.
pub struct TwitterPlayer;

impl Plugin for TwitterPlayer {
    fn name(&self) -> &'static str {
        "twitter-player"
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        let Some(player) = ctx.meta.get(Source::Twitter, "player") else {
            return Ok(vec![]);
        };
        let Some(href) = scalar(player) else {
            return Ok(vec![]);
        };

        Ok(vec![LinkCandidate {
            href: Some(href),
            media_type: Some(TEXT_HTML.to_string()),
            rel: vec![Rel::Player, Rel::Twitter],
            width: dim(ctx.meta.get(Source::Twitter, "player.width")),
            height: dim(ctx.meta.get(Source::Twitter, "player.height")),
            media: None,
        }])
    }
}

/// `twitter:image` extractor.
pub struct TwitterImage;

impl Plugin for TwitterImage {
    fn name(&self) -> &'static str {
        "twitter-image"
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        let Some(image) = ctx.meta.get(Source::Twitter, "image") else {
            return Ok(vec![]);
        };
        let Some(href) = scalar(image) else {
            return Ok(vec![]);
        };

        Ok(vec![LinkCandidate {
            href: Some(href),
            media_type: Some(IMAGE.to_string()),
            rel: vec![Rel::Image, Rel::Twitter],
            width: dim(ctx.meta.get(Source::Twitter, "image.width")),
            height: dim(ctx.meta.get(Source::Twitter, "image.height")),
            media: None,
        }])
    }
}

/// Photo-type source oEmbed extractor.
pub struct OembedPhoto;

impl Plugin for OembedPhoto {
    fn name(&self) -> &'static str {
        "oembed-photo"
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        if str_at(ctx, Source::Oembed, "type") != Some("photo") {
            return Ok(vec![]);
        }

        Ok(vec![LinkCandidate {
            href: str_at(ctx, Source::Oembed, "url").map(str::to_string),
            media_type: Some(IMAGE.to_string()),
            rel: vec![Rel::Image, Rel::Oembed],
            width: dim(ctx.meta.get(Source::Oembed, "width")),
            height: dim(ctx.meta.get(Source::Oembed, "height")),
            media: None,
        }])
    }
}

/// Source oEmbed thumbnail extractor.
pub struct OembedThumbnail;

impl Plugin for OembedThumbnail {
    fn name(&self) -> &'static str {
        "oembed-thumbnail"
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        let Some(href) = str_at(ctx, Source::Oembed, "thumbnail_url") else {
            return Ok(vec![]);
        };

        Ok(vec![LinkCandidate {
            href: Some(href.to_string()),
            media_type: Some(IMAGE.to_string()),
            rel: vec![Rel::Thumbnail, Rel::Image, Rel::Oembed],
            width: dim(ctx.meta.get(Source::Oembed, "thumbnail_width")),
            height: dim(ctx.meta.get(Source::Oembed, "thumbnail_height")),
            media: None,
        }])
    }
}

/// Favicon extractor from the generic meta tree.
pub struct Favicon;

impl Plugin for Favicon {
    fn name(&self) -> &'static str {
        "favicon"
    }

    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>> {
        let Some(href) = ctx.meta.get_str(Source::Meta, "favicon") else {
            return Ok(vec![]);
        };

        Ok(vec![LinkCandidate {
            href: Some(href),
            media_type: Some(IMAGE.to_string()),
            rel: vec![Rel::Icon],
            width: None,
            height: None,
            media: None,
        }])
    }
}

/// The built-in generic plugin set, in registration order.
pub fn default_plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(OgVideo),
        Box::new(OgImage),
        Box::new(TwitterPlayer),
        Box::new(TwitterImage),
        Box::new(OembedPhoto),
        Box::new(OembedThumbnail),
        Box::new(Favicon),
    ]
}
