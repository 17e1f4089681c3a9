//! Link aggregation
//!
//! Merges the candidate links contributed by all plugins into the final
//! collection: candidates without an `href` are excluded, identical hrefs
//! collapse into one link with their rel sets unioned (first-seen wins for
//! every other field), and the result can be grouped by the fixed relation
//! category list.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::plugins::{Link, LinkCandidate, Rel, TEXT_HTML};

/// Fixed relation categories used for grouping, in output order.
pub const REL_GROUPS: [Rel; 7] = [
    Rel::Player,
    Rel::Image,
    Rel::Thumbnail,
    Rel::Reader,
    Rel::File,
    Rel::Icon,
    Rel::Og,
];

/// Links grouped by relation category.
///
/// Grouping is a covering split, not a partition: a link appears in every
/// category its rel set intersects. Links intersecting none land in
/// `other`. Field order is the fixed category order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedLinks {
    /// Embeddable players
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub player: Vec<Link>,
    /// Representative images
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image: Vec<Link>,
    /// Preview thumbnails
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub thumbnail: Vec<Link>,
    /// Readable renditions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reader: Vec<Link>,
    /// Downloadable files
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file: Vec<Link>,
    /// Site icons
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub icon: Vec<Link>,
    /// Open Graph provenance
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub og: Vec<Link>,
    /// Links outside every known category
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<Link>,
}

impl GroupedLinks {
    fn bucket(&mut self, rel: Rel) -> &mut Vec<Link> {
        match rel {
            Rel::Player => &mut self.player,
            Rel::Image => &mut self.image,
            Rel::Thumbnail => &mut self.thumbnail,
            Rel::Reader => &mut self.reader,
            Rel::File => &mut self.file,
            Rel::Icon => &mut self.icon,
            Rel::Og => &mut self.og,
            _ => &mut self.other,
        }
    }
}

/// Aggregated link collection: flat, or grouped on request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Links {
    /// Flat sequence in contribution order
    Flat(Vec<Link>),
    /// Covering split by relation category
    Grouped(GroupedLinks),
}

impl Default for Links {
    fn default() -> Self {
        Links::Flat(Vec::new())
    }
}

impl Links {
    /// Unique links in first-seen order, regardless of representation.
    pub fn iter_unique(&self) -> Vec<&Link> {
        match self {
            Links::Flat(links) => links.iter().collect(),
            Links::Grouped(groups) => {
                let mut seen: Vec<&Link> = Vec::new();
                let buckets = [
                    &groups.player,
                    &groups.image,
                    &groups.thumbnail,
                    &groups.reader,
                    &groups.file,
                    &groups.icon,
                    &groups.og,
                    &groups.other,
                ];
                for bucket in buckets {
                    for link in bucket.iter() {
                        if !seen.iter().any(|l| l.href == link.href) {
                            seen.push(link);
                        }
                    }
                }
                seen
            }
        }
    }

    /// Total number of unique links.
    pub fn len(&self) -> usize {
        self.iter_unique().len()
    }

    /// Whether no links were discovered (a valid, non-error outcome).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merges and groups plugin candidates.
pub struct LinkAggregator;

impl LinkAggregator {
    /// Merge candidates into the final collection, grouped when requested.
    pub fn aggregate(candidates: Vec<LinkCandidate>, group: bool) -> Links {
        let links = Self::merge(candidates);
        if group {
            Links::Grouped(Self::group(links))
        } else {
            Links::Flat(links)
        }
    }

    /// Drop href-less candidates and collapse duplicates.
    ///
    /// Two candidates are the same underlying offer iff their hrefs are
    /// identical: rel sets are unioned in first-seen order, every other
    /// field keeps the first-seen value.
    pub fn merge(candidates: Vec<LinkCandidate>) -> Vec<Link> {
        let mut links: Vec<Link> = Vec::new();
        let mut by_href: HashMap<String, usize> = HashMap::new();
        let mut dropped = 0usize;

        for candidate in candidates {
            let Some(href) = candidate.href.filter(|h| !h.is_empty()) else {
                dropped += 1;
                continue;
            };

            match by_href.get(&href) {
                Some(&idx) => {
                    let link = &mut links[idx];
                    for rel in candidate.rel {
                        if !link.rel.contains(&rel) {
                            link.rel.push(rel);
                        }
                    }
                }
                None => {
                    let mut rel: Vec<Rel> = Vec::new();
                    for tag in candidate.rel {
                        if !rel.contains(&tag) {
                            rel.push(tag);
                        }
                    }
                    by_href.insert(href.clone(), links.len());
                    links.push(Link {
                        href,
                        media_type: candidate.media_type.unwrap_or_else(|| TEXT_HTML.to_string()),
                        rel,
                        width: candidate.width,
                        height: candidate.height,
                        media: candidate.media,
                    });
                }
            }
        }

        if dropped > 0 {
            debug!(dropped, "excluded candidates without href");
        }
        links
    }

    /// Covering split by the fixed category list.
    pub fn group(links: Vec<Link>) -> GroupedLinks {
        let mut groups = GroupedLinks::default();
        for link in links {
            let categories: Vec<Rel> = REL_GROUPS
                .iter()
                .copied()
                .filter(|rel| link.has_rel(*rel))
                .collect();
            if categories.is_empty() {
                groups.other.push(link);
            } else {
                for rel in categories {
                    groups.bucket(rel).push(link.clone());
                }
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn candidate(href: Option<&str>, rel: Vec<Rel>) -> LinkCandidate {
        LinkCandidate {
            href: href.map(str::to_string),
            rel,
            ..Default::default()
        }
    }

    #[test]
    fn test_candidates_without_href_are_excluded() {
        let links = LinkAggregator::aggregate(vec![candidate(None, vec![Rel::Player])], false);
        assert!(links.is_empty());
    }

    #[test]
    fn test_empty_string_href_is_excluded() {
        let links = LinkAggregator::merge(vec![candidate(Some(""), vec![Rel::Player])]);
        assert!(links.is_empty());
    }

    #[test]
    fn test_dedupe_unions_rel_sets() {
        let links = LinkAggregator::merge(vec![
            candidate(Some("http://x/a"), vec![Rel::Player]),
            candidate(Some("http://x/a"), vec![Rel::Og]),
        ]);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "http://x/a");
        assert_eq!(links[0].rel, vec![Rel::Player, Rel::Og]);
    }

    #[test]
    fn test_dedupe_first_seen_wins_for_other_fields() {
        let first = LinkCandidate {
            href: Some("http://x/a".to_string()),
            media_type: Some("video/mp4".to_string()),
            rel: vec![Rel::Player],
            width: Some(640),
            height: Some(480),
            media: None,
        };
        let second = LinkCandidate {
            href: Some("http://x/a".to_string()),
            media_type: Some("text/html".to_string()),
            rel: vec![Rel::Og],
            width: Some(1280),
            height: None,
            media: None,
        };
        let links = LinkAggregator::merge(vec![first, second]);
        assert_eq!(links[0].media_type, "video/mp4");
        assert_eq!(links[0].width, Some(640));
        assert_eq!(links[0].rel, vec![Rel::Player, Rel::Og]);
    }

    #[test]
    fn test_rel_duplicates_collapse_within_one_candidate() {
        let links = LinkAggregator::merge(vec![candidate(
            Some("http://x/a"),
            vec![Rel::Player, Rel::Player, Rel::Og],
        )]);
        assert_eq!(links[0].rel, vec![Rel::Player, Rel::Og]);
    }

    #[test]
    fn test_missing_type_defaults_to_text_html() {
        let links = LinkAggregator::merge(vec![candidate(Some("http://x/a"), vec![Rel::Player])]);
        assert_eq!(links[0].media_type, TEXT_HTML);
    }

    #[test]
    fn test_grouping_is_covering_not_partitioning() {
        let links = LinkAggregator::aggregate(
            vec![candidate(Some("http://x/a"), vec![Rel::Player, Rel::Og])],
            true,
        );
        let Links::Grouped(groups) = &links else {
            panic!("expected grouped links");
        };
        assert_eq!(groups.player.len(), 1);
        assert_eq!(groups.og.len(), 1);
        assert_eq!(groups.player[0].href, "http://x/a");
        assert_eq!(groups.og[0].href, "http://x/a");
        assert!(groups.other.is_empty());
        // One underlying offer despite two group references.
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_uncategorized_links_fall_into_other() {
        let links = LinkAggregator::aggregate(
            vec![candidate(Some("http://x/alt"), vec![Rel::Alternate])],
            true,
        );
        let Links::Grouped(groups) = links else {
            panic!("expected grouped links");
        };
        assert_eq!(groups.other.len(), 1);
        assert!(groups.player.is_empty());
    }

    #[test]
    fn test_empty_groups_are_omitted_from_serialization() {
        let links = LinkAggregator::aggregate(
            vec![candidate(Some("http://x/a"), vec![Rel::Player])],
            true,
        );
        let json = serde_json::to_string(&links).unwrap();
        assert!(json.contains("\"player\""));
        assert!(!json.contains("\"image\""));
        assert!(!json.contains("\"other\""));
    }
}
