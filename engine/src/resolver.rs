// Image resolver
//
// Given a hovered node and the rule bound to its page, find the thumbnail
// URL, check it belongs to the site and compute the full-size URL. Every
// failure is an ordinary outcome reported as `Miss`, never a panic.

use std::fmt;

use tracing::trace;

use crate::dom::DomNode;
use crate::rules::{strip_css_url, SiteRule};

/// Why a hover does not lead to a zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    /// The page's host matches no rule
    NoRuleForHost,
    /// The node yields no image URL
    NoCandidateSource,
    /// The configured modifier key is not held
    ModifierNotHeld,
    /// The user switched the site off
    SiteDisabled,
    /// The URL is not one of the site's thumbnails
    PatternMismatch,
    /// The URL carries no size marker to rewrite
    NoZoomVariant,
}

impl Miss {
    pub fn as_str(&self) -> &'static str {
        match self {
            Miss::NoRuleForHost => "no rule for host",
            Miss::NoCandidateSource => "no candidate source",
            Miss::ModifierNotHeld => "modifier not held",
            Miss::SiteDisabled => "site disabled",
            Miss::PatternMismatch => "pattern mismatch",
            Miss::NoZoomVariant => "no zoom variant",
        }
    }
}

impl fmt::Display for Miss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A thumbnail and its full-size counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub source: String,
    pub zoom_url: String,
}

/// URL of the thumbnail `node` shows, following the rule's special cases.
pub fn thumbnail_source<N: DomNode>(node: &N, rule: &SiteRule) -> Option<String> {
    let tag = node.tag_name();
    let mut source = match tag.as_deref() {
        Some("img") => node.attribute("src"),
        _ => None,
    };

    if let Some(naive) = source.take() {
        source = rule.special_source().resolve(node, &naive);
    }

    if source.is_none() {
        let tag = tag.unwrap_or_default();
        let class = node.attribute("class");
        if let Some(image) = rule.image_node().locate(node, &tag, class.as_deref()) {
            source = image_node_source(&image);
        }
    }

    trace!(rule = rule.key(), source = source.as_deref(), "thumbnail source");
    source
}

fn image_node_source<N: DomNode>(image: &N) -> Option<String> {
    if let Some(src) = image.attribute("src") {
        return Some(src);
    }
    image
        .background_image()
        .filter(|background| !background.is_empty())
        .map(|background| strip_css_url(&background))
}

/// Whether `url` looks like one of the rule's own images.
pub fn is_valid_thumbnail(url: &str, rule: &SiteRule) -> bool {
    rule.accepts_thumbnail(url)
}

/// Full-size URL for a thumbnail, `None` when the rule knows no bigger version.
pub fn zoom_url(url: &str, rule: &SiteRule) -> Option<String> {
    rule.zoom(url)
}

/// Run source extraction, validation and the zoom transform in order.
pub fn resolve<N: DomNode>(node: &N, rule: &SiteRule) -> Result<Resolution, Miss> {
    let source = thumbnail_source(node, rule).ok_or(Miss::NoCandidateSource)?;
    if !is_valid_thumbnail(&source, rule) {
        return Err(Miss::PatternMismatch);
    }
    let zoom_url = zoom_url(&source, rule).ok_or(Miss::NoZoomVariant)?;
    Ok(Resolution { source, zoom_url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Dom;
    use crate::rules::{SiteRuleRegistry, ThumbnailFilter, ZoomTransform};

    fn builtin(key: &str) -> SiteRule {
        let registry = SiteRuleRegistry::builtin().unwrap();
        let index = registry.resolve_by_key(key).unwrap();
        registry.get(index).unwrap().clone()
    }

    #[test]
    fn test_plain_img() {
        let rule = builtin("twitter");
        let mut dom = Dom::new();
        let img = dom.create_element(
            "IMG",
            &[("src", "https://a0.twimg.com/profile_images/1/me_normal.jpg")],
            None,
        );
        let resolution = resolve(&dom.node(img), &rule).unwrap();
        assert_eq!(resolution.zoom_url, "https://a0.twimg.com/profile_images/1/me.jpg");
    }

    #[test]
    fn test_non_img_without_locator() {
        let rule = builtin("twitter");
        let mut dom = Dom::new();
        let div = dom.create_element(
            "div",
            &[("src", "https://a0.twimg.com/profile_images/1/x.jpg")],
            None,
        );
        assert_eq!(thumbnail_source(&dom.node(div), &rule), None);
        assert_eq!(resolve(&dom.node(div), &rule), Err(Miss::NoCandidateSource));
    }

    #[test]
    fn test_img_without_src() {
        let rule = builtin("twitter");
        let mut dom = Dom::new();
        let img = dom.create_element("img", &[("alt", "x")], None);
        assert_eq!(thumbnail_source(&dom.node(img), &rule), None);
    }

    #[test]
    fn test_outcome_order() {
        let rule = builtin("flickr");
        let mut dom = Dom::new();
        let ad = dom.create_element("img", &[("src", "http://ads.example.com/banner_s.jpg")], None);
        let big = dom.create_element(
            "img",
            &[("src", "http://farm1.static.flickr.com/1/2.jpg")],
            None,
        );
        assert_eq!(resolve(&dom.node(ad), &rule), Err(Miss::PatternMismatch));
        assert_eq!(resolve(&dom.node(big), &rule), Err(Miss::NoZoomVariant));
    }

    #[test]
    fn test_locator_prefers_src_over_background() {
        let rule = builtin("photobucket");
        let mut dom = Dom::new();
        let with_src = dom.create_element(
            "div",
            &[("class", "thumb"), ("src", "http://i1.photobucket.com/albums/a/th_x.jpg")],
            None,
        );
        let with_bg = dom.create_element(
            "div",
            &[
                ("class", "thumb"),
                ("style", "background-image: url(http://i2.photobucket.com/albums/b/th_y.jpg)"),
            ],
            None,
        );
        let bare = dom.create_element("div", &[("class", "thumb")], None);
        assert_eq!(
            thumbnail_source(&dom.node(with_src), &rule).as_deref(),
            Some("http://i1.photobucket.com/albums/a/th_x.jpg")
        );
        assert_eq!(
            thumbnail_source(&dom.node(with_bg), &rule).as_deref(),
            Some("http://i2.photobucket.com/albums/b/th_y.jpg")
        );
        assert_eq!(thumbnail_source(&dom.node(bare), &rule), None);
    }

    #[test]
    fn test_custom_rule() {
        let rule = SiteRule::new(
            "test",
            "Test",
            "example",
            ThumbnailFilter::Any,
            ZoomTransform::identity(),
        )
        .unwrap();
        let mut dom = Dom::new();
        let img = dom.create_element("img", &[("src", "a.png")], None);
        assert_eq!(
            resolve(&dom.node(img), &rule),
            Ok(Resolution {
                source: "a.png".into(),
                zoom_url: "a.png".into()
            })
        );
    }
}
