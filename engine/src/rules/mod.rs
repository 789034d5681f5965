// Site rules
//
// A site rule bundles everything the engine knows about one website: which
// documents it owns, which image URLs are its thumbnails, how to dig the real
// image out of awkward markup and how to turn a thumbnail URL into the
// full-size one.

pub mod registry;
pub mod sites;
pub mod transform;

use regex::Regex;
use thiserror::Error;

use crate::dom::DomNode;
use crate::net::decode_uri_component;

pub use registry::{RuleIndex, SiteRuleRegistry, PREF_BRANCH, PREF_ENABLE_SUFFIX};
pub use transform::{NoMatch, Rewrite, ZoomTransform};

use transform::compile;

/// Errors raised while building a rule table
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("duplicate rule key: {0}")]
    DuplicateKey(String),
}

/// Coarse filter deciding whether a URL is one of the site's own images.
#[derive(Debug, Clone)]
pub enum ThumbnailFilter {
    Pattern(Regex),
    /// Every non-empty URL; the host binding already narrowed the scope.
    Any,
}

impl ThumbnailFilter {
    pub fn pattern(pattern: &str) -> Result<Self, RuleError> {
        Ok(Self::Pattern(compile(pattern)?))
    }

    pub fn accepts(&self, url: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(url),
            Self::Any => !url.is_empty(),
        }
    }
}

/// Correction applied to the `src` of a hovered `<img>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialSource {
    /// The `src` attribute is the image.
    Identity,
    /// Sprite placeholders carry the photo as background or in the next sibling.
    FacebookSprite,
    /// Lazy-loaded images keep the real URL in `data-src`.
    LazyDataSrc,
    /// A transparent `spaceball.gif` covers the photo two levels away.
    FlickrSpaceball,
    /// Result thumbnails link to the original through `imgurl=`.
    GoogleImgUrl,
    /// Protocol-relative sources get an explicit scheme.
    ProtocolRelative,
}

impl SpecialSource {
    pub fn resolve<N: DomNode>(&self, node: &N, source: &str) -> Option<String> {
        match self {
            Self::Identity => Some(source.to_string()),
            Self::FacebookSprite => {
                if !source.contains("static.ak.fbcdn.net") {
                    return Some(source.to_string());
                }
                let background = node.background_image().unwrap_or_default();
                if background.contains("url") {
                    Some(strip_css_url(&background))
                } else {
                    node.next_sibling()?.attribute("src")
                }
            }
            Self::LazyDataSrc => node
                .attribute("data-src")
                .or_else(|| Some(source.to_string())),
            Self::FlickrSpaceball => {
                if !source.contains("spaceball.gif") {
                    return Some(source.to_string());
                }
                node.parent()?
                    .previous_sibling()?
                    .first_child()?
                    .first_child()?
                    .attribute("src")
            }
            Self::GoogleImgUrl => {
                let href = node.parent()?.attribute("href")?;
                // a value without a following parameter runs to the end of the link
                let start = href.find("imgurl=")? + "imgurl=".len();
                let value = match href[start..].find('&') {
                    Some(end) => &href[start..start + end],
                    None => &href[start..],
                };
                decode_uri_component(value)
            }
            Self::ProtocolRelative => {
                if source.contains("http:") || source.contains("https:") {
                    Some(source.to_string())
                } else {
                    Some(format!("http:{}", source))
                }
            }
        }
    }
}

/// Finds the element carrying the image when the hover target is a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageNodeLocator {
    None,
    /// `<i>` sprites and `a.album_link` overlays.
    Facebook,
    /// `div.thumb` painted with a background image.
    PhotoBucket,
    /// `span.overlay` / `span.jewelcase` laid over the cover art.
    LastFm,
}

impl ImageNodeLocator {
    pub fn locate<N: DomNode>(&self, node: &N, tag: &str, class: Option<&str>) -> Option<N> {
        match self {
            Self::None => None,
            Self::Facebook => match (tag, class) {
                ("i", _) => Some(node.clone()),
                ("a", Some("album_link")) => node.parent(),
                _ => None,
            },
            Self::PhotoBucket => match (tag, class) {
                ("div", Some("thumb")) => Some(node.clone()),
                _ => None,
            },
            Self::LastFm => {
                if tag != "span" {
                    return None;
                }
                let previous = node.previous_sibling()?;
                match class {
                    Some("overlay") => previous.first_child(),
                    Some("jewelcase") => Some(previous),
                    _ => None,
                }
            }
        }
    }
}

/// Strip the `url("` … `")` wrapper a browser puts around background images.
pub fn strip_css_url(value: &str) -> String {
    value.replacen("url(\"", "", 1).replacen("\")", "", 1)
}

/// Everything the engine knows about one supported website.
#[derive(Debug, Clone)]
pub struct SiteRule {
    key: String,
    display_name: String,
    host_pattern: Regex,
    thumbnail: ThumbnailFilter,
    special_source: SpecialSource,
    image_node: ImageNodeLocator,
    zoom: ZoomTransform,
}

impl SiteRule {
    pub fn new(
        key: &str,
        display_name: &str,
        host_pattern: &str,
        thumbnail: ThumbnailFilter,
        zoom: ZoomTransform,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            host_pattern: compile(host_pattern)?,
            thumbnail,
            special_source: SpecialSource::Identity,
            image_node: ImageNodeLocator::None,
            zoom,
        })
    }

    pub fn with_special_source(mut self, special_source: SpecialSource) -> Self {
        self.special_source = special_source;
        self
    }

    pub fn with_image_node(mut self, image_node: ImageNodeLocator) -> Self {
        self.image_node = image_node;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn special_source(&self) -> SpecialSource {
        self.special_source
    }

    pub fn image_node(&self) -> ImageNodeLocator {
        self.image_node
    }

    pub fn zoom_transform(&self) -> &ZoomTransform {
        &self.zoom
    }

    pub fn matches_host(&self, host: &str) -> bool {
        self.host_pattern.is_match(host)
    }

    pub fn accepts_thumbnail(&self, url: &str) -> bool {
        self.thumbnail.accepts(url)
    }

    pub fn zoom(&self, url: &str) -> Option<String> {
        self.zoom.apply(url)
    }
}
