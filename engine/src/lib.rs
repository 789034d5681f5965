pub mod dom;
pub mod hover;
pub mod net;
pub mod prefs;
pub mod resolver;
pub mod rules;

pub use dom::{Dom, DomNode, NodeId, NodeRef};
pub use hover::{HoverEvaluator, HoverOutcome, PageBinding};
pub use prefs::{ModifierKey, Modifiers, PrefValue, PreferenceStore, Preferences, PrefsError};
pub use resolver::{is_valid_thumbnail, resolve, thumbnail_source, zoom_url, Miss, Resolution};
pub use rules::{
    ImageNodeLocator, NoMatch, Rewrite, RuleError, RuleIndex, SiteRule, SiteRuleRegistry,
    SpecialSource, ThumbnailFilter, ZoomTransform,
};
