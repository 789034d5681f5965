// Hover evaluation
//
// Decision logic behind the zoom panel, without the panel. The host calls
// `bind_page` when a document loads, `on_mouse_over` for every mouse-over and,
// once its single-shot timer fires, `on_delay_elapsed`. Each call is a pure
// function of its arguments and the current preferences, so a timer that was
// cancelled and restarted can never act on stale state.

use std::time::Duration;

use tracing::{debug, trace};

use crate::dom::DomNode;
use crate::prefs::{is_site_enabled, Modifiers, Preferences};
use crate::resolver::{is_valid_thumbnail, thumbnail_source, zoom_url, Miss};
use crate::rules::{RuleIndex, SiteRuleRegistry};

/// A document bound to the rule that owns its host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBinding {
    pub rule: RuleIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverOutcome {
    /// Start (or restart) the hover timer; call `on_delay_elapsed` when it fires.
    Schedule { source: String, delay: Duration },
    /// Open the panel on this URL.
    Show { zoom_url: String },
    /// Close the panel and cancel any pending timer.
    Close(Miss),
}

pub struct HoverEvaluator<'a> {
    registry: &'a SiteRuleRegistry,
    prefs: &'a Preferences,
}

impl<'a> HoverEvaluator<'a> {
    pub fn new(registry: &'a SiteRuleRegistry, prefs: &'a Preferences) -> Self {
        Self { registry, prefs }
    }

    pub fn bind_page(&self, document_url: &str) -> Result<PageBinding, Miss> {
        let rule = self
            .registry
            .resolve_document(document_url)
            .ok_or(Miss::NoRuleForHost)?;
        debug!(rule = self.registry.key_of(rule), "page bound");
        Ok(PageBinding { rule })
    }

    pub fn on_mouse_over<N: DomNode>(
        &self,
        page: PageBinding,
        node: &N,
        held: Modifiers,
    ) -> HoverOutcome {
        let Some(rule) = self.registry.get(page.rule) else {
            return HoverOutcome::Close(Miss::NoRuleForHost);
        };

        let Some(source) = thumbnail_source(node, rule) else {
            return HoverOutcome::Close(Miss::NoCandidateSource);
        };
        if !self.prefs.modifier().is_active(held) {
            return HoverOutcome::Close(Miss::ModifierNotHeld);
        }
        if !is_site_enabled(self.prefs, self.registry, page.rule) {
            return HoverOutcome::Close(Miss::SiteDisabled);
        }
        if !is_valid_thumbnail(&source, rule) {
            trace!(rule = rule.key(), %source, "not a site thumbnail");
            return HoverOutcome::Close(Miss::PatternMismatch);
        }

        HoverOutcome::Schedule {
            source,
            delay: self.prefs.hover_delay(),
        }
    }

    pub fn on_delay_elapsed(&self, page: PageBinding, source: &str) -> HoverOutcome {
        let Some(rule) = self.registry.get(page.rule) else {
            return HoverOutcome::Close(Miss::NoRuleForHost);
        };
        match zoom_url(source, rule) {
            Some(zoom_url) => {
                debug!(rule = rule.key(), %zoom_url, "showing zoom");
                HoverOutcome::Show { zoom_url }
            }
            None => HoverOutcome::Close(Miss::NoZoomVariant),
        }
    }
}
