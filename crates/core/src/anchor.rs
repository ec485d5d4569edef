use folio_protocol::{Effect, ScrollBehavior, Target};

/// Result of clicking an in-page link.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorOutcome {
    pub prevent_default: bool,
    pub effects: Vec<Effect>,
}

impl AnchorOutcome {
    fn pass_through() -> Self {
        Self {
            prevent_default: false,
            effects: Vec::new(),
        }
    }

    fn handled(effects: Vec<Effect>) -> Self {
        Self {
            prevent_default: true,
            effects,
        }
    }
}

/// Smooth scrolling for `a[href^="#"]`.
///
/// `exists` answers whether an element with the given id is in the document.
pub fn resolve(href: &str, reduced_motion: bool, exists: impl Fn(&str) -> bool) -> AnchorOutcome {
    let Some(fragment) = href.strip_prefix('#') else {
        return AnchorOutcome::pass_through();
    };
    let behavior = ScrollBehavior::for_motion(reduced_motion);
    match fragment {
        // a bare "#" is a placeholder link: no jump, no scroll
        "" => AnchorOutcome::handled(Vec::new()),
        "top" => AnchorOutcome::handled(vec![Effect::ScrollToTop { behavior }]),
        id if exists(id) => AnchorOutcome::handled(vec![Effect::ScrollIntoView {
            target: Target::id(id),
            behavior,
        }]),
        id => {
            log::debug!("anchor #{id} has no target");
            AnchorOutcome::handled(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(id: &'static str) -> impl Fn(&str) -> bool {
        move |candidate| candidate == id
    }

    #[test]
    fn bare_hash_does_nothing() {
        let outcome = resolve("#", false, only("about"));
        assert!(outcome.effects.is_empty());
        assert!(outcome.prevent_default);
    }

    #[test]
    fn top_scrolls_to_top() {
        assert_eq!(
            resolve("#top", false, only("about")).effects,
            vec![Effect::ScrollToTop {
                behavior: ScrollBehavior::Smooth,
            }]
        );
        assert_eq!(
            resolve("#top", true, only("about")).effects,
            vec![Effect::ScrollToTop {
                behavior: ScrollBehavior::Instant,
            }]
        );
    }

    #[test]
    fn known_target_scrolls_into_view() {
        let outcome = resolve("#about", false, only("about"));
        assert!(outcome.prevent_default);
        assert_eq!(
            outcome.effects,
            vec![Effect::ScrollIntoView {
                target: Target::id("about"),
                behavior: ScrollBehavior::Smooth,
            }]
        );
    }

    #[test]
    fn unknown_target_still_suppresses_navigation() {
        let outcome = resolve("#missing", false, only("about"));
        assert!(outcome.prevent_default);
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn external_links_pass_through() {
        let outcome = resolve("https://example.com/#about", false, only("about"));
        assert!(!outcome.prevent_default);
        assert!(outcome.effects.is_empty());
    }
}
