//! Environment-scoped link visibility
//!
//! A link is visible in an environment if its own restriction admits the
//! environment (an empty restriction admits every environment), or if any
//! descendant is visible. The second clause lets a restricted parent stay on
//! screen as a container for the children that do apply.

use crate::tree;
use navdeck_model::{Link, Service};

/// Returns true if `link` or any descendant is visible in `env`
#[inline]
#[must_use]
pub fn is_visible(link: &Link, env: &str) -> bool {
    tree::any_in_subtree(link, &|candidate: &Link| candidate.allows(env))
}

/// Prune a link forest to what is visible in `env`
///
/// Survivors keep their own restriction untouched; only wholly invisible
/// subtrees are removed.
#[must_use]
pub fn filter_visible(links: &[Link], env: &str) -> Vec<Link> {
    tree::prune(links, &|candidate: &Link| candidate.allows(env))
}

/// Returns true if the service shows at least one link in `env`
#[must_use]
pub fn has_visible_links(service: &Service, env: &str) -> bool {
    service.links.iter().any(|link| is_visible(link, env))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unrestricted_leaf_is_visible_everywhere() {
        let link = Link::new("l", "L", "");
        assert!(is_visible(&link, "prod"));
        assert!(is_visible(&link, "not-in-any-catalog"));
    }

    #[test]
    fn restricted_leaf_has_no_escape_hatch() {
        let link = Link::new("l", "L", "").with_environments(["prod"]);
        assert!(is_visible(&link, "prod"));
        assert!(!is_visible(&link, "dev"));
    }

    #[test]
    fn visibility_propagates_from_children() {
        let link = Link::new("p", "Parent", "")
            .with_environments(["prod"])
            .with_child(Link::new("c", "Child", ""));
        assert!(is_visible(&link, "dev"));
    }

    #[test]
    fn deep_descendant_keeps_chain_visible() {
        let link = Link::new("p", "P", "").with_environments(["prod"]).with_child(
            Link::new("m", "M", "")
                .with_environments(["prod"])
                .with_child(Link::new("d", "D", "").with_environments(["dev"])),
        );
        assert!(is_visible(&link, "dev"));
        assert!(!is_visible(&link, "staging"));
    }

    #[test]
    fn filter_keeps_container_and_prunes_siblings() {
        let links = vec![
            Link::new("p", "P", "").with_environments(["prod-1"]).with_children([
                Link::new("c1", "C1", ""),
                Link::new("c2", "C2", "").with_environments(["prod-1"]),
            ]),
            Link::new("q", "Q", "").with_environments(["prod-1"]),
        ];

        let visible = filter_visible(&links, "dev-1");

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "p");
        assert_eq!(
            visible[0].children,
            vec![Link::new("c1", "C1", "")]
        );
        // the container keeps its own restriction
        assert!(!visible[0].allows("dev-1"));
    }

    #[test]
    fn service_visibility_uses_any_link() {
        let service = Service::new("s", "S").with_links([
            Link::new("a", "A", "").with_environments(["prod"]),
            Link::new("b", "B", "").with_environments(["dev"]),
        ]);
        assert!(has_visible_links(&service, "dev"));
        assert!(!has_visible_links(&service, "qa"));
        assert!(!has_visible_links(&Service::new("e", "Empty"), "dev"));
    }
}
