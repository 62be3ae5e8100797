//! Predicate-driven pruning of link trees
//!
//! Visibility, text search and "selected only" views all share one shape:
//! a link survives if it or any descendant satisfies a predicate, and every
//! survivor's children are pruned the same way. The returned tree keeps
//! input order and is freshly allocated.

use navdeck_model::Link;

/// Returns true if `link` or any descendant satisfies `matches`
pub fn any_in_subtree<P>(link: &Link, matches: &P) -> bool
where
    P: Fn(&Link) -> bool + ?Sized,
{
    matches(link) || link.children.iter().any(|child| any_in_subtree(child, matches))
}

/// Keep the links whose subtree satisfies `matches`, pruning children recursively
///
/// A link kept only because of a matching descendant is still returned
/// (as context for the match); non-matching siblings are dropped.
pub fn prune<P>(links: &[Link], matches: &P) -> Vec<Link>
where
    P: Fn(&Link) -> bool + ?Sized,
{
    links
        .iter()
        .filter_map(|link| prune_one(link, matches))
        .collect()
}

fn prune_one<P>(link: &Link, matches: &P) -> Option<Link>
where
    P: Fn(&Link) -> bool + ?Sized,
{
    let children = prune(&link.children, matches);
    if !matches(link) && children.is_empty() {
        return None;
    }

    Some(Link {
        id: link.id.clone(),
        column_id: link.column_id.clone(),
        name: link.name.clone(),
        url: link.url.clone(),
        environments: link.environments.clone(),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> Vec<Link> {
        vec![
            Link::new("a", "a", "").with_children([
                Link::new("a1", "a1", "").with_child(Link::new("hit", "hit", "")),
                Link::new("a2", "a2", ""),
            ]),
            Link::new("b", "b", ""),
            Link::new("hit-top", "hit", "").with_child(Link::new("c", "c", "")),
        ]
    }

    fn is_hit(link: &Link) -> bool {
        link.name == "hit"
    }

    #[test]
    fn keeps_ancestors_of_matches() {
        let pruned = prune(&forest(), &is_hit);

        assert_eq!(pruned.len(), 2);
        assert_eq!(pruned[0].id, "a");
        assert_eq!(pruned[0].children.len(), 1);
        assert_eq!(pruned[0].children[0].id, "a1");
        assert_eq!(pruned[0].children[0].children[0].id, "hit");
    }

    #[test]
    fn direct_match_children_are_pruned_too() {
        let pruned = prune(&forest(), &is_hit);
        assert_eq!(pruned[1].id, "hit-top");
        assert!(pruned[1].children.is_empty());
    }

    #[test]
    fn any_in_subtree_looks_down_only() {
        let links = forest();
        assert!(any_in_subtree(&links[0], &is_hit));
        assert!(!any_in_subtree(&links[1], &is_hit));
        assert!(!any_in_subtree(&links[0].children[1], &is_hit));
    }

    #[test]
    fn always_true_is_identity() {
        let links = forest();
        assert_eq!(prune(&links, &|_: &Link| true), links);
    }

    #[test]
    fn input_is_untouched() {
        let links = forest();
        let before = links.clone();
        let _ = prune(&links, &|_: &Link| false);
        assert_eq!(links, before);
    }
}
