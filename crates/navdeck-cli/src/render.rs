//! Text rendering of resolved views

use navdeck_dashboard::{Bundle, SelectionSummary};
use navdeck_model::{Catalog, Link};
use navdeck_resolve::{is_direct_match, ResolvedGroup, SelectionKind};
use serde::Serialize;
use std::fmt::{self, Write};

/// Link tree of one service, as printed by `links` and `search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServiceLinks {
    pub(crate) service_id: String,
    pub(crate) links: Vec<Link>,
}

pub(crate) fn groups(groups: &[ResolvedGroup]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for group in groups {
        writeln!(
            out,
            "{} [{}]: {}",
            group.name(),
            group.id(),
            group.environments.join(", ")
        )?;
    }
    Ok(out)
}

/// Link trees per service
///
/// With a `query`, links that match it themselves are bulleted `*`; the
/// rest are ancestors kept for context.
pub(crate) fn service_links(
    catalog: &Catalog,
    views: &[ServiceLinks],
    query: Option<&str>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for view in views {
        let name = catalog
            .service(&view.service_id)
            .map_or(view.service_id.as_str(), |service| service.name.as_str());
        writeln!(out, "{name} ({})", view.service_id)?;
        forest(&mut out, &view.links, 1, query)?;
    }
    Ok(out)
}

pub(crate) fn bundle(bundle: &Bundle) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{} ({})", bundle.application.name, bundle.application.id)?;
    if let Some(env) = &bundle.environment {
        write!(out, " in {env}")?;
    }
    out.push('\n');

    for resolved in &bundle.services {
        let kind = match resolved.kind {
            SelectionKind::Whole => "whole",
            SelectionKind::Partial => "partial",
        };
        writeln!(out, "  {} ({}) [{kind}]", resolved.service.name, resolved.service.id)?;
        forest(&mut out, &resolved.links, 2, None)?;
    }
    Ok(out)
}

pub(crate) fn summary(summary: &SelectionSummary) -> Result<String, fmt::Error> {
    let mut out = format!("{} services, {} links", summary.services, summary.links);
    if !summary.dangling.is_empty() {
        write!(out, "; unresolved: {}", summary.dangling.join(", "))?;
    }
    out.push('\n');
    Ok(out)
}

fn forest(out: &mut String, links: &[Link], indent: usize, query: Option<&str>) -> fmt::Result {
    for link in links {
        let bullet = match query {
            Some(query) if is_direct_match(link, query) => '*',
            _ => '-',
        };
        write!(out, "{}{bullet} {}", "  ".repeat(indent), link.name)?;
        if !link.url.is_empty() {
            write!(out, " <{}>", link.url)?;
        }
        if !link.environments.is_empty() {
            let scoped: Vec<&str> = link.environments.iter().map(String::as_str).collect();
            write!(out, " [{}]", scoped.join(", "))?;
        }
        out.push('\n');
        forest(out, &link.children, indent + 1, query)?;
    }
    Ok(())
}
