//! Testing utilities for navdeck workspace
//!
//! Shared fixtures, builders and proptest strategies.

#![allow(missing_docs)]

use navdeck_model::{Application, Catalog, Column, EnvironmentGroup, Link, Service};
use proptest::prelude::*;

pub fn link(id: &str) -> Link {
    Link::new(id, id, format!("https://{id}.example"))
}

pub fn link_in(id: &str, environments: &[&str]) -> Link {
    link(id).with_environments(environments.iter().copied())
}

pub fn environments(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

/// A small but complete catalog
///
/// - `auth` (identity): grafana[prod-1] > { latency[], p99[prod-1] }, logs[]
/// - `auth-worker`: child of `auth`, queue[dev-1, dev-2]
/// - `billing`: ledger[prod-1], repo[]
/// - groups: none (auto-grouping applies)
/// - applications: `login` (partial), `money` (whole billing + stale id)
pub fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for env in ["dev-1", "dev-2", "prod-1", "local"] {
        catalog.add_environment(env);
    }
    catalog.columns = vec![
        Column::new("dashboards", "Dashboards").with_kind("dashboards").with_icon("chart"),
        Column::new("logs", "Logs").with_kind("logs").with_icon("scroll"),
        Column::new("repos", "Repositories").with_kind("repos").with_icon("git"),
    ];

    catalog.services = vec![
        Service::new("auth", "Auth Service")
            .with_group("identity")
            .with_links([
                link_in("auth-grafana", &["prod-1"])
                    .with_column("dashboards")
                    .with_children([
                        link("auth-latency").with_column("dashboards"),
                        link_in("auth-p99", &["prod-1"]).with_column("dashboards"),
                    ]),
                link("auth-logs").with_column("logs"),
            ]),
        Service::new("auth-worker", "Auth Worker")
            .with_parent("auth")
            .with_link(link_in("auth-queue", &["dev-1", "dev-2"]).with_column("dashboards")),
        Service::new("billing", "Billing")
            .with_links([
                link_in("billing-ledger", &["prod-1"]).with_column("dashboards"),
                link("billing-repo").with_column("repos"),
            ]),
    ];

    catalog.applications = vec![
        Application::new("login", "Login Flow")
            .with_selection(["auth-p99", "auth-queue"])
            .with_environments(["prod-1", "dev-1"]),
        Application::new("money", "Money").with_selection(["billing", "deleted-service"]),
    ];
    catalog
}

/// The sample catalog with explicit environment groups
pub fn grouped_catalog() -> Catalog {
    let mut catalog = sample_catalog();
    catalog.groups = vec![
        EnvironmentGroup::new("production", "Production")
            .with_icon("server")
            .with_pattern("prod-*"),
        EnvironmentGroup::new("development", "Development")
            .with_icon("code")
            .with_pattern("dev-?")
            .with_environments(["local"]),
    ];
    catalog
}

// ----------------------------------------------------------------------
// proptest strategies
// ----------------------------------------------------------------------

/// Environment names drawn from a small alphabet so collisions and
/// prefixes actually occur
pub fn arb_environment() -> impl Strategy<Value = String> {
    prop_oneof![
        "(dev|prod|lab|qa)-[0-9]",
        "[a-z]{1,4}",
        "[A-Z][a-z]{0,3}-[0-9]",
    ]
}

/// De-duplicated environment list, order preserved
pub fn arb_environments() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_environment(), 0..12).prop_map(|names| {
        let mut seen = std::collections::HashSet::new();
        names.into_iter().filter(|name| seen.insert(name.clone())).collect()
    })
}

pub fn arb_group() -> impl Strategy<Value = EnvironmentGroup> {
    (
        "[a-z]{1,6}",
        proptest::option::of(prop_oneof!["(dev|prod|lab|qa)-\\*", "\\*-[0-9]", "[a-z]\\?-1", "\\*"]),
        proptest::collection::vec(arb_environment(), 0..4),
    )
        .prop_map(|(id, pattern, members)| {
            let group = EnvironmentGroup::new(id.clone(), id).with_environments(members);
            match pattern {
                Some(pattern) => group.with_pattern(pattern),
                None => group,
            }
        })
}

/// Link trees up to four levels deep
pub fn arb_link_tree() -> impl Strategy<Value = Link> {
    let leaf = (
        "[a-z]{1,8}",
        proptest::collection::vec(arb_environment(), 0..3),
    )
        .prop_map(|(id, envs)| Link::new(id.clone(), id, "").with_environments(envs));

    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            "[a-z]{1,8}",
            proptest::collection::vec(arb_environment(), 0..3),
            proptest::collection::vec(inner, 0..4),
        )
            .prop_map(|(id, envs, children)| {
                Link::new(id.clone(), id, "")
                    .with_environments(envs)
                    .with_children(children)
            })
    })
}
