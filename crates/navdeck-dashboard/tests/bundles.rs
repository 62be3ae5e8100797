//! Application bundle integration tests

use navdeck_dashboard::prelude::*;
use navdeck_model::Application;
use navdeck_resolve::SelectionKind;
use navdeck_test_utils::{link_in, sample_catalog};
use pretty_assertions::assert_eq;

fn dashboard() -> Dashboard {
    Dashboard::with_catalog(sample_catalog()).unwrap()
}

fn service_ids(bundle: &Bundle) -> Vec<&str> {
    bundle
        .services
        .iter()
        .map(|resolved| resolved.service.id.as_str())
        .collect()
}

#[test]
fn test_unscoped_bundle_matches_selection() {
    let bundle = dashboard().bundle("login", None).unwrap();

    assert_eq!(service_ids(&bundle), vec!["auth", "auth-worker"]);
    assert!(bundle.environment.is_none());
    assert!(bundle
        .services
        .iter()
        .all(|resolved| resolved.kind == SelectionKind::Partial));
    assert_eq!(bundle.link_count(), 2);
}

#[test]
fn test_scoped_bundle_drops_services_left_empty() {
    let dashboard = dashboard();

    let prod = dashboard.bundle("login", Some("prod-1")).unwrap();
    assert_eq!(service_ids(&prod), vec!["auth"]);
    assert_eq!(prod.services[0].links[0].id, "auth-p99");

    let dev = dashboard.bundle("login", Some("dev-1")).unwrap();
    assert_eq!(service_ids(&dev), vec!["auth-worker"]);
    assert_eq!(dev.environment.as_deref(), Some("dev-1"));
}

#[test]
fn test_environment_outside_offer_is_rejected() {
    let err = dashboard().bundle("login", Some("dev-2")).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::EnvironmentNotOffered { ref application, ref environment }
            if application == "login" && environment == "dev-2"
    ));
}

#[test]
fn test_unrestricted_application_offers_catalog_environments() {
    let dashboard = dashboard();

    assert_eq!(
        dashboard.bundle_environments("money").unwrap(),
        vec!["dev-1", "dev-2", "prod-1", "local"]
    );
    assert_eq!(
        dashboard.bundle_environments("login").unwrap(),
        vec!["prod-1", "dev-1"]
    );

    let local = dashboard.bundle("money", Some("local")).unwrap();
    assert_eq!(local.services[0].kind, SelectionKind::Whole);
    assert_eq!(local.link_count(), 1);
    assert!(dashboard.bundle("money", Some("nowhere")).is_err());
}

#[test]
fn test_unknown_application() {
    let err = dashboard().bundle("ghost", None).unwrap_err();
    assert_eq!(err.to_string(), "application not found: 'ghost'");
}

#[test]
fn test_selection_summary_reports_dangling_ids() {
    let summary = dashboard().selection_summary("money").unwrap();

    assert_eq!(summary.services, 1);
    assert_eq!(summary.links, 2);
    assert_eq!(summary.dangling, vec!["deleted-service".to_string()]);
}

#[test]
fn test_bundle_follows_installed_catalog() {
    let dashboard = dashboard();

    let mut next = sample_catalog();
    next.add_link("billing", None, link_in("billing-alerts", &["dev-1"]))
        .unwrap();
    next.applications
        .push(Application::new("alerts", "Alerts").with_selection(["billing-alerts"]));
    dashboard.install(next).unwrap();

    let bundle = dashboard.bundle("alerts", Some("dev-1")).unwrap();
    assert_eq!(service_ids(&bundle), vec!["billing"]);
    assert_eq!(bundle.services[0].links[0].id, "billing-alerts");
}

#[test]
fn test_bundle_serializes_for_renderers() {
    let bundle = dashboard().bundle("login", Some("prod-1")).unwrap();
    let json = serde_json::to_value(&bundle).unwrap();

    assert_eq!(json["environment"], "prod-1");
    assert_eq!(json["services"][0]["kind"], "partial");
    assert_eq!(json["application"]["serviceIds"][0], "auth-p99");
}
