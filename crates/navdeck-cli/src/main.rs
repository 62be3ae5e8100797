//! `navdeck` - inspect a navigation catalog from the command line

mod load;
mod render;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use navdeck_dashboard::{Dashboard, DashboardConfig};
use navdeck_model::Catalog;
use navdeck_resolve::has_visible_links;
use render::ServiceLinks;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "navdeck=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn cli() -> Command {
    Command::new("navdeck")
        .version(navdeck_dashboard::VERSION)
        .about("Resolve environment groups, visible links and application bundles of a catalog")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .short('c')
                .env("NAVDECK_CATALOG")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Catalog file (.yaml, .yml or .json)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .default_value("text")
                .global(true)
                .value_parser(["text", "json"])
                .help("Output format"),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Accept catalogs with id collisions"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(Command::new("validate").about("Check id uniqueness and service parents"))
        .subcommand(Command::new("groups").about("Print resolved environment groups"))
        .subcommand(
            Command::new("links")
                .about("Print link trees visible in an environment")
                .arg(
                    Arg::new("env")
                        .long("env")
                        .short('e')
                        .required(true)
                        .help("Environment to scope links to"),
                )
                .arg(
                    Arg::new("service")
                        .long("service")
                        .short('s')
                        .help("Only this service"),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Search link names and URLs")
                .arg(Arg::new("query").required(true).help("Case-insensitive text"))
                .arg(
                    Arg::new("service")
                        .long("service")
                        .short('s')
                        .help("Only this service"),
                ),
        )
        .subcommand(
            Command::new("bundle")
                .about("Resolve an application into services and links")
                .arg(Arg::new("application").required(true).help("Application id"))
                .arg(
                    Arg::new("env")
                        .long("env")
                        .short('e')
                        .help("Scope the bundle to an environment"),
                )
                .arg(
                    Arg::new("summary")
                        .long("summary")
                        .action(ArgAction::SetTrue)
                        .help("Print counts and unresolved ids only"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let path = matches
        .get_one::<PathBuf>("catalog")
        .context("no catalog given: pass --catalog or set NAVDECK_CATALOG")?;
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => Format::Json,
        _ => Format::Text,
    };
    let catalog = load::load_catalog(path)?;

    let Some((name, args)) = matches.subcommand() else {
        return Ok(ExitCode::FAILURE);
    };

    if name == "validate" {
        return Ok(validate(&catalog, format));
    }

    let config = DashboardConfig::default().with_strict_ids(!matches.get_flag("lenient"));
    let dashboard = Dashboard::new(catalog, config)
        .with_context(|| format!("catalog {} is invalid", path.display()))?;
    let catalog = dashboard.catalog()?;

    match name {
        "groups" => {
            let groups = dashboard.environment_groups()?;
            emit(format, &*groups, || render::groups(&groups))?;
        }
        "links" => {
            let env = required(args, "env")?;
            let service = args.get_one::<String>("service").map(String::as_str);
            let views = link_views(&dashboard, &catalog, service, env)?;
            emit(format, &views, || render::service_links(&catalog, &views, None))?;
        }
        "search" => {
            let query = required(args, "query")?;
            let service = args.get_one::<String>("service").map(String::as_str);
            let views: Vec<ServiceLinks> = dashboard
                .search(service, query)?
                .into_iter()
                .map(|hit| ServiceLinks {
                    service_id: hit.service_id,
                    links: hit.links,
                })
                .collect();
            emit(format, &views, || render::service_links(&catalog, &views, Some(query)))?;
        }
        "bundle" => {
            let app_id = required(args, "application")?;
            if args.get_flag("summary") {
                let summary = dashboard.selection_summary(app_id)?;
                emit(format, &summary, || render::summary(&summary))?;
            } else {
                let env = args.get_one::<String>("env").map(String::as_str);
                let bundle = dashboard.bundle(app_id, env)?;
                emit(format, &bundle, || render::bundle(&bundle))?;
            }
        }
        other => anyhow::bail!("unknown command '{other}'"),
    }

    Ok(ExitCode::SUCCESS)
}

fn validate(catalog: &Catalog, format: Format) -> ExitCode {
    let outcome = catalog.validate();
    let links: usize = catalog.services.iter().map(|service| service.link_count()).sum();

    match format {
        Format::Json => {
            let report = serde_json::json!({
                "valid": outcome.is_ok(),
                "error": outcome.as_ref().err().map(ToString::to_string),
                "services": catalog.services.len(),
                "links": links,
                "environments": catalog.environments.len(),
                "version": catalog.version().ok().map(|version| version.to_string()),
            });
            println!("{report:#}");
        }
        Format::Text => match &outcome {
            Ok(()) => println!(
                "ok: {} services, {} links, {} environments",
                catalog.services.len(),
                links,
                catalog.environments.len()
            ),
            Err(err) => println!("invalid: {err}"),
        },
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::warn!("Catalog failed validation: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Visible link trees of one service, or of every service with something to show in `env`
fn link_views(
    dashboard: &Dashboard,
    catalog: &Catalog,
    service: Option<&str>,
    env: &str,
) -> Result<Vec<ServiceLinks>> {
    let services: Vec<&str> = match service {
        Some(id) => vec![id],
        None => catalog
            .services
            .iter()
            .filter(|service| has_visible_links(service, env))
            .map(|service| service.id.as_str())
            .collect(),
    };

    services
        .into_iter()
        .map(|service_id| -> Result<ServiceLinks> {
            let links = dashboard.visible_links(service_id, env)?;
            Ok(ServiceLinks {
                service_id: service_id.to_string(),
                links: links.to_vec(),
            })
        })
        .collect()
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing <{name}>"))
}

fn emit<T, F>(format: Format, value: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> Result<String, std::fmt::Error>,
{
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Text => print!("{}", text()?),
    }
    Ok(())
}
