//! Environment grouping
//!
//! Turns the catalog's environment list plus its group definitions into an
//! ordered partition: every catalog environment lands in exactly one output
//! group.
//!
//! # Explicit groups
//! Groups are processed in order. Each claims its glob matches first (in
//! catalog order), then its explicit members (in listed order), skipping
//! anything an earlier group already claimed. Groups that end up empty are
//! omitted. Leftovers form a trailing "Other" group.
//!
//! # Auto-grouping
//! With no groups defined, environments are bucketed by a leading
//! lowercase `prefix-`. Buckets appear in first-seen order; names without a
//! prefix go to the trailing "Other" group.

use crate::glob::{GlobMatcher, DEFAULT_SIZE_LIMIT};
use indexmap::IndexMap;
use navdeck_model::{Environment, EnvironmentGroup};
use serde::Serialize;
use std::collections::HashSet;

/// Id of the synthesized leftover group
pub const OTHER_GROUP_ID: &str = "other";

/// How a resolved group came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrigin {
    /// Defined in the catalog
    Explicit,
    /// Synthesized from an environment-name prefix
    Auto,
    /// Synthesized bucket for unclaimed environments
    Other,
}

/// A group with its resolved members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedGroup {
    /// Group metadata (synthesized for auto and leftover groups)
    pub group: EnvironmentGroup,
    /// Where the group came from
    pub origin: GroupOrigin,
    /// Members, never empty
    pub environments: Vec<Environment>,
}

impl ResolvedGroup {
    /// Group id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.group.id
    }

    /// Group name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.group.name
    }

    /// Returns true if `env` resolved into this group
    #[must_use]
    pub fn contains(&self, env: &str) -> bool {
        self.environments.iter().any(|member| member == env)
    }
}

/// Presentation knobs for synthesized groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingOptions {
    /// Name of the leftover group
    pub other_name: String,
    /// Icon of the leftover group
    pub other_icon: String,
    /// Compiled-size budget for each group pattern; patterns over it match nothing
    pub pattern_size_limit: usize,
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            other_name: "Other".to_string(),
            other_icon: "folder".to_string(),
            pattern_size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

/// Resolve groups with default options
pub fn resolve_groups<'a, I>(environments: I, groups: &[EnvironmentGroup]) -> Vec<ResolvedGroup>
where
    I: IntoIterator<Item = &'a Environment>,
{
    resolve_groups_with(environments, groups, &GroupingOptions::default())
}

/// Resolve groups
///
/// Duplicate names in `environments` are the caller's problem; the
/// partition guarantee assumes a de-duplicated list.
pub fn resolve_groups_with<'a, I>(
    environments: I,
    groups: &[EnvironmentGroup],
    options: &GroupingOptions,
) -> Vec<ResolvedGroup>
where
    I: IntoIterator<Item = &'a Environment>,
{
    let environments: Vec<&'a str> = environments.into_iter().map(String::as_str).collect();

    let resolved = if groups.is_empty() {
        auto_groups(&environments, options)
    } else {
        explicit_groups(&environments, groups, options)
    };

    tracing::trace!(
        "Resolved {} environments into {} groups",
        environments.len(),
        resolved.len()
    );
    resolved
}

fn explicit_groups(
    environments: &[&str],
    groups: &[EnvironmentGroup],
    options: &GroupingOptions,
) -> Vec<ResolvedGroup> {
    let known: HashSet<&str> = environments.iter().copied().collect();
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut resolved = Vec::new();

    for group in groups {
        let mut members = Vec::new();

        if let Some(matcher) = compile_pattern(group, options.pattern_size_limit) {
            for &env in environments {
                if !claimed.contains(env) && matcher.test(env) {
                    claimed.insert(env);
                    members.push(env.to_string());
                }
            }
        }

        for member in &group.environments {
            // members outside the catalog would break the partition
            if let Some(&env) = known.get(member.as_str()) {
                if claimed.insert(env) {
                    members.push(env.to_string());
                }
            }
        }

        if !members.is_empty() {
            resolved.push(ResolvedGroup {
                group: group.clone(),
                origin: GroupOrigin::Explicit,
                environments: members,
            });
        }
    }

    let leftovers: Vec<Environment> = environments
        .iter()
        .filter(|env| !claimed.contains(*env))
        .map(|env| (*env).to_string())
        .collect();
    if !leftovers.is_empty() {
        resolved.push(other_group(leftovers, options));
    }

    resolved
}

fn compile_pattern(group: &EnvironmentGroup, size_limit: usize) -> Option<GlobMatcher> {
    let pattern = group.active_pattern()?;
    match GlobMatcher::compile_with_limit(pattern, size_limit) {
        Ok(matcher) => Some(matcher),
        Err(err) => {
            tracing::debug!("Ignoring pattern of group {}: {}", group.id, err);
            None
        }
    }
}

fn auto_groups(environments: &[&str], options: &GroupingOptions) -> Vec<ResolvedGroup> {
    let mut buckets: IndexMap<&str, Vec<Environment>> = IndexMap::new();
    let mut leftovers = Vec::new();

    for &env in environments {
        match env_prefix(env) {
            Some(prefix) => buckets.entry(prefix).or_default().push(env.to_string()),
            None => leftovers.push(env.to_string()),
        }
    }

    let mut resolved: Vec<ResolvedGroup> = buckets
        .into_iter()
        .map(|(prefix, members)| ResolvedGroup {
            group: EnvironmentGroup::new(
                format!("auto-{prefix}"),
                format!("{} Environments", title_case(prefix)),
            )
            .with_icon(prefix_icon(prefix)),
            origin: GroupOrigin::Auto,
            environments: members,
        })
        .collect();

    if !leftovers.is_empty() {
        resolved.push(other_group(leftovers, options));
    }
    resolved
}

fn other_group(environments: Vec<Environment>, options: &GroupingOptions) -> ResolvedGroup {
    ResolvedGroup {
        group: EnvironmentGroup::new(OTHER_GROUP_ID, options.other_name.clone())
            .with_icon(options.other_icon.clone()),
        origin: GroupOrigin::Other,
        environments,
    }
}

/// Leading lowercase ASCII run terminated by `-`, as in `^[a-z]+-`
fn env_prefix(env: &str) -> Option<&str> {
    let end = env.find('-')?;
    let prefix = &env[..end];
    (!prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_lowercase())).then_some(prefix)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn prefix_icon(prefix: &str) -> &'static str {
    match prefix {
        "dev" => "code",
        "prod" => "server",
        "staging" | "stage" => "flask",
        "test" | "qa" => "beaker",
        "lab" => "microscope",
        "demo" => "presentation",
        _ => "layers",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn envs(names: &[&str]) -> Vec<Environment> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn summary(resolved: &[ResolvedGroup]) -> Vec<(String, Vec<String>)> {
        resolved
            .iter()
            .map(|g| (g.name().to_string(), g.environments.clone()))
            .collect()
    }

    #[test]
    fn auto_groups_by_prefix_in_first_seen_order() {
        let catalog = envs(&["prod-1", "dev-1", "local", "dev-2", "lab-east"]);
        let resolved = resolve_groups(&catalog, &[]);

        assert_eq!(
            summary(&resolved),
            vec![
                ("Prod Environments".to_string(), envs(&["prod-1"])),
                ("Dev Environments".to_string(), envs(&["dev-1", "dev-2"])),
                ("Lab Environments".to_string(), envs(&["lab-east"])),
                ("Other".to_string(), envs(&["local"])),
            ]
        );
        assert_eq!(resolved[0].id(), "auto-prod");
        assert_eq!(resolved[0].group.icon, "server");
        assert_eq!(resolved[2].group.icon, "microscope");
        assert_eq!(resolved[3].origin, GroupOrigin::Other);
    }

    #[test]
    fn auto_prefix_requires_lowercase_letters() {
        assert_eq!(env_prefix("dev-1"), Some("dev"));
        assert_eq!(env_prefix("Dev-1"), None);
        assert_eq!(env_prefix("dev2-1"), None);
        assert_eq!(env_prefix("-1"), None);
        assert_eq!(env_prefix("prod"), None);
    }

    #[test]
    fn unknown_prefix_gets_generic_icon() {
        let resolved = resolve_groups(&envs(&["edge-1"]), &[]);
        assert_eq!(resolved[0].group.icon, "layers");
    }

    #[test]
    fn explicit_pattern_then_members() {
        let catalog = envs(&["dev-1", "prod-2", "prod-1", "lab"]);
        let groups = vec![EnvironmentGroup::new("prod", "Production")
            .with_pattern("prod-*")
            .with_environments(["lab", "prod-1"])];

        let resolved = resolve_groups(&catalog, &groups);

        assert_eq!(
            summary(&resolved),
            vec![
                ("Production".to_string(), envs(&["prod-2", "prod-1", "lab"])),
                ("Other".to_string(), envs(&["dev-1"])),
            ]
        );
    }

    #[test]
    fn first_group_wins() {
        let catalog = envs(&["staging-1", "staging-2"]);
        let groups = vec![
            EnvironmentGroup::new("a", "A").with_pattern("staging-*"),
            EnvironmentGroup::new("b", "B")
                .with_pattern("*-1")
                .with_environments(["staging-2"]),
        ];

        let resolved = resolve_groups(&catalog, &groups);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id(), "a");
        assert_eq!(resolved[0].environments, envs(&["staging-1", "staging-2"]));
    }

    #[test]
    fn empty_groups_are_skipped_and_other_omitted_when_empty() {
        let catalog = envs(&["prod-1"]);
        let groups = vec![
            EnvironmentGroup::new("dev", "Dev").with_pattern("dev-*"),
            EnvironmentGroup::new("prod", "Prod").with_environments(["prod-1"]),
        ];

        let resolved = resolve_groups(&catalog, &groups);

        assert_eq!(summary(&resolved), vec![("Prod".to_string(), envs(&["prod-1"]))]);
    }

    #[test]
    fn members_outside_catalog_are_ignored() {
        let catalog = envs(&["prod-1"]);
        let groups = vec![EnvironmentGroup::new("g", "G").with_environments(["ghost", "prod-1"])];

        let resolved = resolve_groups(&catalog, &groups);
        assert_eq!(resolved[0].environments, envs(&["prod-1"]));
    }

    #[test]
    fn blank_pattern_degrades_to_members() {
        let catalog = envs(&["a", "b"]);
        let groups = vec![EnvironmentGroup::new("g", "G")
            .with_pattern("")
            .with_environments(["b"])];

        let resolved = resolve_groups(&catalog, &groups);
        assert_eq!(
            summary(&resolved),
            vec![
                ("G".to_string(), envs(&["b"])),
                ("Other".to_string(), envs(&["a"])),
            ]
        );
    }

    #[test]
    fn custom_other_name() {
        let options = GroupingOptions {
            other_name: "Ungrouped".to_string(),
            ..GroupingOptions::default()
        };
        let resolved = resolve_groups_with(&envs(&["x"]), &[], &options);
        assert_eq!(resolved[0].name(), "Ungrouped");
        assert_eq!(resolved[0].id(), OTHER_GROUP_ID);
    }

    #[test]
    fn uncompilable_pattern_degrades_to_members() {
        let catalog = envs(&["prod-1", "prod-2", "dev-1"]);
        let groups = vec![EnvironmentGroup::new("prod", "Production")
            .with_pattern("prod-*")
            .with_environments(["prod-2"])];

        let resolved = resolve_groups(&catalog, &groups);
        assert_eq!(resolved[0].environments, envs(&["prod-1", "prod-2"]));

        let options = GroupingOptions {
            pattern_size_limit: 16,
            ..GroupingOptions::default()
        };
        assert!(compile_pattern(&groups[0], options.pattern_size_limit).is_none());

        let resolved = resolve_groups_with(&catalog, &groups, &options);

        assert_eq!(
            summary(&resolved),
            vec![
                ("Production".to_string(), envs(&["prod-2"])),
                ("Other".to_string(), envs(&["prod-1", "dev-1"])),
            ]
        );
        assert_eq!(resolved[0].origin, GroupOrigin::Explicit);
    }

    #[test]
    fn contains_finds_owner() {
        let resolved = resolve_groups(&envs(&["dev-1", "prod-1"]), &[]);
        let owner = resolved.iter().find(|group| group.contains("prod-1"));
        assert_eq!(owner.map(ResolvedGroup::id), Some("auto-prod"));
        assert!(!resolved.iter().any(|group| group.contains("qa-1")));
    }

    #[test]
    fn empty_catalog_yields_no_groups() {
        assert!(resolve_groups(&envs(&[]), &[]).is_empty());
        assert!(resolve_groups(&envs(&[]), &[EnvironmentGroup::new("g", "G")]).is_empty());
    }
}
