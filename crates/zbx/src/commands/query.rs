//! Query commands: groups, hosts, apps, items, triggers and version.
//!
//! Every command parses its filter flags, resolves them through a
//! [`FilterResolver`] and prints a table or JSON. When an exact name filter
//! ends up selecting nothing, a hint naming the closest existing name is
//! printed on stderr.

use zabbix_api_rs::client::ZabbixClient;
use zabbix_api_rs::config::ConnectionConfig;
use zabbix_api_rs::models::{Application, Named};
use zabbix_api_rs::query::ShowTriggers;
use zabbix_cache_rs::filter::Filter;
use zabbix_cache_rs::{
    AppsResolution, CachingProxy, FilterResolver, InventorySource, ItemOptions, QueryFilters,
};

use super::suggest::{find_similar_name, format_no_match};
use super::{CommandContext, Result};
use crate::cli::FilterArgs;
use crate::output::{
    format_apps_json, format_apps_table, format_groups_json, format_groups_table,
    format_hosts_json, format_hosts_table, format_items_json, format_items_table,
    format_triggers_json, format_triggers_table,
};

/// Resolver over the HTTP client and its caching proxy.
pub type Resolver = FilterResolver<ZabbixClient, CachingProxy<ZabbixClient>>;

/// Connects a resolver for one CLI invocation.
pub fn connect(config: &ConnectionConfig) -> Result<Resolver> {
    Ok(FilterResolver::connect(config)?)
}

/// Options for the items command.
pub struct ItemsOptions<'a> {
    pub filters: &'a FilterArgs,
    pub item: &'a str,
    pub options: ItemOptions,
}

/// Options for the triggers command.
pub struct TriggersOptions<'a> {
    pub filters: &'a FilterArgs,
    pub show_triggers: ShowTriggers,
    pub hide_maintenance: bool,
}

fn parse_filters(filters: &FilterArgs, item: &str) -> Result<QueryFilters> {
    Ok(QueryFilters::parse(
        &filters.group,
        &filters.host,
        &filters.app,
        item,
    )?)
}

/// Executes the groups command.
pub async fn execute_groups(ctx: &CommandContext, resolver: &Resolver, group: &str) -> Result<()> {
    let group = Filter::parse(group)?;
    let groups = resolver.get_groups(group.as_ref()).await?;

    if groups.is_empty() {
        hint(ctx, explain_empty(resolver, &QueryFilters { group, ..Default::default() }).await?);
    }

    if ctx.json_output {
        println!("{}", format_groups_json(&groups)?);
    } else if !ctx.quiet {
        print!("{}", format_groups_table(&groups, ctx.use_colors));
    }
    Ok(())
}

/// Executes the hosts command.
pub async fn execute_hosts(
    ctx: &CommandContext,
    resolver: &Resolver,
    group: &str,
    host: &str,
) -> Result<()> {
    let filters = QueryFilters {
        group: Filter::parse(group)?,
        host: Filter::parse(host)?,
        ..Default::default()
    };
    let hosts = resolver
        .get_hosts(filters.group.as_ref(), filters.host.as_ref())
        .await?;

    if hosts.is_empty() {
        hint(ctx, explain_empty(resolver, &filters).await?);
    }

    if ctx.json_output {
        println!("{}", format_hosts_json(&hosts)?);
    } else if !ctx.quiet {
        print!("{}", format_hosts_table(&hosts, ctx.use_colors));
    }
    Ok(())
}

/// Executes the apps command.
///
/// Without an application filter every application of the selected hosts
/// is listed.
pub async fn execute_apps(
    ctx: &CommandContext,
    resolver: &Resolver,
    filters: &FilterArgs,
) -> Result<()> {
    let filters = parse_filters(filters, "")?;
    let apps = resolve_apps(resolver, &filters).await?;

    if apps.is_empty() {
        hint(ctx, explain_empty(resolver, &filters).await?);
    }

    if ctx.json_output {
        println!("{}", format_apps_json(&apps)?);
    } else if !ctx.quiet {
        print!("{}", format_apps_table(&apps, ctx.use_colors));
    }
    Ok(())
}

async fn resolve_apps(resolver: &Resolver, filters: &QueryFilters) -> Result<Vec<Application>> {
    let resolution = resolver
        .get_apps(
            filters.group.as_ref(),
            filters.host.as_ref(),
            filters.app.as_ref(),
        )
        .await?;

    Ok(match resolution {
        AppsResolution::Resolved(apps) => apps,
        AppsResolution::Unfiltered { hostids } => resolver.proxy().get_apps(&hostids).await?,
    })
}

/// Executes the items command.
pub async fn execute_items(
    ctx: &CommandContext,
    resolver: &Resolver,
    opts: &ItemsOptions<'_>,
) -> Result<()> {
    let filters = parse_filters(opts.filters, opts.item)?;
    let items = resolver
        .get_items(
            filters.group.as_ref(),
            filters.host.as_ref(),
            filters.app.as_ref(),
            filters.item.as_ref(),
            &opts.options,
        )
        .await?;

    if items.is_empty() {
        let hint_text = explain_empty(resolver, &filters).await?;
        let hint_text = match hint_text {
            Some(text) => Some(text),
            None => explain_empty_item(resolver, &filters, &opts.options).await?,
        };
        hint(ctx, hint_text);
    }

    if ctx.json_output {
        println!("{}", format_items_json(&items)?);
    } else if !ctx.quiet {
        print!("{}", format_items_table(&items, ctx.use_colors));
    }
    Ok(())
}

/// Executes the triggers command.
pub async fn execute_triggers(
    ctx: &CommandContext,
    resolver: &Resolver,
    opts: &TriggersOptions<'_>,
) -> Result<()> {
    let filters = parse_filters(opts.filters, "")?;
    let triggers = resolver
        .get_triggers(
            filters.group.as_ref(),
            filters.host.as_ref(),
            filters.app.as_ref(),
            opts.show_triggers,
            opts.hide_maintenance,
        )
        .await?;

    if triggers.is_empty() {
        hint(ctx, explain_empty(resolver, &filters).await?);
    }

    if ctx.json_output {
        println!("{}", format_triggers_json(&triggers)?);
    } else if !ctx.quiet {
        print!("{}", format_triggers_table(&triggers, ctx.use_colors));
    }
    Ok(())
}

/// Executes the version command.
pub async fn execute_version(ctx: &CommandContext, resolver: &Resolver) -> Result<()> {
    let version = resolver.get_version().await?;
    let url = resolver.api().url();

    if ctx.json_output {
        let output = serde_json::json!({ "version": version, "url": url });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Zabbix API {} at {}", version, url);
    }
    Ok(())
}

fn hint(ctx: &CommandContext, text: Option<String>) {
    if let (Some(text), false) = (text, ctx.quiet) {
        eprintln!("{}", text);
    }
}

/// Finds the first exact group or host filter that selects nothing and
/// suggests a close existing name for it.
async fn explain_empty(resolver: &Resolver, filters: &QueryFilters) -> Result<Option<String>> {
    if let Some(Filter::Exact(name)) = &filters.group {
        if resolver.get_groups(filters.group.as_ref()).await?.is_empty() {
            let groups = resolver.get_groups(None).await?;
            return Ok(Some(no_match("host group", name, &groups)));
        }
    }

    if let Some(Filter::Exact(name)) = &filters.host {
        if resolver
            .get_hosts(filters.group.as_ref(), filters.host.as_ref())
            .await?
            .is_empty()
        {
            let hosts = resolver.get_hosts(filters.group.as_ref(), None).await?;
            return Ok(Some(no_match("host", name, &hosts)));
        }
    }

    Ok(None)
}

async fn explain_empty_item(
    resolver: &Resolver,
    filters: &QueryFilters,
    options: &ItemOptions,
) -> Result<Option<String>> {
    let Some(Filter::Exact(name)) = &filters.item else {
        return Ok(None);
    };
    let items = resolver
        .get_all_items(
            filters.group.as_ref(),
            filters.host.as_ref(),
            filters.app.as_ref(),
            options,
        )
        .await?;
    Ok(Some(no_match("item", name, &items)))
}

fn no_match<T: Named>(kind: &str, name: &str, candidates: &[T]) -> String {
    let suggestion = find_similar_name(name, candidates.iter().map(Named::name));
    format_no_match(kind, name, suggestion.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zabbix_api_rs::models::Group;

    #[test]
    fn test_parse_filters() {
        let args = FilterArgs {
            group: "Linux servers".to_string(),
            host: "/^web-/".to_string(),
            app: String::new(),
        };
        let filters = parse_filters(&args, "/load/i").unwrap();
        assert_eq!(filters.group, Some(Filter::Exact("Linux servers".to_string())));
        assert!(filters.host.as_ref().is_some_and(Filter::is_pattern));
        assert!(filters.app.is_none());
        assert!(filters.item.as_ref().is_some_and(Filter::is_pattern));
    }

    #[test]
    fn test_parse_filters_rejects_bad_pattern() {
        let args = FilterArgs {
            host: "/web-(/".to_string(),
            ..Default::default()
        };
        assert!(parse_filters(&args, "").is_err());
    }

    #[test]
    fn test_no_match_suggests_closest_name() {
        let groups = vec![
            Group {
                groupid: "2".to_string(),
                name: "Linux servers".to_string(),
            },
            Group {
                groupid: "4".to_string(),
                name: "Zabbix servers".to_string(),
            },
        ];
        assert_eq!(
            no_match("host group", "Linux server", &groups),
            "No host group named 'Linux server'. Did you mean 'Linux servers'?"
        );
        assert_eq!(
            no_match("host group", "Databases", &groups),
            "No host group named 'Databases'."
        );
    }
}
