use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use cwrc_entity_lookup::{
    EntityLookup, EntityLookupClient, EntityRecord, EntityType, LookupConfig, ProjectLookupConfig,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cwrc-lookup", version, about = "Look up entities in the CWRC repository")]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "CWRC_LOOKUP_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    search_root: Option<String>,

    #[arg(long, global = true)]
    entity_root: Option<String>,

    #[arg(long, global = true)]
    project_logo_root: Option<String>,

    /// Project metadata document used to attach logos
    #[arg(long, global = true)]
    project_lookup_url: Option<String>,

    /// Top-level collection PID filed under the `cwrc` namespace
    #[arg(long, global = true)]
    cwrc_project_id: Option<String>,

    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search one entity type, or `all` of them at once
    Search {
        #[arg(value_parser = parse_target)]
        target: Target,
        query: String,
    },
    /// Print the search URI without calling the service
    Uri {
        #[arg(value_parser = parse_entity_type)]
        entity_type: EntityType,
        query: String,
    },
    /// Fetch and print the project catalog
    Projects,
}

#[derive(Clone, Copy)]
enum Target {
    One(EntityType),
    All,
}

fn parse_entity_type(s: &str) -> Result<EntityType, cwrc_entity_lookup::Error> {
    s.parse()
}

fn parse_target(s: &str) -> Result<Target, cwrc_entity_lookup::Error> {
    if s.eq_ignore_ascii_case("all") {
        Ok(Target::All)
    } else {
        s.parse().map(Target::One)
    }
}

impl Cli {
    fn lookup_config(&self) -> anyhow::Result<LookupConfig> {
        let mut config =
            LookupConfig::load(self.config.as_deref()).context("Failed to load configuration")?;

        if let Some(root) = &self.search_root {
            config.search_root.clone_from(root);
        }
        if let Some(root) = &self.entity_root {
            config.entity_root.clone_from(root);
        }
        if let Some(root) = &self.project_logo_root {
            config.project_logo_root.clone_from(root);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if self.project_lookup_url.is_some() || self.cwrc_project_id.is_some() {
            let project_lookup = config
                .project_lookup
                .get_or_insert_with(ProjectLookupConfig::default);
            if let Some(url) = &self.project_lookup_url {
                project_lookup.project_lookup_url.clone_from(url);
            }
            if let Some(id) = &self.cwrc_project_id {
                project_lookup.cwrc_project_id = Some(id.clone());
            }
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let config = cli.lookup_config()?;
    let project_lookup = config.project_lookup.clone();
    let client = EntityLookupClient::new(config).context("Failed to create lookup client")?;

    match cli.command {
        Command::Uri { entity_type, query } => {
            println!("{}", client.lookup_uri(&query, entity_type).await);
        }
        Command::Projects => {
            let project_lookup = project_lookup
                .context("No project lookup URL configured (use --project-lookup-url)")?;
            let catalog = client
                .set_project_lookup_config(project_lookup)
                .await
                .context("Project lookup failed")?;
            println!("{}", serde_json::to_string_pretty(&*catalog)?);
        }
        Command::Search { target, query } => {
            if let Some(project_lookup) = project_lookup {
                // Logos are optional, so a failed refresh does not stop the search
                if let Err(e) = client.set_project_lookup_config(project_lookup).await {
                    warn!("Continuing without project logos: {}", e);
                }
            }

            match target {
                Target::One(entity_type) => {
                    let records = client
                        .search(&query, entity_type)
                        .await
                        .with_context(|| format!("{entity_type} lookup for '{query}' failed"))?;
                    println!("{}", serde_json::to_string_pretty(&records)?);
                }
                Target::All => {
                    let results = search_all(&client, &query).await?;
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
            }
        }
    }

    Ok(())
}

/// Run the four entity searches concurrently
async fn search_all(
    client: &EntityLookupClient,
    query: &str,
) -> anyhow::Result<BTreeMap<EntityType, Vec<EntityRecord>>> {
    let searches = EntityType::ALL
        .into_iter()
        .map(|entity_type| async move { (entity_type, client.search(query, entity_type).await) });

    let mut results = BTreeMap::new();
    for (entity_type, outcome) in futures::future::join_all(searches).await {
        let records =
            outcome.with_context(|| format!("{entity_type} lookup for '{query}' failed"))?;
        results.insert(entity_type, records);
    }

    info!(
        "Found {} records across all entity types",
        results.values().map(Vec::len).sum::<usize>()
    );
    Ok(results)
}
