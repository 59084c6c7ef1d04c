use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use realty_core::types::{
    BuildingQuery, ChillerComparisonQuery, ChillerQuery, ListingQuery, TitleDeedQuery,
};

mod bridge_cmd;
mod gateway_cmd;

use gateway_cmd::Gateway;

#[derive(Parser)]
#[command(name = "realty", about = "Realty gateway CLI - query data tools and bridge stdio tool processes")]
struct Cli {
    /// Gateway server URL
    #[arg(long, env = "REALTY_URL", default_value = "http://localhost:3000")]
    gateway_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tools the gateway exposes
    Tools,

    /// Search property listings
    Search {
        /// Upstream location external id
        #[arg(long)]
        location: String,

        /// for-sale or for-rent
        #[arg(long, default_value = "for-sale")]
        purpose: String,

        #[arg(long)]
        min_price: Option<u64>,

        #[arg(long)]
        max_price: Option<u64>,

        /// apartment, villa or townhouse
        #[arg(long)]
        property_type: Option<String>,
    },

    /// Verify a title deed
    VerifyTitle {
        /// Title deed number
        number: String,
    },

    /// Estimate annual chiller cost
    Chiller {
        /// Provider id (see `realty providers`)
        #[arg(long)]
        provider: String,

        /// Property area in square feet
        #[arg(long)]
        area_sqft: f64,

        /// Annual consumption override in kWh
        #[arg(long)]
        consumption_kwh: Option<f64>,
    },

    /// Rank buildings by chiller cost per square foot
    Compare {
        /// NAME,PROVIDER,AREA_SQFT; repeat for each building
        #[arg(long = "building", required = true, value_parser = parse_building)]
        buildings: Vec<BuildingQuery>,
    },

    /// List chiller providers and their tariffs
    Providers,

    /// Spawn a stdio JSON-RPC tool process and call it directly (no gateway involved)
    Bridge {
        /// Tool name to invoke; omit with --list
        #[arg(long, required_unless_present = "list")]
        tool: Option<String>,

        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,

        /// Ask the process for its tool list instead of invoking a tool
        #[arg(long)]
        list: bool,

        /// Seconds to wait for the response
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Skip the MCP initialize handshake for tools that serve calls immediately
        #[arg(long)]
        no_initialize: bool,

        /// Program and arguments, after `--`
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gateway = Gateway::new(&cli.gateway_url);

    let output = match cli.command {
        Commands::Tools => gateway.get("/api/tools").await?,
        Commands::Search {
            location,
            purpose,
            min_price,
            max_price,
            property_type,
        } => {
            let query = ListingQuery {
                location,
                purpose,
                min_price: min_price.map(Into::into),
                max_price: max_price.map(Into::into),
                property_type,
            };
            gateway.post("/api/bayut/search", &query).await?
        }
        Commands::VerifyTitle { number } => {
            let query = TitleDeedQuery {
                title_deed_number: number,
            };
            gateway.post("/api/dubai-rest/verify-title", &query).await?
        }
        Commands::Chiller {
            provider,
            area_sqft,
            consumption_kwh,
        } => {
            let query = ChillerQuery {
                provider,
                area_sqft,
                estimated_consumption_kwh: consumption_kwh,
            };
            gateway.post("/api/chiller/calculate", &query).await?
        }
        Commands::Compare { buildings } => {
            let query = ChillerComparisonQuery { buildings };
            gateway.post("/api/chiller/compare", &query).await?
        }
        Commands::Providers => gateway.get("/api/chiller/providers").await?,
        Commands::Bridge {
            tool,
            args,
            list,
            timeout_secs,
            no_initialize,
            command,
        } => {
            let action = match tool {
                Some(tool) if !list => bridge_cmd::BridgeAction::Invoke {
                    tool,
                    arguments: bridge_cmd::parse_arguments(args.as_deref())?,
                },
                _ => bridge_cmd::BridgeAction::List,
            };
            let mut command = command.into_iter();
            let program = command
                .next()
                .ok_or_else(|| anyhow::anyhow!("missing tool program"))?;
            bridge_cmd::run(
                program,
                command.collect(),
                Duration::from_secs(timeout_secs),
                !no_initialize,
                action,
            )
            .await?
        }
    };

    gateway_cmd::print(&output)
}

fn parse_building(raw: &str) -> Result<BuildingQuery, String> {
    let mut parts = raw.rsplitn(3, ',');
    let (Some(area), Some(provider), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected NAME,PROVIDER,AREA_SQFT, got '{raw}'"));
    };
    let area_sqft = area
        .trim()
        .parse()
        .map_err(|e| format!("invalid area '{area}': {e}"))?;
    Ok(BuildingQuery {
        name: name.trim().to_string(),
        provider: provider.trim().to_string(),
        area_sqft,
    })
}
