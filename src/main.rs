//! Command-line front end for the FSM router.
//!
//! ```text
//! fsm-router --config router.toml describe
//! fsm-router --config router.toml route home users/7 users/7/edit
//! fsm-router --config router.toml watch --location nav.txt
//! ```
//!
//! Handlers print one line per dispatch to stdout; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use fsm_router::config::{load_config, RouteConfig};
use fsm_router::lifecycle::{build_router, signals, HandlerFactory};
use fsm_router::observability::logging;
use fsm_router::{FileLocation, Handler, Hook, Navigation, NavigationSource, Special};

#[derive(Parser)]
#[command(name = "fsm-router")]
#[command(about = "State-machine driven fragment router", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print states, transitions and routes as JSON
    Describe,
    /// Route each path in order, then print the final state
    Route {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Route every fragment written to a location file until Ctrl-C
    Watch {
        #[arg(short, long)]
        location: PathBuf,
    },
}

/// Handlers that print what they were called with.
struct PrintHandlers;

fn print_line(label: String, nav: &Navigation) {
    let params = serde_json::to_string(&nav.params).unwrap_or_default();
    println!("{label} path={} route={} params={params}", nav.path, nav.route);
}

impl HandlerFactory for PrintHandlers {
    fn route_handler(&self, route: &RouteConfig) -> Handler {
        let name = route.name.clone();
        Hook::sync(move |nav: Navigation| print_line(format!("[{name}]"), &nav))
    }

    fn special_handler(&self, special: Special) -> Handler {
        Hook::sync(move |nav: Navigation| print_line(format!("[{}]", special.code()), &nav))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    logging::init(&config.logging);

    tracing::info!(config = %cli.config.display(), "fsm-router v0.1.0 starting");

    match cli.command {
        Commands::Describe => {
            let router = build_router(&config, None, &PrintHandlers)?;
            println!("{}", serde_json::to_string_pretty(&router.snapshot())?);
        }
        Commands::Route { paths } => {
            let router = build_router(&config, None, &PrintHandlers)?;
            for path in paths {
                router.route(path).await;
            }
            println!("state={}", router.state_get());
        }
        Commands::Watch { location } => {
            let source: Arc<dyn NavigationSource> = Arc::new(FileLocation::open(&location)?);
            let router = build_router(&config, Some(source), &PrintHandlers)?;
            let listener = router.listen(signals::interrupted())?;
            router.check_hash().await;
            listener.await?;
            println!("state={}", router.state_get());
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
