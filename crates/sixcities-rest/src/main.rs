//! Six Cities REST service entry point.

use std::path::PathBuf;

use sixcities_config::ConfigLoader;
use sixcities_rest::app::{server_config, App};
use sixcities_server::Server;
use sixcities_telemetry::init_logging;
use tracing::{error, info};

const SERVICE_NAME: &str = "six-cities";
const ENV_PREFIX: &str = "SIXCITIES";

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("{SERVICE_NAME} {}", sixcities_rest::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { config }
    }
}

const HELP: &str = r"Six Cities - rental offers REST service

USAGE:
    six-cities [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES (override the file; a .env file is read too):
  Required:
    SIXCITIES__AUTH__JWT_SECRET                Token signing secret
    SIXCITIES__AUTH__SALT                      Password hashing salt

  Server:
    SIXCITIES__SERVER__HTTP_ADDR               Bind address (default: 0.0.0.0:4000)
    SIXCITIES__SERVER__REQUEST_TIMEOUT_SECS    Per-request timeout (default: 30)
    SIXCITIES__SERVER__MAX_BODY_SIZE           Request body limit in bytes (default: 10485760)
    SIXCITIES__SERVER__SHUTDOWN_TIMEOUT_SECS   Drain time on shutdown (default: 30)

  Uploads, served under /static:
    SIXCITIES__STORAGE__UPLOAD_DIRECTORY       Upload directory (default: upload)

  Unauthenticated callers act as:
    SIXCITIES__ANONYMOUS__EMAIL                Account email (default: anonymous@six-cities.local)
    SIXCITIES__ANONYMOUS__NAME                 Account name (default: Anonymous)

  Logging:
    SIXCITIES__LOGGING__LEVEL                  Filter directive (default: info)
    SIXCITIES__LOGGING__FORMAT                 json or pretty (default: json)
";

fn print_help() {
    println!("{HELP}");
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let loader = match args.config {
        Some(path) => ConfigLoader::new().with_file(path),
        None => Ok(ConfigLoader::new()),
    };
    let config = match loader
        .and_then(ConfigLoader::with_dotenv)
        .and_then(|loader| loader.with_env_prefix(ENV_PREFIX).load())
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.log_config(SERVICE_NAME)) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    info!(version = sixcities_rest::VERSION, "starting {SERVICE_NAME}");

    let dispatcher = match App::new(&config).await.and_then(|app| app.dispatcher()) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!("Failed to build application: {e:#}");
            std::process::exit(1);
        }
    };

    let server = Server::new(server_config(&config), dispatcher);
    if let Err(e) = server.run().await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
