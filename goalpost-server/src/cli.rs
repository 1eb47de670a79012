use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::path::PathBuf;

/// CLI arguments for goalpost-server
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub allow_signup: Option<bool>,
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: Option<u64>,
    pub config_file: Option<PathBuf>,
    pub max_request_size: Option<usize>,
    pub cors_origin: Option<String>,
    pub log_level: Option<String>,
}

/// Build the clap command
pub fn command() -> Command {
    Command::new("goalpost-server")
        .version(goalpost::VERSION)
        .about("HTTP API server for the Goalpost goal tracker")
        .long_about(
            r#"Goalpost Server exposes registration, login, goals and friend
relationships as a JSON REST API for the mobile client.

The server can be configured through command line arguments or environment
variables. Command line arguments take precedence over environment variables.

Examples:
  goalpost-server --port 8080
  goalpost-server --config goalpost.toml --allow-signup=false
  goalpost-server --log-level debug"#,
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on")
                .long_help(
                    "Port number for the HTTP server to listen on.
Environment variable: GOALPOST_PORT",
                )
                .value_hint(ValueHint::Other)
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .long_help(
                    "Path to a TOML, YAML or JSON file with storage and logging settings.
Environment variable: GOALPOST_CONFIG_FILE",
                )
                .value_hint(ValueHint::FilePath)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("allow_signup")
                .long("allow-signup")
                .value_name("BOOL")
                .help("Allow user registration")
                .long_help(
                    "Allow new users to register accounts via the register API.
Environment variable: GOALPOST_ALLOW_SIGNUP",
                )
                .value_parser(clap::value_parser!(bool)),
        )
        .arg(
            Arg::new("jwt_secret")
                .long("jwt-secret")
                .value_name("SECRET")
                .help("JWT signing secret")
                .long_help(
                    "Secret key used for signing JWT tokens. If not provided, one
will be generated at startup and tokens will not survive a restart.
Environment variable: GOALPOST_JWT_SECRET",
                )
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("jwt_expiration")
                .long("jwt-expiration")
                .value_name("HOURS")
                .help("JWT token expiration time in hours")
                .long_help(
                    "How long JWT tokens remain valid. Default is 24 hours.
Environment variable: GOALPOST_JWT_EXPIRATION_HOURS",
                )
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("cors_origin")
                .long("cors-origin")
                .value_name("ORIGIN")
                .help("Allowed CORS origin")
                .long_help(
                    "Origin allowed to call the API from a browser. Any origin is
allowed when unset.
Environment variable: GOALPOST_CORS_ORIGIN",
                ),
        )
        .arg(
            Arg::new("max_request_size")
                .long("max-request-size")
                .value_name("BYTES")
                .help("Maximum request body size in bytes")
                .long_help(
                    "Maximum size allowed for HTTP request bodies.
Environment variable: GOALPOST_MAX_REQUEST_SIZE",
                )
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Logging level")
                .long_help(
                    "Set the logging level. Valid values: error, warn, info, debug, trace
Environment variable: RUST_LOG",
                )
                .value_parser(["error", "warn", "info", "debug", "trace"]),
        )
        .arg(
            Arg::new("help_env")
                .long("help-env")
                .help("Show all environment variables")
                .action(ArgAction::SetTrue),
        )
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse() -> Self {
        let matches = command().get_matches();

        if matches.get_flag("help_env") {
            Self::print_env_help();
            std::process::exit(0);
        }

        Self::from_matches(&matches)
    }

    /// Extract arguments from parsed matches
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            port: matches.get_one::<u16>("port").copied(),
            allow_signup: matches.get_one::<bool>("allow_signup").copied(),
            jwt_secret: matches.get_one::<String>("jwt_secret").cloned(),
            jwt_expiration_hours: matches.get_one::<u64>("jwt_expiration").copied(),
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            max_request_size: matches.get_one::<usize>("max_request_size").copied(),
            cors_origin: matches.get_one::<String>("cors_origin").cloned(),
            log_level: matches.get_one::<String>("log_level").cloned(),
        }
    }

    fn print_env_help() {
        println!("Goalpost Server Environment Variables");
        println!("=====================================");
        println!();
        println!("Server:");
        println!("  GOALPOST_PORT                  - Server port (default: 5000)");
        println!("  GOALPOST_MAX_REQUEST_SIZE      - Max request body size in bytes (default: 1MB)");
        println!("  GOALPOST_CORS_ORIGIN           - Allowed CORS origin (default: any)");
        println!("  GOALPOST_CONFIG_FILE           - Core configuration file");
        println!();
        println!("Authentication:");
        println!("  GOALPOST_JWT_SECRET            - JWT signing secret (generated if not set)");
        println!("  GOALPOST_JWT_EXPIRATION_HOURS  - JWT expiration in hours (default: 24)");
        println!("  GOALPOST_ALLOW_SIGNUP          - Allow user registration (default: true)");
        println!();
        println!("Storage and logging (core library, nested keys use '__'):");
        println!("  GOALPOST_STORAGE__DATA_DIR             - Data directory");
        println!("  GOALPOST_STORAGE__SURREALDB__ENGINE    - Memory or RocksDB (default: RocksDB)");
        println!("  GOALPOST_STORAGE__SURREALDB__NAMESPACE - SurrealDB namespace (default: goalpost)");
        println!("  GOALPOST_STORAGE__SURREALDB__DATABASE  - SurrealDB database (default: main)");
        println!("  RUST_LOG                               - Log filter (error, warn, info, debug, trace)");
        println!();
        println!("Note: Command line arguments take precedence over environment variables.");
    }
}
