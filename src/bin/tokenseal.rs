use std::io::{self, Write};
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use tokenseal::server::Config;
use tokenseal::{Role, SymmetricKey, TokenCodec, generate_cursor, parse_cursor};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "tokenseal")]
#[command(about = "Issue and inspect session tokens and page tokens", long_about = None)]
#[command(version)]
struct Cli {
    /// Token key, standard base64. Falls back to the configuration file.
    #[arg(short, long, global = true, env = "TOKENSEAL_TOKEN__KEY", hide_env_values = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh random key.
    Keygen {
        /// Key size in bytes (16, 24 or 32)
        #[arg(short, long, default_value = "32")]
        bytes: usize,
    },

    /// Issue a session token.
    Issue {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        org: String,

        #[arg(short, long, help = "contact, viewer, publisher, builder, admin or sys_admin")]
        role: Role,
    },

    /// Validate a session token and print its session.
    Inspect { token: String },

    /// Encode a page token.
    CursorEncode {
        /// Id of the last row on the page
        #[arg(short, long)]
        id: String,

        /// Creation time of the last row, seconds since the Unix epoch
        #[arg(short, long)]
        ts_seconds: Option<u64>,
    },

    /// Decode a page token.
    CursorDecode { token: String },
}

fn print_colored(color: Color, text: &str) {
    let mut stdout = io::stdout();
    execute!(stdout, SetForegroundColor(color), Print(text), ResetColor).ok();
    stdout.flush().ok();
}

fn println_colored(color: Color, text: &str) {
    print_colored(color, text);
    println!();
}

fn field(label: &str, value: &str) {
    print_colored(Color::DarkGrey, &format!("{label:<12}"));
    println!("{value}");
}

fn resolve_key(flag: Option<String>) -> Result<SymmetricKey, String> {
    if let Some(key) = flag {
        return SymmetricKey::from_base64(&key).map_err(|e| format!("--key: {e}"));
    }

    let config = Config::from_env().map_err(|e| format!("failed to load configuration: {e}"))?;
    config.validate()?;
    debug!("token key loaded from configuration");
    SymmetricKey::from_base64(&config.token.key).map_err(|e| e.to_string())
}

fn unix_seconds(at: SystemTime) -> String {
    match at.duration_since(UNIX_EPOCH) {
        Ok(d) if d.subsec_nanos() == 0 => d.as_secs().to_string(),
        Ok(d) => format!("{}.{:09}", d.as_secs(), d.subsec_nanos()),
        Err(_) => "before epoch".to_string(),
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Keygen { bytes } => {
            let key = SymmetricKey::generate(bytes).map_err(|e| e.to_string())?;
            println!("{}", key.to_base64());
        }

        Commands::Issue { user, org, role } => {
            let codec = TokenCodec::new(resolve_key(cli.key)?);
            let issued = codec.issue(&user, &org, role).map_err(|e| e.to_string())?;

            println_colored(Color::Green, "Token issued");
            field("token", &issued.token);
            field("expires_at", &unix_seconds(issued.expires_at));
        }

        Commands::Inspect { token } => {
            let codec = TokenCodec::new(resolve_key(cli.key)?);
            let session = codec
                .validate(&token)
                .map_err(|e| format!("token rejected ({:?}): {e}", e.kind()))?;

            println_colored(Color::Green, "Token valid");
            field("user_id", session.user_id());
            field("org_id", session.org_id());
            field("role", session.role().as_str());
        }

        Commands::CursorEncode { id, ts_seconds } => {
            let bound_ts = ts_seconds.map(|s| UNIX_EPOCH + Duration::from_secs(s));
            let token = generate_cursor(bound_ts, &id).map_err(|e| e.to_string())?;
            println!("{token}");
        }

        Commands::CursorDecode { token } => {
            let cursor = parse_cursor(&token).map_err(|e| e.to_string())?;

            if cursor.is_start() {
                println_colored(Color::Yellow, "Start of list");
                return Ok(());
            }

            field("prev_id", cursor.prev_id());
            field(
                "bound_ts",
                &cursor
                    .bound_ts()
                    .map(unix_seconds)
                    .unwrap_or_else(|| "none".to_string()),
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let mut stderr = io::stderr();
            execute!(
                stderr,
                SetForegroundColor(Color::Red),
                Print(format!("Error: {e}\n")),
                ResetColor
            )
            .ok();
            ExitCode::FAILURE
        }
    }
}
