//! valnote CLI Client
//!
//! Interactive command-line client for value notation interpreter servers.
//!
//! # Usage
//!
//! ```bash
//! # Connect to local server
//! valnote
//!
//! # Connect to remote server with a password
//! valnote --host example.com --port 8001 --password securepassword
//!
//! # Execute single command
//! valnote -c "Context listVariables;"
//!
//! # Settings from a config file
//! valnote --config ~/.config/valnote.toml
//! ```

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use valnote_core::Value;
use valnote_transport::{Client, ClientConfig, ClientError};

use crate::config::FileConfig;

/// valnote Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "valnote")]
#[command(author, version, about = "valnote CLI - value notation interpreter client")]
struct Args {
    /// Server hostname
    #[arg(short = 'H', long, env = "VALNOTE_HOST")]
    host: Option<String>,

    /// Server port
    #[arg(short, long, env = "VALNOTE_PORT")]
    port: Option<u16>,

    /// Password for authentication
    #[arg(short = 'a', long, env = "VALNOTE_PASSWORD")]
    password: Option<String>,

    /// Timeout in seconds for connect and each request
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Configuration file path
    #[arg(long, env = "VALNOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Execute command and exit
    #[arg(short, long)]
    command: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Quiet mode (no banner)
    #[arg(short, long)]
    quiet: bool,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Flags override the config file, which overrides the defaults
    fn client_config(&self, file: &FileConfig) -> ClientConfig {
        let mut config = file.server.clone();
        if let Some(ref host) = self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(ref password) = self.password {
            config.password = Some(password.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file = match args.config {
        Some(ref path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = args.client_config(&file);
    let json = args.json || file.output.json;
    let addr = config.address();

    let mut client = Client::connect(&config)
        .await
        .with_context(|| format!("Failed to connect to {}", addr))?;

    if !args.quiet && args.command.is_none() {
        let peer = client.connection().peer_addr();
        let auth_status = if config.password.is_some() { " (authenticated)" } else { "" };
        println!(
            "{}",
            format!(
                r#"
  valnote  Connected to {}{}
           Type 'help' for commands, 'quit' to exit
"#,
                peer, auth_status
            )
            .cyan()
        );
    }

    // Single command mode
    if let Some(ref cmd) = args.command {
        let value = client.execute(cmd).await?;
        print_value(&value, json);
        return Ok(());
    }

    // Interactive mode
    let mut rl = DefaultEditor::new()?;
    let history_path = dirs_next::home_dir()
        .map(|p| p.join(".valnote_history"))
        .unwrap_or_default();

    let _ = rl.load_history(&history_path);

    loop {
        let prompt = format!("{}> ", "valnote".green());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Handle local commands
                match line.to_lowercase().as_str() {
                    "quit" | "exit" => break,
                    "help" => {
                        print_help();
                        continue;
                    }
                    "clear" => {
                        print!("\x1B[2J\x1B[1;1H");
                        continue;
                    }
                    _ => {}
                }

                // Execute remote command
                match client.execute(line).await {
                    Ok(value) => print_value(&value, json),
                    Err(ClientError::Decode(e)) if e.is_server_error() => {
                        println!("{}", e.message().red());
                    }
                    Err(e) if e.is_connection_lost() => {
                        eprintln!("{} {}", "Error:".red(), e);

                        // Try to reconnect
                        match Client::connect(&config).await {
                            Ok(new_client) => {
                                client = new_client;
                                println!("{}", "Reconnected.".yellow());
                            }
                            Err(e) => {
                                warn!(error = %e, "Reconnect failed");
                                eprintln!("{}", "Connection lost.".red());
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{} {}", "Error:".red(), e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
    Ok(())
}

fn print_value(value: &Value, json: bool) {
    if json {
        match serde_json::to_string_pretty(&value.to_json()) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("{} {}", "Error:".red(), e),
        }
        return;
    }

    match value {
        Value::Null => println!("{}", "(null)".dimmed()),
        Value::Bool(_) | Value::Integer(_) | Value::Float(_) => println!("{}", value.to_string().yellow()),
        Value::Char(_) | Value::String(_) => println!("{}", value.to_string().green()),
        Value::Vector(items) => print_items(items.iter()),
        Value::Set(items) => print_items(items.iter()),
        Value::Dictionary(map) => {
            if map.is_empty() {
                println!("{}", "(empty dictionary)".dimmed());
            }
            for (k, v) in map {
                println!("{} => {}", k.to_string().cyan(), v);
            }
        }
        Value::Symbol(_) | Value::Tuple(..) => println!("{}", value),
    }
}

fn print_items<'a>(items: impl ExactSizeIterator<Item = &'a Value>) {
    if items.len() == 0 {
        println!("{}", "(empty)".dimmed());
        return;
    }
    for (i, item) in items.enumerate() {
        println!("{}) {}", i + 1, item);
    }
}

fn print_help() {
    println!(
        r#"
{}

{}
  Integer create: i withValue: 42;       Create a variable
  i get;                                 Read a variable
  Context listVariables;                 List variables
  Context listNamespaces;                List namespaces

{}
  null  true  'c'  42  10.99  "text"
  [1,2]  {{1,2}}  (("key",1))

{}
  help                                   Show this help
  clear                                  Clear screen
  quit/exit                              Exit CLI
"#,
        "valnote".cyan().bold(),
        "Server commands".yellow().bold(),
        "Values".yellow().bold(),
        "Local".yellow().bold(),
    );
}

// Minimal dirs_next replacement for home directory
mod dirs_next {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
    }
}
