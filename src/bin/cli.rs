//! CFTP CLI Client
//!
//! Runs one command given on the command line, or an interactive prompt.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cftp::network::Reply;
use cftp::{Client, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// CFTP CLI
#[derive(Parser, Debug)]
#[command(name = "cftp-cli")]
#[command(about = "Client for the CFTP file transfer server")]
#[command(version)]
struct Args {
    /// Server address or hostname
    #[arg(short, long)]
    address: String,

    /// Server port
    #[arg(short, long, default_value_t = cftp::config::DEFAULT_PORT)]
    port: u16,

    /// Directory fetched files are written into
    #[arg(long, default_value_os_t = std::env::temp_dir())]
    staging_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the server for its unix timestamp
    Ping,

    /// Fetch a file from the server
    Get {
        /// Remote file name
        name: String,
    },

    /// Send a local file to the server
    Put {
        /// Local file path
        path: PathBuf,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cftp=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let config = Config::builder()
        .address(&args.address)
        .port(args.port)
        .staging_dir(&args.staging_dir)
        .build();

    if let Err(e) = config.validate_client() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    let client = Client::new(config);

    let result = match args.command {
        Some(Commands::Ping) => client.ping().map(Reply::Pong),
        Some(Commands::Get { name }) => client.get(&name).map(Reply::Received),
        Some(Commands::Put { path }) => client.put(&path).map(Reply::Sent),
        None => {
            println!("Using Server: {}:{}", args.address, args.port);
            prompt(&client);
            return;
        }
    };

    match result {
        Ok(reply) => print_reply(&reply),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Interactive loop until `quit` or end of input
fn prompt(client: &Client) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };

        match line.trim() {
            "" => continue,
            "quit" => break,
            "help" => print_help(),
            command => match client.execute(command) {
                Ok(reply) => print_reply(&reply),
                Err(e) => eprintln!("Error: {}", e),
            },
        }
    }

    println!("Bye!");
}

fn print_reply(reply: &Reply) {
    match reply {
        Reply::Pong(timestamp) => println!("Server Said: pong: {}", timestamp),
        Reply::Received(report) => {
            println!("Received {} ({} bytes)", report.name, report.bytes)
        }
        Reply::Sent(report) => println!("Sent {} ({} bytes)", report.name, report.bytes),
    }
}

fn print_help() {
    println!("Available commands:");
    println!(" * ping - returns an unix timestamp from the server");
    println!(" * get:filename - gets a file, if possible");
    println!(" * put:filename - sends a file, if possible");
    println!(" * quit - leave the prompt");
}
