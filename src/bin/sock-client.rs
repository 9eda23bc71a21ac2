use std::net::SocketAddr;
use std::process::exit;

use clap::{Parser, Subcommand};
use serde_json::json;

use sockserver::{Response, SockClient};

const DEFAULT_ADDR: &str = "127.0.0.1:8888";

#[derive(Parser)]
#[command(name = "sock-client", version, about = "A client for sock-server")]
struct Cli {
    /// Server address
    #[arg(long, default_value = DEFAULT_ADDR, value_name = "IP-PORT", global = true)]
    addr: SocketAddr,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the server to echo a string
    Echo {
        /// Text to echo
        data: String,
    },
    /// Add two integers
    Add {
        /// First operand
        #[arg(allow_negative_numbers = true)]
        num1: i64,
        /// Second operand
        #[arg(allow_negative_numbers = true)]
        num2: i64,
    },
    /// Sum a list of integers
    AddMany {
        /// Values to sum
        #[arg(allow_negative_numbers = true)]
        nums: Vec<i64>,
    },
    /// Count the characters of a string
    CharCount {
        /// Text to count
        text: String,
        /// Only count this character
        #[arg(long)]
        find: Option<char>,
    },
    /// View or change the shared inventory
    Inventory {
        #[command(subcommand)]
        task: InventoryTask,
    },
    /// Send text verbatim as one request
    Raw {
        /// Request text, normally a JSON object
        text: String,
    },
}

#[derive(Subcommand)]
enum InventoryTask {
    /// List every product
    View,
    /// Add stock for a product
    Add {
        /// Product name
        product: String,
        /// Units to add
        quantity: u64,
    },
    /// Buy units of a product
    Buy {
        /// Product name
        product: String,
        /// Units to buy
        quantity: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut client = SockClient::connect(cli.addr).unwrap_or_else(|e| {
        eprintln!("Failed to connect to server: {}", e);
        exit(1);
    });

    match client.send_raw(&request_text(cli.command)) {
        Ok(response) => print_response(&response),
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    }
}

/// Builds the frame payload for a command.
fn request_text(command: Commands) -> String {
    let request = match command {
        Commands::Raw { text } => return text,
        Commands::Echo { data } => json!({"type": "echo", "data": data}),
        Commands::Add { num1, num2 } => json!({"type": "add", "num1": num1, "num2": num2}),
        Commands::AddMany { nums } => json!({"type": "addmany", "nums": nums}),
        Commands::CharCount { text, find } => match find {
            Some(c) => json!({
                "type": "charcount",
                "count": text,
                "findchar": true,
                "find": c.to_string(),
            }),
            None => json!({"type": "charcount", "count": text, "findchar": false}),
        },
        Commands::Inventory { task } => match task {
            InventoryTask::View => json!({"type": "inventory", "task": "view"}),
            InventoryTask::Add { product, quantity } => json!({
                "type": "inventory",
                "task": "add",
                "productName": product,
                "quantity": quantity,
            }),
            InventoryTask::Buy { product, quantity } => json!({
                "type": "inventory",
                "task": "buy",
                "productName": product,
                "quantity": quantity,
            }),
        },
    };
    request.to_string()
}

fn print_response(response: &Response) {
    match serde_json::to_string(response) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    }
    if !response.ok {
        exit(1);
    }
}
