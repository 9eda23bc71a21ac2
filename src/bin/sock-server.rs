use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::exit;

use clap::{Parser, ValueEnum};
use env_logger::{Env, Target};
use log::{error, info};

use sockserver::frame::DEFAULT_MAX_FRAME_LEN;
use sockserver::{
    NaiveThreadPool, Result, ServerConfig, SharedQueueThreadPool, SockServer, ThreadPool,
};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Exit status when the port is missing or the arguments are unusable.
const EXIT_USAGE: i32 = 1;
/// Exit status when the port is not a number in range.
const EXIT_BAD_PORT: i32 = 2;
/// Exit status when the server fails while binding or serving.
const EXIT_SERVER: i32 = 3;

#[derive(Clone, Copy, ValueEnum)]
enum PoolKind {
    /// One thread per connection
    Naive,
    /// Fixed number of workers sharing a queue
    Shared,
}

#[derive(Parser)]
#[command(name = "sock-server", version, about = "A JSON request server")]
struct Cli {
    /// TCP port to listen on
    #[arg(value_name = "PORT")]
    port: Option<String>,

    /// Address of the interface to bind
    #[arg(long, default_value_t = DEFAULT_HOST)]
    host: IpAddr,

    /// How connections are scheduled
    #[arg(long, value_enum, default_value_t = PoolKind::Naive)]
    pool: PoolKind,

    /// Worker count for the shared pool [default: number of CPUs]
    #[arg(long)]
    threads: Option<u32>,

    /// Largest request frame accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_LEN)]
    max_frame_bytes: usize,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            exit(EXIT_USAGE);
        }
        Err(e) => e.exit(),
    };

    let Some(port) = cli.port.as_deref() else {
        eprintln!("Expected arguments: <port(int)>");
        exit(EXIT_USAGE);
    };
    let Ok(port) = port.parse::<u16>() else {
        eprintln!("[Port] must be an integer");
        exit(EXIT_BAD_PORT);
    };

    if let Err(e) = run(&cli, SocketAddr::new(cli.host, port)) {
        error!("{}", e);
        exit(EXIT_SERVER);
    }
}

fn run(cli: &Cli, addr: SocketAddr) -> Result<()> {
    let threads = cli.threads.unwrap_or_else(|| num_cpus::get() as u32);
    let config = ServerConfig {
        max_frame_len: cli.max_frame_bytes,
    };

    info!("sock-server {}", env!("CARGO_PKG_VERSION"));

    match cli.pool {
        PoolKind::Naive => run_with_pool(NaiveThreadPool::new(threads)?, config, addr),
        PoolKind::Shared => {
            info!("Serving at most {} connections at once", threads);
            run_with_pool(SharedQueueThreadPool::new(threads)?, config, addr)
        }
    }
}

fn run_with_pool<P: ThreadPool>(pool: P, config: ServerConfig, addr: SocketAddr) -> Result<()> {
    SockServer::new(pool).with_config(config).serve(addr)
}
