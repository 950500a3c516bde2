//! Command line interface for the customer service

pub mod serve;

use clap::{Args, Parser, Subcommand};

/// Northwind customers - CRUD REST service with a cache-aside repository
#[derive(Parser)]
#[command(name = "northwind-customers")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(ServeArgs),
}

/// Overrides applied on top of the loaded configuration
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Address to bind, e.g. 127.0.0.1
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short)]
    pub port: Option<u16>,
}
