//! Server configuration, from command-line flags or environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use data_loader::DatasetPaths;

#[derive(Debug, Clone, Parser)]
#[command(name = "wholesale-server")]
#[command(about = "HTTP service for wholesale item recommendations")]
pub struct ServerConfig {
    /// Directory holding the three dataset CSV files
    #[arg(long, env = "WHOLESALE_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Companies file, relative to the data directory
    #[arg(long, default_value = data_loader::parser::COMPANIES_FILE)]
    pub companies_file: String,

    /// Customers file, relative to the data directory
    #[arg(long, default_value = data_loader::parser::CUSTOMERS_FILE)]
    pub customers_file: String,

    /// Transactions file, relative to the data directory
    #[arg(long, default_value = data_loader::parser::TRANSACTIONS_FILE)]
    pub transactions_file: String,

    /// Address to listen on
    #[arg(long, env = "WHOLESALE_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,
}

impl ServerConfig {
    pub fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths {
            companies: self.data_dir.join(&self.companies_file),
            customers: self.data_dir.join(&self.customers_file),
            transactions: self.data_dir.join(&self.transactions_file),
        }
    }
}
