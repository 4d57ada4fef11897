use std::net::SocketAddr;

use clap::Args;

#[derive(Args, Clone, Debug)]
pub struct Server {
    /// Address to listen on
    ///
    /// Defaults to the server address of the configuration, or 127.0.0.1:8000
    #[arg(short, long, value_name = "ADDR")]
    pub address: Option<SocketAddr>,
}
