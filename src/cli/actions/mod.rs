pub mod server;

use crate::cli::globals::BreachPolicy;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        hibp_url: String,
        lookup_timeout: u64,
        policy: BreachPolicy,
    },
}
