use crate::cli::run;

pub mod cli;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod http;
pub mod session;
pub mod source;
pub mod sync;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run()
}
