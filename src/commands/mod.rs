pub mod generate;
pub mod init_config;
pub mod keywords;
pub mod run;
pub mod update_metrics;
mod wiring;
