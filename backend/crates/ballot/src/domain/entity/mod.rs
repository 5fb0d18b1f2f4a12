pub mod profile;
pub mod system_config;
pub mod tally;
pub mod vote;
