mod config_gen;
mod create_admin;

pub use config_gen::config_generate;
pub use create_admin::create_admin;
