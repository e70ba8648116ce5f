use env_logger::{Builder, Env};

pub const LOG_FILTER_VAR: &str = "RUST_LOG";

/// Logger environment reading `filter_var`, showing info and above when it is unset.
pub fn log_env(filter_var: &str) -> Env<'_> {
    Env::default().filter_or(filter_var, "info")
}

pub fn init() {
    Builder::from_env(log_env(LOG_FILTER_VAR)).init();
}
