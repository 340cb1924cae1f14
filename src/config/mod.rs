pub mod schema;

pub use schema::{default_config_path, Config, SessionsConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexported_config_default_is_constructible() {
        let config = Config::default();

        assert!(config.prompts_dir.is_none());
        assert!(config.sessions.max_last_reply_length > 0);
    }
}
