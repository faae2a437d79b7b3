use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            host,
            port,
            log_level,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Spaced-repetition tuning shared by the exercise log and the learned-word
/// reports. Kept on the application state rather than as a module constant
/// so tests can vary the cycle length.
#[derive(Debug, Clone, Copy)]
pub struct LearningConfig {
    pub cycle_length: usize,
}

impl LearningConfig {
    pub const DEFAULT_CYCLE_LENGTH: usize = 4;

    pub fn from_env() -> Self {
        Self {
            cycle_length: parse_cycle_length(
                std::env::var("LEARNING_CYCLE_LENGTH").ok().as_deref(),
            ),
        }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            cycle_length: Self::DEFAULT_CYCLE_LENGTH,
        }
    }
}

fn parse_cycle_length(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(LearningConfig::DEFAULT_CYCLE_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_length_parses_positive_integers() {
        assert_eq!(parse_cycle_length(Some("6")), 6);
        assert_eq!(parse_cycle_length(Some(" 3 ")), 3);
    }

    #[test]
    fn cycle_length_rejects_invalid_values() {
        assert_eq!(parse_cycle_length(None), LearningConfig::DEFAULT_CYCLE_LENGTH);
        assert_eq!(parse_cycle_length(Some("0")), LearningConfig::DEFAULT_CYCLE_LENGTH);
        assert_eq!(parse_cycle_length(Some("-2")), LearningConfig::DEFAULT_CYCLE_LENGTH);
        assert_eq!(parse_cycle_length(Some("four")), LearningConfig::DEFAULT_CYCLE_LENGTH);
    }
}
