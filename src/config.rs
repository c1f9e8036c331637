use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub database_path: Option<PathBuf>,
    pub corpus_dir: PathBuf,
    pub daily_word_limit: usize,
    pub quiz_all_fallback: bool,
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

        let database_path = std::env::var("DATABASE_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let corpus_dir = std::env::var("CORPUS_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        let daily_word_limit = std::env::var("DAILY_WORD_LIMIT")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(5);

        let quiz_all_fallback = std::env::var("QUIZ_ALL_FALLBACK")
            .map(|value| value != "false" && value != "0")
            .unwrap_or(true);

        Self {
            host,
            port,
            log_level,
            database_path,
            corpus_dir,
            daily_word_limit,
            quiz_all_fallback,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            log_level: "info".to_string(),
            database_path: None,
            corpus_dir: PathBuf::from("./data"),
            daily_word_limit: 5,
            quiz_all_fallback: true,
        }
    }
}
