use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

/// Typed process configuration.
///
/// Admin ids are an explicit field here instead of a module-level registry;
/// the command router holds the config and checks against it.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub admin_ids: Vec<i64>,

    pub db_path: PathBuf,
    pub temp_dir: PathBuf,

    /// When set, the bot listens for webhook pushes at `{public_url}/webhook`
    /// instead of long-polling.
    pub public_url: Option<String>,
    pub port: u16,
}

impl BotConfig {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let token = env_str("TOKEN").unwrap_or_default();
        if token.trim().is_empty() {
            return Err(Error::Config(
                "TOKEN environment variable is required".to_string(),
            ));
        }

        let admin_ids = parse_csv_i64(env_str("ADMIN_IDS"));

        let db_path = env_path("DB_PATH").unwrap_or_else(|| PathBuf::from("./data/packs.db"));
        let temp_dir = env_path("TEMP_DIR").unwrap_or_else(|| PathBuf::from("./data/temp"));

        let public_url = env_str("PUBLIC_URL").and_then(non_empty);
        let port = env_str("PORT")
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(8443);

        Ok(Self {
            token,
            admin_ids,
            db_path,
            temp_dir,
            public_url,
            port,
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_admin_id_csv() {
        assert_eq!(
            parse_csv_i64(Some(" 1, 2 ,,junk, 3 ".to_string())),
            vec![1, 2, 3]
        );
        assert!(parse_csv_i64(None).is_empty());
    }
}
