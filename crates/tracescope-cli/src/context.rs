use anyhow::Result;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracescope_runtime::Config;
use tracescope_runtime::config::resolve_data_dir;

pub struct ExecutionContext {
    data_dir: PathBuf,
    config_path: PathBuf,
    config: OnceCell<Config>,
}

impl ExecutionContext {
    pub fn new(data_dir: Option<&str>, config_path: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir)?;
        let config_path = config_path.unwrap_or_else(|| Config::default_path(&data_dir));

        Ok(Self {
            data_dir,
            config_path,
            config: OnceCell::new(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> Result<&Config> {
        self.config
            .get_or_try_init(|| Ok(Config::load_from(&self.config_path)?))
    }

    pub fn default_log_file(&self) -> PathBuf {
        self.data_dir.join("tracescope.log")
    }
}
