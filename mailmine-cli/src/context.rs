use mailmine::Mailmine;
use mailmine::config::{ConfigLoader, MailmineConfig};
use std::path::Path;

pub struct MailmineCliContext {
    pub mailmine: Mailmine,
}

impl MailmineCliContext {
    pub async fn new(config_path: Option<&Path>) -> mailmine::Result<Self> {
        let config = load_config(config_path)?;
        let mailmine = Mailmine::from_config(config).await?;
        Ok(Self { mailmine })
    }

    pub fn config(&self) -> &MailmineConfig {
        self.mailmine.config()
    }
}

/// An explicit file, else the default locations, then `MAILMINE_*` overrides.
pub fn load_config(config_path: Option<&Path>) -> mailmine::Result<MailmineConfig> {
    let mut loader = ConfigLoader::new();
    match config_path {
        Some(path) => {
            loader.load_file(path)?;
        }
        None => {
            loader.load_default_files();
        }
    }
    Ok(loader.load_env().extract()?)
}
