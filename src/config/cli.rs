use crate::domain::model::SortKey;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "lesson-shop")]
#[command(about = "An interactive storefront client for the lesson catalog service")]
pub struct CliConfig {
    /// 目錄服務的位址,也可在 TOML 配置中指定
    #[arg(long, default_value = "https://backend-vp34.onrender.com")]
    pub base_url: String,

    #[arg(long, help = "Optional TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "subject")]
    pub sort_key: SortKey,

    #[arg(long, help = "Sort in descending order")]
    pub descending: bool,

    #[arg(long, default_value = "", help = "Initial search query")]
    pub query: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)
    }
}
