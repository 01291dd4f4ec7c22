// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Loads one map from a data root and prints the resolved map as JSON.
//!
//! ```text
//! nuthead-runtime --data ./data test --variant night
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nuthead_sdk::{Nuthead, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "nuthead-runtime", version, about = "Load a map and print it as JSON")]
struct Cli {
    /// The map to load.
    map: String,
    /// The map variant, selecting its background image.
    #[arg(long)]
    variant: Option<String>,
    /// Data root directory or http(s) URL. Overrides the config file.
    #[arg(long)]
    data: Option<String>,
    /// TOML pipeline configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn pipeline_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.data_root = data.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("reqwest", log::LevelFilter::Warn)
        .init();

    let cli = Cli::parse();
    let nuthead = Nuthead::new(pipeline_config(&cli)?)?;

    let map = nuthead.load_map(&cli.map, cli.variant.as_deref()).await?;
    let json = serde_json::to_string_pretty(map.as_ref()).context("Failed to serialize map")?;
    println!("{json}");
    Ok(())
}
