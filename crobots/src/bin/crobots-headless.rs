// Copyright 2025 John Brosnihan
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
//! Headless match runner
//!
//! Loads robot modules from disk, runs a fixed number of ticks and prints
//! where every robot ended up.

use anyhow::{Context, Result};
use clap::Parser;
use crobots::engine::{Engine, EngineParams};
use crobots::plugins::{DynamicLibraryLoader, RobotRegistry};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crobots-headless")]
#[command(about = "Run a robot match without a window")]
struct Args {
    /// Robot module names, one per robot
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    robots: Vec<String>,

    /// Fixed step in seconds
    #[arg(long)]
    timestep: Option<f32>,

    /// Number of ticks to run
    #[arg(long, default_value = "600")]
    ticks: u64,

    /// JSON file with engine parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding robot modules
    #[arg(long)]
    robot_dir: Option<PathBuf>,

    /// Enable physics debug drawing
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn params(&self) -> Result<EngineParams> {
        let mut params = match &self.config {
            Some(path) => EngineParams::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => EngineParams::default(),
        };
        if !self.robots.is_empty() {
            params.robots = self.robots.clone();
        }
        if let Some(timestep) = self.timestep {
            params.timestep = timestep;
        }
        Ok(params)
    }

    fn registry(&self) -> RobotRegistry {
        match &self.robot_dir {
            Some(dir) => RobotRegistry::new(DynamicLibraryLoader::with_base_dir(dir)),
            None => RobotRegistry::from_env(),
        }
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.params()?;
    let mut engine = Engine::init(&params, args.registry()).context("starting match")?;
    engine.set_debug(args.debug);

    for _ in 0..args.ticks {
        engine.tick();
    }
    info!("Ran {} ticks ({}s simulated)", engine.tick_count(), engine.elapsed().value());

    for (index, robot) in engine.robots().iter().enumerate() {
        let context = robot.context();
        println!(
            "{} {}: x={:.3} y={:.3} rotation={:.3}",
            index,
            robot.name(),
            context.x().value(),
            context.y().value(),
            context.rotation().value(),
        );
    }

    engine.destroy();
    Ok(())
}
