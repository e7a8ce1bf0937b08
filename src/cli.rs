//! Command-line and environment configuration for the native binary.

use clap::Parser;
use instant::Duration;

use crate::config::{Config, Variant};

#[derive(Parser, Debug, Clone)]
#[command(name = "floating-forms")]
#[command(about = "A procedural 3D showcase", long_about = None)]
pub struct Cli {
    /// Which showcase to run: `knot` (1) or `tower` (2)
    #[arg(long, env = "SCENE_VARIANT", default_value = "knot")]
    pub variant: Variant,

    /// Seed for every random choice; drawn at startup when omitted
    #[arg(long, env = "SCENE_SEED")]
    pub seed: Option<u64>,

    /// Simulated model fetch delay in milliseconds, overriding the variant's default
    #[arg(long = "load-delay-ms", env = "SCENE_LOAD_DELAY_MS")]
    pub load_delay_ms: Option<u64>,
}

impl Cli {
    pub fn into_config(self) -> Config {
        let mut config = Config::new(self.variant);
        config.seed = self.seed;
        if let Some(millis) = self.load_delay_ms {
            config.load_delay = Duration::from_millis(millis);
        }
        config
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        cli.into_config()
    }
}
