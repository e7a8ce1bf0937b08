//! Runtime configuration: which showcase to run, the random seed and the
//! simulated asset-load delay.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use instant::Duration;

/// The two showcase layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Torus knot with orbiting spheres, manual drag-rotate and wheel zoom.
    Knot,
    /// Layered tower with rings and particles, orbit camera, grid and cubes.
    Tower,
}

impl Variant {
    /// How long the asset fetch is allowed to take before the fallback kicks in.
    pub fn default_load_delay(self) -> Duration {
        match self {
            Variant::Knot => Duration::ZERO,
            Variant::Tower => Duration::from_secs(1),
        }
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "knot" | "1" => Ok(Variant::Knot),
            "tower" | "2" => Ok(Variant::Tower),
            other => Err(anyhow!("unknown variant {other:?}, expected \"knot\" or \"tower\"")),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Knot => f.write_str("knot"),
            Variant::Tower => f.write_str("tower"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub variant: Variant,
    /// Seed for every random choice; `None` draws one at startup.
    pub seed: Option<u64>,
    pub load_delay: Duration,
    /// Id of the canvas element on the web.
    pub canvas_id: String,
}

impl Config {
    pub const CANVAS_ID: &'static str = "canvas";

    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            seed: None,
            load_delay: variant.default_load_delay(),
            canvas_id: Self::CANVAS_ID.to_string(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_load_delay(mut self, load_delay: Duration) -> Self {
        self.load_delay = load_delay;
        self
    }

    /// Reads `variant`, `seed` and `delay` (milliseconds) through `param`, the
    /// page's URL search parameters on the web. Missing keys keep the
    /// defaults; invalid values fall back to them with a warning.
    pub fn from_params(param: impl Fn(&str) -> Option<String>) -> Self {
        let variant = match param("variant").map(|value| value.parse::<Variant>()) {
            Some(Ok(variant)) => variant,
            Some(Err(e)) => {
                log::warn!("Ignoring variant: {e:#}");
                Variant::Knot
            }
            None => Variant::Knot,
        };
        let mut config = Self::new(variant);
        if let Some(seed) = param("seed") {
            match seed.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(e) => log::warn!("Ignoring seed {seed:?}: {e}"),
            }
        }
        if let Some(delay) = param("delay") {
            match delay.trim().parse() {
                Ok(millis) => config.load_delay = Duration::from_millis(millis),
                Err(e) => log::warn!("Ignoring delay {delay:?}: {e}"),
            }
        }
        config
    }

    /// Resolves the seed, drawing a fresh one from OS entropy when unset.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Variant::Knot)
    }
}
