use std::fs;
use std::path::Path;
use std::time::Duration;

use cozy_chess::Color;
use serde::{Deserialize, Serialize};

use crate::board::cozy::{Position, NO_PROGRESS_LIMIT};
use crate::error::ConfigError;
use crate::player::AlphaBetaPlayer;
use crate::search::alphabeta::{SearchEngine, DEFAULT_MAX_EXTENSION};
use crate::search::eval::{ExtendOnCapture, Material, NeverExtend, Positional};
use crate::time::budget::{secs_to_duration, TimeBudget};
use crate::time::executor::{ThreadExecutor, DEFAULT_STACK_SIZE};
use crate::time::manager::TurnTimeBudgetManager;
use crate::time::policy::{BranchingScaled, FrontLoaded, SlicePolicy, StabilityRule, Uniform};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SliceConfig {
    Uniform { margin_secs: f64 },
    BranchingScaled { below: usize, factor: f64, margin_secs: f64 },
    FrontLoaded { bias: f64, margin_secs: f64 },
}

impl Default for SliceConfig {
    fn default() -> Self { SliceConfig::Uniform { margin_secs: 0.05 } }
}

impl SliceConfig {
    pub fn build(&self) -> Box<dyn SlicePolicy> {
        match *self {
            SliceConfig::Uniform { margin_secs } => Box::new(Uniform { margin: secs_to_duration(margin_secs) }),
            SliceConfig::BranchingScaled { below, factor, margin_secs } => {
                Box::new(BranchingScaled { below, factor, margin: secs_to_duration(margin_secs) })
            }
            SliceConfig::FrontLoaded { bias, margin_secs } => {
                Box::new(FrontLoaded { bias, margin: secs_to_duration(margin_secs) })
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalKind {
    Material,
    Positional,
}

/// Everything needed to build one time-managed chess player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Turns per round (k).
    pub round_turns: u32,
    /// Seconds in each round's pool.
    pub round_seconds: f64,
    pub slice: SliceConfig,
    pub stability: Option<StabilityRule>,
    pub max_depth: Option<u32>,
    pub evaluation: EvalKind,
    pub selective_deepening: bool,
    pub max_extension: u32,
    pub no_progress_limit: u32,
    pub stack_mib: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            round_turns: 3,
            round_seconds: 30.0,
            slice: SliceConfig::default(),
            stability: Some(StabilityRule::default()),
            max_depth: None,
            evaluation: EvalKind::Positional,
            selective_deepening: true,
            max_extension: DEFAULT_MAX_EXTENSION,
            no_progress_limit: NO_PROGRESS_LIMIT,
            stack_mib: DEFAULT_STACK_SIZE / (1024 * 1024),
        }
    }
}

impl PlayerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let cfg: Self =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_turns == 0 { return Err(ConfigError::Invalid("round_turns must be at least 1".into())); }
        if !(self.round_seconds.is_finite() && self.round_seconds > 0.0) {
            return Err(ConfigError::Invalid(format!("round_seconds must be positive, got {}", self.round_seconds)));
        }
        if Duration::try_from_secs_f64(self.round_seconds).is_err() {
            return Err(ConfigError::Invalid(format!("round_seconds {} is too large", self.round_seconds)));
        }
        if let SliceConfig::BranchingScaled { factor, .. } = self.slice {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::Invalid(format!("branching factor scale must be in (0, 1], got {factor}")));
            }
        }
        if let Some(rule) = self.stability {
            if rule.repeats == 0 { return Err(ConfigError::Invalid("stability.repeats must be at least 1".into())); }
        }
        if self.stack_mib == 0 { return Err(ConfigError::Invalid("stack_mib must be at least 1".into())); }
        Ok(())
    }

    pub fn budget(&self) -> TimeBudget {
        TimeBudget::from_secs(self.round_turns, self.round_seconds)
    }

    pub fn engine(&self, color: Color) -> SearchEngine<Position> {
        let engine = match self.evaluation {
            EvalKind::Material => SearchEngine::<Position>::new(color, Material { perspective: color }),
            EvalKind::Positional => SearchEngine::<Position>::new(color, Positional { perspective: color }),
        };
        let engine = if self.selective_deepening {
            engine.with_deepening(ExtendOnCapture)
        } else {
            engine.with_deepening(NeverExtend)
        };
        engine.with_no_progress_limit(self.no_progress_limit).with_max_extension(self.max_extension)
    }

    pub fn chess_player(&self, color: Color) -> Result<AlphaBetaPlayer<Position>, ConfigError> {
        self.validate()?;
        let executor = ThreadExecutor::with_stack_size(self.stack_mib * 1024 * 1024);
        let manager = TurnTimeBudgetManager::with_executor(self.engine(color), executor)
            .slice_policy(self.slice.build())
            .stability(self.stability)
            .max_depth(self.max_depth);
        Ok(AlphaBetaPlayer::new(format!("alphabeta-{color:?}").to_lowercase(), manager, self.budget()))
    }
}
