use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use switches_core::PuzzleSeeds;

/// How many finished puzzles the history keeps
const HISTORY_LIMIT: usize = 50;

/// How a puzzle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleResult {
    Solved,
    AutoSolved,
    Abandoned,
}

/// Record of a single played puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub seeds: PuzzleSeeds,
    pub result: PuzzleResult,
    pub toggles: usize,
    pub strikes: usize,
    pub time_secs: u64,
    /// Unix timestamp when the puzzle ended
    pub timestamp: u64,
}

/// Running totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub puzzles: usize,
    pub solves: usize,
    pub auto_solves: usize,
    pub abandoned: usize,
    pub strikes: usize,
    /// Solves in a row without a strike
    pub clean_streak: usize,
    pub best_clean_streak: usize,
    pub best_time_secs: Option<u64>,
}

impl PlayerStats {
    pub fn solve_rate(&self) -> f32 {
        if self.puzzles > 0 {
            self.solves as f32 / self.puzzles as f32 * 100.0
        } else {
            0.0
        }
    }
}

/// Stats persisted as JSON in the user's data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsManager {
    pub player: PlayerStats,
    /// Most recent first
    pub history: Vec<PuzzleRecord>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl StatsManager {
    /// Stats that are never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("switches_stats.json")
    }

    /// Load stats from the default location
    pub fn load() -> Self {
        Self::load_from(Self::save_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        let mut stats: Self = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("ignoring unreadable stats file {}: {}", path.display(), err);
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        stats.path = Some(path);
        stats
    }

    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = fs::write(path, json) {
                    log::warn!("could not write stats to {}: {}", path.display(), err);
                }
            }
            Err(err) => log::warn!("could not serialize stats: {}", err),
        }
    }

    /// Record a finished puzzle and persist.
    pub fn record(
        &mut self,
        seeds: PuzzleSeeds,
        result: PuzzleResult,
        toggles: usize,
        strikes: usize,
        time_secs: u64,
    ) {
        let player = &mut self.player;
        player.puzzles += 1;
        player.strikes += strikes;
        match result {
            PuzzleResult::Solved => {
                player.solves += 1;
                player.best_time_secs = Some(
                    player
                        .best_time_secs
                        .map_or(time_secs, |best| best.min(time_secs)),
                );
                if strikes == 0 {
                    player.clean_streak += 1;
                    player.best_clean_streak = player.best_clean_streak.max(player.clean_streak);
                } else {
                    player.clean_streak = 0;
                }
            }
            PuzzleResult::AutoSolved => {
                player.auto_solves += 1;
                player.clean_streak = 0;
            }
            PuzzleResult::Abandoned => {
                player.abandoned += 1;
                player.clean_streak = 0;
            }
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.history.insert(
            0,
            PuzzleRecord {
                seeds,
                result,
                toggles,
                strikes,
                time_secs,
                timestamp,
            },
        );
        self.history.truncate(HISTORY_LIMIT);
        self.save();
    }
}

/// Format seconds as MM:SS or H:MM:SS
pub fn format_time(secs: u64) -> String {
    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        let secs = secs % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}
