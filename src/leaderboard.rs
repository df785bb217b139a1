//! Score submission and leaderboard
//!
//! One entry per player (their latest run), top 10 by score. The engine hands
//! out a `ScoreSubmission` when a run ends; storage lives outside the core, so
//! this board only knows how to rank and (de)serialize.

use serde::{Deserialize, Serialize};

/// Maximum number of ranked entries
pub const MAX_LEADERBOARD: usize = 10;

/// Final result of a run, produced once on entering GameOver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: u64,
    pub reward_earned: u64,
}

/// Who submitted a score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub display_name: String,
    pub avatar: Option<String>,
}

/// A stored run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScore {
    pub player_id: u64,
    pub display_name: String,
    pub score: u64,
    pub reward_earned: u64,
    /// Unix timestamp (ms) of the submission
    pub timestamp: f64,
    pub avatar: Option<String>,
}

/// A ranked row for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub display_name: String,
    pub score: u64,
    pub reward_earned: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeaderboardError {
    #[error("player id is required")]
    MissingPlayer,
    #[error("display name is required")]
    MissingName,
    #[error("invalid leaderboard JSON: {0}")]
    Parse(String),
}

/// Leaderboard store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    scores: Vec<PlayerScore>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Record a run, replacing the player's previous one
    ///
    /// Returns the rank achieved (1-indexed) or None if outside the top 10.
    pub fn submit(
        &mut self,
        player: &Player,
        result: ScoreSubmission,
        timestamp: f64,
    ) -> Result<Option<usize>, LeaderboardError> {
        if player.id == 0 {
            return Err(LeaderboardError::MissingPlayer);
        }
        if player.display_name.trim().is_empty() {
            return Err(LeaderboardError::MissingName);
        }

        self.scores.retain(|s| s.player_id != player.id);
        let entry = PlayerScore {
            player_id: player.id,
            display_name: player.display_name.clone(),
            score: result.score,
            reward_earned: result.reward_earned,
            timestamp,
            avatar: player.avatar.clone(),
        };

        // Keep sorted descending; ties keep the earlier submission first
        let pos = self
            .scores
            .iter()
            .position(|s| result.score > s.score)
            .unwrap_or(self.scores.len());
        self.scores.insert(pos, entry);
        log::info!(
            "Score {} submitted for {} (rank {})",
            result.score,
            player.display_name,
            pos + 1
        );

        Ok((pos < MAX_LEADERBOARD).then_some(pos + 1))
    }

    /// Ranked top entries
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.scores
            .iter()
            .take(MAX_LEADERBOARD)
            .enumerate()
            .map(|(i, s)| LeaderboardEntry {
                rank: i + 1,
                display_name: s.display_name.clone(),
                score: s.score,
                reward_earned: s.reward_earned,
                avatar: s.avatar.clone(),
            })
            .collect()
    }

    /// The stored run for a player, if any
    pub fn player_score(&self, player_id: u64) -> Option<&PlayerScore> {
        self.scores.iter().find(|s| s.player_id == player_id)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.scores.first().map(|s| s.score)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.scores).unwrap_or_else(|_| "[]".to_string())
    }

    /// Import stored runs, re-sorting them by score
    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        let mut scores: Vec<PlayerScore> =
            serde_json::from_str(json).map_err(|e| LeaderboardError::Parse(e.to_string()))?;
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(Self { scores })
    }
}
