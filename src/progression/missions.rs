//! One-time missions tracked against cumulative metrics

use crate::sim::Latch;

/// The fixed set of missions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionKind {
    CollectCoins,
    PassObstacles,
    CollectHearts,
}

impl MissionKind {
    /// Evaluation order
    pub const ALL: [MissionKind; 3] = [
        MissionKind::CollectCoins,
        MissionKind::PassObstacles,
        MissionKind::CollectHearts,
    ];

    /// Human-readable text; also the key in the save file
    pub fn description(&self) -> &'static str {
        match self {
            MissionKind::CollectCoins => "Collect 10 coins",
            MissionKind::PassObstacles => "Pass 20 pipes",
            MissionKind::CollectHearts => "Collect 3 hearts",
        }
    }

    pub fn from_description(description: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.description() == description)
    }

    pub fn target(&self) -> u32 {
        match self {
            MissionKind::CollectCoins => 10,
            MissionKind::PassObstacles => 20,
            MissionKind::CollectHearts => 3,
        }
    }

    /// Coins granted on completion
    pub fn reward(&self) -> u32 {
        match self {
            MissionKind::CollectCoins => 10,
            MissionKind::PassObstacles => 15,
            MissionKind::CollectHearts => 20,
        }
    }

    /// Pick this mission's metric out of the tracked counters
    pub fn metric(&self, metrics: &Metrics) -> u32 {
        match self {
            MissionKind::CollectCoins => metrics.coins_collected,
            MissionKind::PassObstacles => metrics.pipes_passed,
            MissionKind::CollectHearts => metrics.hearts_collected,
        }
    }
}

/// Counters missions are measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Mirror of the avatar's coin balance
    pub coins_collected: u32,
    /// Mirror of the avatar's score
    pub pipes_passed: u32,
    pub hearts_collected: u32,
}

#[derive(Debug, Clone)]
pub struct Mission {
    pub kind: MissionKind,
    completed: Latch,
}

impl Mission {
    pub fn new(kind: MissionKind) -> Self {
        Self {
            kind,
            completed: Latch::default(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_done()
    }

    /// Complete the mission if its metric reached the target.
    /// Returns the reward the first time only.
    pub fn evaluate(&mut self, metrics: &Metrics) -> Option<u32> {
        if self.is_completed() || self.kind.metric(metrics) < self.kind.target() {
            return None;
        }
        self.completed.trip().then(|| self.kind.reward())
    }

    /// Load a persisted completion flag. A completed mission never reverts.
    pub(crate) fn restore(&mut self, completed: bool) {
        if completed {
            self.completed.trip();
        }
    }
}
