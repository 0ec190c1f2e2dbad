//! Weather cycle
//!
//! Purely visual for now; `apply` is the hook where gameplay effects go.

use rand::Rng;

use super::avatar::Avatar;
use crate::consts::WEATHER_INTERVAL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherKind {
    Clear,
    Rain,
    Fog,
    Wind,
}

impl WeatherKind {
    pub const ALL: [WeatherKind; 4] = [
        WeatherKind::Clear,
        WeatherKind::Rain,
        WeatherKind::Fog,
        WeatherKind::Wind,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherKind::Clear => "clear",
            WeatherKind::Rain => "rain",
            WeatherKind::Fog => "fog",
            WeatherKind::Wind => "wind",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone)]
pub struct Weather {
    pub kind: WeatherKind,
    pub elapsed: u32,
}

impl Weather {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            kind: WeatherKind::random(rng),
            elapsed: 0,
        }
    }

    /// Count one tick; re-rolls the kind once the interval is exceeded
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> bool {
        self.elapsed += 1;
        if self.elapsed > WEATHER_INTERVAL {
            self.elapsed = 0;
            self.kind = WeatherKind::random(rng);
            return true;
        }
        false
    }

    /// Gameplay effect of the current weather (none yet)
    pub fn apply(&self, _avatar: &mut Avatar) {
        match self.kind {
            WeatherKind::Clear | WeatherKind::Rain | WeatherKind::Fog | WeatherKind::Wind => {}
        }
    }
}
