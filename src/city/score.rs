//! Scores and score bands
//!
//! The band table is the single source of truth for colors, building
//! heights, labels and jump presets. Every score in [300, 850] falls into
//! exactly one band.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rasterizer::Color;

/// Lowest representable score
pub const SCORE_MIN: u16 = 300;
/// Highest representable score
pub const SCORE_MAX: u16 = 850;
/// Score used when the host doesn't supply one
pub const DEFAULT_SCORE: u16 = 700;

/// World-space x of the lowest score
pub const X_MIN: f32 = -40.0;
/// World-space width covered by the full score range
pub const X_SPAN: f32 = 80.0;

/// A score clamped to [300, 850]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Score(u16);

impl Score {
    /// Clamp any integer into the score domain
    pub fn new(value: i32) -> Self {
        Score(value.clamp(SCORE_MIN as i32, SCORE_MAX as i32) as u16)
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Fixed linear map from score to world x: 300 -> -40, 850 -> 40
    pub fn x_position(self) -> f32 {
        x_position(self.0 as f32)
    }

    pub fn band(self) -> &'static ScoreBand {
        band_of(self)
    }

    pub fn color(self) -> Color {
        self.band().color
    }

    /// Readout text shown above the indicator
    pub fn readout(self) -> String {
        format!("Score\n{}", self.0)
    }
}

impl Default for Score {
    fn default() -> Self {
        Score(DEFAULT_SCORE)
    }
}

impl From<i32> for Score {
    fn from(value: i32) -> Self {
        Score::new(value)
    }
}

impl From<Score> for i32 {
    fn from(score: Score) -> Self {
        score.0 as i32
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a raw (possibly fractional) score to world x without clamping
pub fn x_position(score: f32) -> f32 {
    X_MIN + (score - SCORE_MIN as f32) / (SCORE_MAX - SCORE_MIN) as f32 * X_SPAN
}

// =============================================================================
// Bands
// =============================================================================

/// The five named score ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandId {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl BandId {
    pub const ALL: [BandId; 5] = [
        BandId::Poor,
        BandId::Fair,
        BandId::Good,
        BandId::VeryGood,
        BandId::Excellent,
    ];

    pub fn band(self) -> &'static ScoreBand {
        &BANDS[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.band().label
    }

    /// Score the "jump" buttons move to
    pub fn preset(self) -> Score {
        Score(self.band().preset)
    }
}

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error parsing a band label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown score band '{0}'")]
pub struct UnknownBand(pub String);

impl FromStr for BandId {
    type Err = UnknownBand;

    /// Accepts the display label ("Very Good") or a compact form ("verygood", "very_good")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        BandId::ALL
            .into_iter()
            .find(|id| {
                id.label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .eq(key.chars())
            })
            .ok_or_else(|| UnknownBand(s.to_string()))
    }
}

/// One fixed score range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBand {
    pub id: BandId,
    pub label: &'static str,
    pub min: u16,
    pub max: u16,
    pub color: Color,
    /// Tallest building height for this band's skyline
    pub height: f32,
    /// Representative score for quick navigation
    pub preset: u16,
}

impl ScoreBand {
    pub fn contains(&self, score: Score) -> bool {
        (self.min..=self.max).contains(&score.value())
    }

    /// Midpoint score, where the band label sits
    pub fn midpoint(&self) -> f32 {
        (self.min as f32 + self.max as f32) / 2.0
    }

    /// World x-range this band's buildings tile: from its own minimum up to
    /// the next band's minimum, so neighbouring bands share an edge.
    pub fn x_range(&self) -> (f32, f32) {
        let end = if self.max >= SCORE_MAX { SCORE_MAX } else { self.max + 1 };
        (x_position(self.min as f32), x_position(end as f32))
    }

    /// Label text for the band's range, e.g. "670-739"
    pub fn range_label(&self) -> String {
        format!("{}-{}", self.min, self.max)
    }

    /// Text color that stays readable on top of the band color
    pub fn contrast_text(&self) -> Color {
        if self.min < 670 {
            Color::WHITE
        } else {
            Color::BLACK
        }
    }
}

/// Static band table, ordered by score
pub static BANDS: [ScoreBand; 5] = [
    ScoreBand {
        id: BandId::Poor,
        label: "Poor",
        min: 300,
        max: 579,
        color: Color::from_hex(0xe94560),
        height: 3.0,
        preset: 350,
    },
    ScoreBand {
        id: BandId::Fair,
        label: "Fair",
        min: 580,
        max: 669,
        color: Color::from_hex(0xffa500),
        height: 5.0,
        preset: 620,
    },
    ScoreBand {
        id: BandId::Good,
        label: "Good",
        min: 670,
        max: 739,
        color: Color::from_hex(0xffce00),
        height: 7.0,
        preset: 700,
    },
    ScoreBand {
        id: BandId::VeryGood,
        label: "Very Good",
        min: 740,
        max: 799,
        color: Color::from_hex(0x16c79a),
        height: 9.0,
        preset: 770,
    },
    ScoreBand {
        id: BandId::Excellent,
        label: "Excellent",
        min: 800,
        max: 850,
        color: Color::from_hex(0x3490de),
        height: 12.0,
        preset: 825,
    },
];

/// Band containing `score`
pub fn band_of(score: Score) -> &'static ScoreBand {
    // Scores are clamped, so the last band catches everything the others don't
    BANDS
        .iter()
        .find(|band| score.value() <= band.max)
        .unwrap_or(&BANDS[BANDS.len() - 1])
}

/// Marker color for `score`
pub fn color_of(score: Score) -> Color {
    band_of(score).color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_score_in_exactly_one_band() {
        for s in SCORE_MIN..=SCORE_MAX {
            let score = Score::new(s as i32);
            let matching = BANDS.iter().filter(|b| b.contains(score)).count();
            assert_eq!(matching, 1, "score {} matched {} bands", s, matching);
            assert!(band_of(score).contains(score));
            assert_eq!(color_of(score), color_of(score));
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(band_of(Score::new(579)).id, BandId::Poor);
        assert_eq!(band_of(Score::new(580)).id, BandId::Fair);
        assert_eq!(band_of(Score::new(669)).id, BandId::Fair);
        assert_eq!(band_of(Score::new(670)).id, BandId::Good);
        assert_eq!(band_of(Score::new(739)).id, BandId::Good);
        assert_eq!(band_of(Score::new(740)).id, BandId::VeryGood);
        assert_eq!(band_of(Score::new(799)).id, BandId::VeryGood);
        assert_eq!(band_of(Score::new(800)).id, BandId::Excellent);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(Score::new(-5).value(), 300);
        assert_eq!(Score::new(10_000).value(), 850);
        assert_eq!(Score::new(701).value(), 701);
    }

    #[test]
    fn test_x_position_endpoints() {
        assert!((Score::new(300).x_position() + 40.0).abs() < 1e-5);
        assert!((Score::new(850).x_position() - 40.0).abs() < 1e-5);
        assert!(Score::new(575).x_position().abs() < 1e-4);
        assert!((Score::new(700).x_position() - 18.181818).abs() < 1e-3);
        assert!((Score::new(350).x_position() + 32.727272).abs() < 1e-3);
    }

    #[test]
    fn test_band_colors() {
        assert_eq!(color_of(Score::new(700)).hex_string(), "#ffce00");
        assert_eq!(color_of(Score::new(350)).hex_string(), "#e94560");
        assert_eq!(color_of(Score::new(825)).hex_string(), "#3490de");
    }

    #[test]
    fn test_band_x_ranges_tile_the_floor() {
        let mut edge = X_MIN;
        for band in &BANDS {
            let (start, end) = band.x_range();
            assert!((start - edge).abs() < 1e-4);
            assert!(end > start);
            edge = end;
        }
        assert!((edge - (X_MIN + X_SPAN)).abs() < 1e-4);
    }

    #[test]
    fn test_parse_band_labels() {
        assert_eq!("Poor".parse::<BandId>(), Ok(BandId::Poor));
        assert_eq!("Very Good".parse::<BandId>(), Ok(BandId::VeryGood));
        assert_eq!("very_good".parse::<BandId>(), Ok(BandId::VeryGood));
        assert!("Stellar".parse::<BandId>().is_err());
    }

    #[test]
    fn test_presets_land_in_their_band() {
        for id in BandId::ALL {
            assert_eq!(id.preset().band().id, id);
        }
        assert_eq!(BandId::Poor.preset().value(), 350);
        assert_eq!(BandId::Excellent.preset().value(), 825);
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(BandId::Fair.band().contrast_text(), Color::WHITE);
        assert_eq!(BandId::Good.band().contrast_text(), Color::BLACK);
    }
}
