//! Point deltas and run settings for drug ranking.

use chrono::NaiveDate;
use dif_common::config::ScoringConfig;
use serde::{Deserialize, Serialize};

/// Fixed deltas applied by every criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Points {
    pub reward: i64,
    pub penalty: i64,
}

impl Default for Points {
    fn default() -> Self {
        Self { reward: 1, penalty: -1 }
    }
}

impl Points {
    pub fn new(reward: i64, penalty: i64) -> Self {
        Self { reward, penalty }
    }

    /// Reward when the criterion is met, penalty otherwise.
    pub fn award(&self, met: bool) -> i64 {
        if met { self.reward } else { self.penalty }
    }
}

/// Everything a ranking run needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingSettings {
    pub points: Points,
    /// Condition name of the disease under study.
    pub disease_keyword: String,
    /// Conditions whose trials earn a double reward.
    pub similar_diseases: Vec<String>,
    /// Patent expiry is judged against this date.
    pub today: NaiveDate,
}

impl RankingSettings {
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            points: Points::new(config.reward, config.penalty),
            disease_keyword: config.disease_keyword.clone(),
            similar_diseases: config.similar_diseases.clone(),
            today: chrono::Local::now().date_naive(),
        }
    }

    pub fn with_points(mut self, points: Points) -> Self {
        self.points = points;
        self
    }
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award() {
        let p = Points::default();
        assert_eq!(p.award(true), 1);
        assert_eq!(p.award(false), -1);
        assert_eq!(Points::new(5, -3).award(false), -3);
    }

    #[test]
    fn test_settings_from_config() {
        let config = ScoringConfig {
            reward: 2,
            similar_diseases: vec!["Dementia".into()],
            ..ScoringConfig::default()
        };
        let settings = RankingSettings::from_config(&config);
        assert_eq!(settings.points, Points::new(2, -1));
        assert_eq!(settings.disease_keyword, "Alzheimer Disease");
        assert_eq!(settings.similar_diseases, vec!["Dementia"]);
    }
}
