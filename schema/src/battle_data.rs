use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Field weather. "No weather" is `Option::<Weather>::None` wherever a field value is stored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weather {
    Rain,
    Sun,
    Sandstorm,
    Hail,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Weather::Rain => "Rain",
            Weather::Sun => "Harsh Sunlight",
            Weather::Sandstorm => "Sandstorm",
            Weather::Hail => "Hail",
        };
        write!(f, "{}", display_name)
    }
}

/// Every stat that carries a stage. Hit points never do.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl StatType {
    /// Accuracy and evasion use the 3-based stage table.
    pub fn is_accuracy_stat(self) -> bool {
        matches!(self, StatType::Accuracy | StatType::Evasion)
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpecialAttack => "Special Attack",
            StatType::SpecialDefense => "Special Defense",
            StatType::Speed => "Speed",
            StatType::Accuracy => "accuracy",
            StatType::Evasion => "evasiveness",
        };
        write!(f, "{}", display_name)
    }
}
