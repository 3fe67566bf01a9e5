#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Biological sex as used by the energy expenditure formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize, strum::Display, strum::EnumString),
    serde(rename_all = "lowercase"),
    strum(serialize_all = "lowercase")
)]
pub enum Sex {
    Male,
    Female,
}

/// Self-reported exercise frequency.
///
/// Parsing is lenient: any value outside the known set falls back to
/// `Sedentary` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize, strum::Display, strum::EnumString),
    serde(rename_all = "snake_case", from = "String"),
    strum(serialize_all = "snake_case")
)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

#[cfg(feature = "serde")]
impl From<String> for ActivityLevel {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(ActivityLevel::Sedentary)
    }
}

/// A registered account with its body profile and monthly budget.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub budget_limit: f64,
    pub age: i32,
    pub height: f64,
    pub weight: f64,
    pub gender: Sex,
    pub activity_level: ActivityLevel,
}

impl User {
    /// The measurements relevant to the nutrition goal calculation.
    pub fn body_profile(&self) -> BodyProfile {
        BodyProfile {
            weight_kg: self.weight,
            height_cm: self.height,
            age_years: self.age,
            sex: self.gender,
            activity_level: self.activity_level,
        }
    }
}

/// Input to [`crate::nutrition::calculate_goals`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: i32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn activity_level_parses_known_values() {
        let test_data = [
            ("\"sedentary\"", ActivityLevel::Sedentary),
            ("\"light\"", ActivityLevel::Light),
            ("\"moderate\"", ActivityLevel::Moderate),
            ("\"active\"", ActivityLevel::Active),
            ("\"very_active\"", ActivityLevel::VeryActive),
        ];

        for (i, (json, expected)) in test_data.into_iter().enumerate() {
            assert_eq!(
                serde_json::from_str::<ActivityLevel>(json).unwrap(),
                expected,
                "Test case #{}",
                i
            );
        }
    }

    #[test]
    fn unknown_activity_level_falls_back_to_sedentary() {
        let test_data = ["\"marathon\"", "\"\"", "\"MODERATE\"", "\"very active\""];

        for (i, json) in test_data.into_iter().enumerate() {
            assert_eq!(
                serde_json::from_str::<ActivityLevel>(json).unwrap(),
                ActivityLevel::Sedentary,
                "Test case #{}",
                i
            );
        }
    }

    #[test]
    fn activity_level_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ActivityLevel::VeryActive).unwrap(),
            "\"very_active\""
        );
    }

    #[test]
    fn sex_rejects_unknown_values() {
        assert!(serde_json::from_str::<Sex>("\"male\"").is_ok());
        assert!(serde_json::from_str::<Sex>("\"robot\"").is_err());
    }
}
