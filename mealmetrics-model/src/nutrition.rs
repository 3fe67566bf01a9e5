//! Daily nutrition goals derived from a body profile.
//!
//! Basal metabolic rate follows the Mifflin-St Jeor equation. Multiplying
//! it by an activity factor gives the calorie goal, which is then split
//! 30/40/30 between protein, carbohydrates and fat.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::{ActivityLevel, BodyProfile, Sex};

/// Weight class derived from body mass index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Classify a rounded BMI value. All comparisons are strict, so the
    /// cutoff values 24.9 and 29.9 themselves land in the heavier class.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 24.9 {
            BmiCategory::Healthy
        } else if bmi < 29.9 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

/// Daily targets computed from a [`BodyProfile`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct NutritionGoals {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
}

/// A profile measurement was missing, zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidProfileError {
    #[error("weight must be a positive number")]
    Weight,
    #[error("height must be a positive number")]
    Height,
    #[error("age must be a positive number")]
    Age,
}

impl ActivityLevel {
    /// Factor applied to the basal metabolic rate to estimate total
    /// daily energy expenditure.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Compute daily calorie and macro targets together with the BMI
/// classification for a profile.
///
/// Rounding is half-up throughout. Each macro target is rounded from
/// the calorie goal independently, so their calorie equivalents do not
/// necessarily sum back to it exactly. BMI is rounded to one decimal
/// before classification.
pub fn calculate_goals(profile: &BodyProfile) -> Result<NutritionGoals, InvalidProfileError> {
    if !is_positive(profile.weight_kg) {
        return Err(InvalidProfileError::Weight);
    }
    if !is_positive(profile.height_cm) {
        return Err(InvalidProfileError::Height);
    }
    if profile.age_years <= 0 {
        return Err(InvalidProfileError::Age);
    }

    let calories = (basal_metabolic_rate(profile) * profile.activity_level.multiplier()).round();

    let height_m = profile.height_cm / 100.0;
    let bmi = (profile.weight_kg / (height_m * height_m) * 10.0).round() / 10.0;

    Ok(NutritionGoals {
        calories: calories as u32,
        protein: (calories * 0.3 / 4.0).round() as u32,
        carbs: (calories * 0.4 / 4.0).round() as u32,
        fat: (calories * 0.3 / 9.0).round() as u32,
        bmi,
        bmi_category: BmiCategory::from_bmi(bmi),
    })
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn basal_metabolic_rate(profile: &BodyProfile) -> f64 {
    let base =
        10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * profile.age_years as f64;
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(
        weight_kg: f64,
        height_cm: f64,
        age_years: i32,
        sex: Sex,
        activity_level: ActivityLevel,
    ) -> BodyProfile {
        BodyProfile {
            weight_kg,
            height_cm,
            age_years,
            sex,
            activity_level,
        }
    }

    #[test]
    fn moderately_active_male_reference_values() {
        let goals =
            calculate_goals(&profile(70.0, 175.0, 25, Sex::Male, ActivityLevel::Moderate)).unwrap();

        assert_eq!(goals.calories, 2594);
        assert_eq!(goals.protein, 195);
        assert_eq!(goals.carbs, 259);
        assert_eq!(goals.fat, 86);
        assert_eq!(goals.bmi, 22.9);
        assert_eq!(goals.bmi_category, BmiCategory::Healthy);
    }

    #[test]
    fn female_offset_lowers_bmr() {
        let goals =
            calculate_goals(&profile(70.0, 175.0, 25, Sex::Female, ActivityLevel::Moderate))
                .unwrap();

        assert_eq!(goals.calories, 2337);
        assert_eq!(goals.protein, 175);
        assert_eq!(goals.carbs, 234);
        assert_eq!(goals.fat, 78);
    }

    #[test]
    fn activity_multiplier_scales_calories() {
        let test_data = [
            (ActivityLevel::Sedentary, 2009),
            (ActivityLevel::Light, 2301),
            (ActivityLevel::Moderate, 2594),
            (ActivityLevel::Active, 2887),
            (ActivityLevel::VeryActive, 3180),
        ];

        for (i, (activity_level, expected_calories)) in test_data.into_iter().enumerate() {
            let goals =
                calculate_goals(&profile(70.0, 175.0, 25, Sex::Male, activity_level)).unwrap();
            assert_eq!(goals.calories, expected_calories, "Test case #{}", i);
        }
    }

    #[test]
    fn macros_are_rounded_from_the_calorie_goal() {
        let goals =
            calculate_goals(&profile(70.0, 175.0, 25, Sex::Male, ActivityLevel::Sedentary))
                .unwrap();

        assert_eq!(goals.calories, 2009);
        assert_eq!(goals.protein, 151);
        assert_eq!(goals.carbs, 201);
        assert_eq!(goals.fat, 67);
    }

    #[test]
    fn rejects_non_positive_measurements() {
        let test_data = [
            (
                profile(0.0, 175.0, 25, Sex::Male, ActivityLevel::Moderate),
                InvalidProfileError::Weight,
            ),
            (
                profile(-70.0, 175.0, 25, Sex::Male, ActivityLevel::Moderate),
                InvalidProfileError::Weight,
            ),
            (
                profile(f64::NAN, 175.0, 25, Sex::Male, ActivityLevel::Moderate),
                InvalidProfileError::Weight,
            ),
            (
                profile(70.0, 0.0, 25, Sex::Male, ActivityLevel::Moderate),
                InvalidProfileError::Height,
            ),
            (
                profile(70.0, -175.0, 25, Sex::Male, ActivityLevel::Moderate),
                InvalidProfileError::Height,
            ),
            (
                profile(70.0, 175.0, 0, Sex::Male, ActivityLevel::Moderate),
                InvalidProfileError::Age,
            ),
            (
                profile(70.0, 175.0, -25, Sex::Male, ActivityLevel::Moderate),
                InvalidProfileError::Age,
            ),
        ];

        for (i, (input, expected)) in test_data.into_iter().enumerate() {
            assert_eq!(calculate_goals(&input), Err(expected), "Test case #{}", i);
        }
    }

    #[test]
    fn bmi_category_boundaries() {
        let test_data = [
            (18.4, BmiCategory::Underweight),
            (18.5, BmiCategory::Healthy),
            (24.8, BmiCategory::Healthy),
            (24.9, BmiCategory::Overweight),
            (29.8, BmiCategory::Overweight),
            (29.9, BmiCategory::Obese),
            (35.0, BmiCategory::Obese),
        ];

        for (i, (bmi, expected)) in test_data.into_iter().enumerate() {
            assert_eq!(BmiCategory::from_bmi(bmi), expected, "Test case #{}", i);
        }
    }

    #[test]
    fn bmi_is_rounded_to_one_decimal() {
        let goals =
            calculate_goals(&profile(58.0, 175.0, 25, Sex::Male, ActivityLevel::Moderate)).unwrap();
        assert_eq!(goals.bmi, 18.9);

        let goals =
            calculate_goals(&profile(76.6, 175.0, 25, Sex::Male, ActivityLevel::Moderate)).unwrap();
        assert_eq!(goals.bmi, 25.0);
        assert_eq!(goals.bmi_category, BmiCategory::Overweight);
    }

    #[test]
    fn same_profile_always_yields_same_goals() {
        let input = profile(82.5, 169.0, 41, Sex::Female, ActivityLevel::Active);
        assert_eq!(calculate_goals(&input), calculate_goals(&input));
    }
}
