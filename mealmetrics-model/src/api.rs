//! Request and response bodies of the HTTP API.
//!
//! Field names follow the camelCase convention of the web client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    meal::Meal,
    nutrition::NutritionGoals,
    user::{ActivityLevel, Sex, User},
};

/// Body of `POST /api/auth/register`. Everything besides the credentials
/// is optional and falls back to a neutral starting profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub budget_limit: Option<f64>,
    pub age: Option<i32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub gender: Option<Sex>,
    pub activity_level: Option<ActivityLevel>,
}

impl RegisterRequest {
    /// Build the account row, filling omitted fields with the defaults
    /// the profile editor starts from.
    pub fn into_user(self, id: String, password_hash: String) -> User {
        User {
            id,
            username: self.username,
            password_hash,
            budget_limit: self.budget_limit.unwrap_or(0.0),
            age: self.age.unwrap_or(25),
            height: self.height.unwrap_or(175.0),
            weight: self.weight.unwrap_or(70.0),
            gender: self.gender.unwrap_or(Sex::Male),
            activity_level: self.activity_level.unwrap_or(ActivityLevel::Moderate),
        }
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Account data sent to the client. The password hash stays server side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub budget_limit: f64,
    pub age: i32,
    pub height: f64,
    pub weight: f64,
    pub gender: Sex,
    pub activity_level: ActivityLevel,
    pub goals: NutritionGoals,
}

impl UserView {
    pub fn new(user: User, goals: NutritionGoals) -> Self {
        Self {
            id: user.id,
            username: user.username,
            budget_limit: user.budget_limit,
            age: user.age,
            height: user.height,
            weight: user.weight,
            gender: user.gender,
            activity_level: user.activity_level,
            goals,
        }
    }
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// Body of `PUT /api/auth/profile`. Absent or zero-valued fields leave
/// the stored value untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub user_id: String,
    pub age: Option<i32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub gender: Option<Sex>,
    pub activity_level: Option<ActivityLevel>,
}

/// Response of `PUT /api/auth/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserView,
}

/// Body of `POST /api/meals`. The date accepts both a full RFC 3339
/// timestamp and a bare `YYYY-MM-DD` day, and defaults to now.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub price: f64,
    #[serde(default, deserialize_with = "dates::optional_lenient")]
    pub date: Option<DateTime<Utc>>,
}

impl NewMeal {
    pub fn into_meal(self, id: String, user_id: String) -> Meal {
        Meal {
            id,
            user_id,
            name: self.name,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            price: self.price,
            date: self.date.unwrap_or_else(Utc::now),
        }
    }
}

/// Generic `{ "msg": ... }` payload used for confirmations and errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

/// Macro and price estimate produced by the meal assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiEstimate {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub price: f64,
}

/// Body of `POST /api/ai/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub meal_name: String,
}

/// Body of `POST /api/ai/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: serde_json::Value,
}

/// Response of `POST /api/ai/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Body of `POST /api/ai/ingredients`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientsRequest {
    pub meals: Vec<String>,
}

/// Response of `GET /api/meals/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub spending: SpendingSummary,
    pub today: ConsumedTotals,
    pub week: WeekSummary,
}

/// Money spent on meals dated in the current calendar month, against
/// the account's budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub month_total: f64,
    pub budget_limit: f64,
    pub remaining: f64,
    pub over_budget: bool,
}

/// Calories and macros consumed over some period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumedTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Rolling seven-day aggregates, oldest day first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub macro_totals: MacroSplit,
    pub daily_calories: Vec<DailyCalories>,
}

/// Grams of each macro, without the calorie total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Calories consumed on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCalories {
    pub date: chrono::NaiveDate,
    pub calories: f64,
}

mod dates {
    use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    /// Accept either an RFC 3339 timestamp or a bare `YYYY-MM-DD` day,
    /// read as midnight UTC.
    pub(super) fn optional_lenient<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| Error::custom(format!("invalid date: {}", raw))),
            None => Ok(None),
        }
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Some(instant.with_timezone(&Utc));
        }
        raw.parse::<NaiveDate>()
            .ok()
            .map(|day| Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    use super::*;
    use crate::nutrition::calculate_goals;

    #[test]
    fn lenient_date_parsing() {
        let test_data = [
            (
                "2026-03-01T12:30:00.000Z",
                Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap()),
            ),
            (
                "2026-03-01T12:30:00+02:00",
                Some(Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap()),
            ),
            (
                "2026-03-01",
                Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()),
            ),
            ("yesterday", None),
            ("2026-13-40", None),
        ];

        for (i, (raw, expected)) in test_data.into_iter().enumerate() {
            assert_eq!(dates::parse(raw), expected, "Test case #{}", i);
        }
    }

    #[test]
    fn new_meal_date_is_optional() {
        let meal: NewMeal = serde_json::from_str(
            r#"{"name":"Toast","calories":220,"protein":6,"carbs":40,"fat":4,"price":1.5}"#,
        )
        .unwrap();
        assert_eq!(meal.date, None);

        let meal: NewMeal = serde_json::from_str(
            r#"{"name":"Toast","calories":220,"protein":6,"carbs":40,"fat":4,"price":1.5,"date":"2026-03-01"}"#,
        )
        .unwrap();
        assert_eq!(
            meal.date,
            Some(
                Utc.from_utc_datetime(
                    &NaiveDate::from_ymd_opt(2026, 3, 1)
                        .unwrap()
                        .and_time(NaiveTime::MIN)
                )
            )
        );
    }

    #[test]
    fn register_request_uses_camel_case_and_defaults() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"username":"kasia","password":"hunter2","budgetLimit":250.0,"activityLevel":"very_active"}"#,
        )
        .unwrap();

        assert_eq!(request.budget_limit, Some(250.0));
        assert_eq!(request.activity_level, Some(ActivityLevel::VeryActive));

        let user = request.into_user("user-1".into(), "hash".into());
        assert_eq!(user.budget_limit, 250.0);
        assert_eq!(user.age, 25);
        assert_eq!(user.height, 175.0);
        assert_eq!(user.weight, 70.0);
        assert_eq!(user.gender, Sex::Male);
        assert_eq!(user.activity_level, ActivityLevel::VeryActive);
    }

    #[test]
    fn user_view_serializes_camel_case() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"username":"kasia","password":"hunter2"}"#).unwrap();
        let user = request.into_user("user-1".into(), "hash".into());
        let goals = calculate_goals(&user.body_profile()).unwrap();

        let json = serde_json::to_value(UserView::new(user, goals)).unwrap();
        assert_eq!(json["budgetLimit"], 0.0);
        assert_eq!(json["activityLevel"], "moderate");
        assert_eq!(json["goals"]["bmiCategory"], "Healthy");
        assert!(json.get("passwordHash").is_none());
    }
}
