//! Dashboard aggregates computed from a user's meal log.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use itertools::Itertools;

use mealmetrics_model::{
    api::{ConsumedTotals, DailyCalories, MacroSplit, SpendingSummary, Summary, WeekSummary},
    meal::Meal,
    user::User,
};

/// Spending for the current calendar month, today's intake, and the
/// rolling seven-day window ending today. All bucketing is in UTC.
pub fn build(user: &User, meals: &[Meal], now: DateTime<Utc>) -> Summary {
    Summary {
        spending: spending(user, meals, now),
        today: today_totals(meals, now),
        week: week_summary(meals, now),
    }
}

fn spending(user: &User, meals: &[Meal], now: DateTime<Utc>) -> SpendingSummary {
    let month_total: f64 = meals
        .iter()
        .filter(|meal| meal.date.year() == now.year() && meal.date.month() == now.month())
        .map(|meal| meal.price)
        .sum();

    SpendingSummary {
        month_total,
        budget_limit: user.budget_limit,
        remaining: user.budget_limit - month_total,
        over_budget: month_total > user.budget_limit,
    }
}

fn today_totals(meals: &[Meal], now: DateTime<Utc>) -> ConsumedTotals {
    let today = now.date_naive();
    meals
        .iter()
        .filter(|meal| meal.date.date_naive() == today)
        .fold(
            ConsumedTotals {
                calories: 0.0,
                protein: 0.0,
                carbs: 0.0,
                fat: 0.0,
            },
            |acc, meal| ConsumedTotals {
                calories: acc.calories + meal.calories,
                protein: acc.protein + meal.protein,
                carbs: acc.carbs + meal.carbs,
                fat: acc.fat + meal.fat,
            },
        )
}

fn week_summary(meals: &[Meal], now: DateTime<Utc>) -> WeekSummary {
    let today = now.date_naive();
    let window_start = today - Duration::days(6);

    let in_window: Vec<&Meal> = meals
        .iter()
        .filter(|meal| {
            let day = meal.date.date_naive();
            day >= window_start && day <= today
        })
        .collect();

    let macro_totals = MacroSplit {
        protein: in_window.iter().map(|meal| meal.protein).sum(),
        carbs: in_window.iter().map(|meal| meal.carbs).sum(),
        fat: in_window.iter().map(|meal| meal.fat).sum(),
    };

    let by_day: HashMap<NaiveDate, f64> = in_window
        .iter()
        .map(|meal| (meal.date.date_naive(), meal.calories))
        .into_group_map()
        .into_iter()
        .map(|(day, calories)| (day, calories.into_iter().sum()))
        .collect();

    let daily_calories = (0..7)
        .map(|offset| {
            let date = window_start + Duration::days(offset);
            DailyCalories {
                date,
                calories: by_day.get(&date).copied().unwrap_or(0.0),
            }
        })
        .collect();

    WeekSummary {
        macro_totals,
        daily_calories,
    }
}
