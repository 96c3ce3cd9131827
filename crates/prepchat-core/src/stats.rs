//! Dashboard practice statistics.
//!
//! Pure date-bucketing over the session list: counts for today, the
//! current week (starting Sunday), and the current month, progress toward
//! fixed practice goals, and a domain breakdown classified from session
//! titles. Sessions with unparsable timestamps are skipped.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, NaiveDate};

use crate::api::Conversation;

/// Practice goal: sessions per week.
pub const WEEKLY_GOAL: usize = 3;

/// Practice goal: sessions per month.
pub const MONTHLY_GOAL: usize = 10;

/// Aggregated session statistics for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub total: usize,
    pub today: usize,
    pub this_week: usize,
    pub this_month: usize,
    /// Percent of [`WEEKLY_GOAL`], capped at 100.
    pub weekly_progress: f64,
    /// Percent of [`MONTHLY_GOAL`], capped at 100.
    pub monthly_progress: f64,
    /// Domain label -> session count, keyed deterministically.
    pub domains: BTreeMap<String, usize>,
}

/// Computes session statistics relative to `today`.
pub fn session_stats(conversations: &[Conversation], today: NaiveDate) -> SessionStats {
    let week_start = today
        .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))
        .unwrap_or(today);
    let month_start = today.with_day(1).unwrap_or(today);

    let mut stats = SessionStats {
        total: conversations.len(),
        today: 0,
        this_week: 0,
        this_month: 0,
        weekly_progress: 0.0,
        monthly_progress: 0.0,
        domains: BTreeMap::new(),
    };

    for conversation in conversations {
        *stats
            .domains
            .entry(classify_domain(&conversation.title).to_string())
            .or_insert(0) += 1;

        let Some(date) = parse_date(&conversation.created_at) else {
            continue;
        };
        if date == today {
            stats.today += 1;
        }
        if date >= week_start && date <= today {
            stats.this_week += 1;
        }
        if date >= month_start && date <= today {
            stats.this_month += 1;
        }
    }

    stats.weekly_progress = goal_progress(stats.this_week, WEEKLY_GOAL);
    stats.monthly_progress = goal_progress(stats.this_month, MONTHLY_GOAL);
    stats
}

/// Classifies a session into an interview domain from its title keywords.
pub fn classify_domain(title: &str) -> &'static str {
    let title = title.to_lowercase();
    if title.contains("backend") || title.contains("api") {
        "Backend"
    } else if title.contains("frontend") || title.contains("react") {
        "Frontend"
    } else if title.contains("data") || title.contains("ml") {
        "Data/ML"
    } else if title.contains("hr") || title.contains("behavioral") {
        "HR/Behavioral"
    } else if title.contains("system") || title.contains("design") {
        "System Design"
    } else {
        "General"
    }
}

fn goal_progress(count: usize, goal: usize) -> f64 {
    (count as f64 / goal as f64 * 100.0).min(100.0)
}

fn parse_date(timestamp: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.date_naive())
}
