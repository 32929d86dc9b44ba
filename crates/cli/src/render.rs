//! Plain-text rendering for the terminal.

use bizadvisor_core::domain::recommendation::{
    RecommendationResponse, SearchHistoryItem, TrendSeries,
};
use bizadvisor_core::domain::user::User;
use bizadvisor_core::notify::{Notification, Notifier, Variant};
use std::fmt::Write;

/// Prints notifications to stderr so they don't mix with command output.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let marker = match notification.variant {
            Variant::Destructive => "!",
            Variant::Default => "*",
        };
        eprintln!(
            "[{marker}] {}: {}",
            notification.title, notification.description
        );
    }
}

pub fn user(user: &User) -> String {
    format!("{} <{}> (id {})", user.name, user.email, user.id)
}

pub fn card(rec: &RecommendationResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{} Risk]", rec.title, rec.risk_level);
    let _ = writeln!(out, "  {}", rec.description);
    let _ = writeln!(
        out,
        "  Investment: ${}   ROI: {}%   Time to profit: {}",
        amount(rec.investment_required),
        rec.roi,
        rec.time_to_profit
    );
    let _ = writeln!(out, "  id: {}", rec.id);
    out
}

pub fn details(rec: &RecommendationResponse) -> String {
    let mut out = card(rec);
    let _ = writeln!(out, "\nRisk level: {}", rec.risk_level);

    if !rec.why_this_business.is_empty() {
        let _ = writeln!(out, "\nWhy this business\n  {}", rec.why_this_business);
    }
    if !rec.key_benefits.is_empty() {
        let _ = writeln!(out, "\nKey benefits");
        for benefit in &rec.key_benefits {
            let _ = writeln!(out, "  - {benefit}");
        }
    }

    let _ = write!(out, "\n{}", trend("Market Trends", &rec.market_trends));
    out
}

pub fn trend(title: &str, series: &TrendSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let width = series.dates.iter().map(|d| d.len()).max().unwrap_or(0);
    for (date, value) in series.points() {
        let _ = writeln!(out, "  {date:<width$}  {}", amount(value));
    }
    if !series.trend_analysis.is_empty() {
        let _ = writeln!(out, "  {}", series.trend_analysis);
    }
    out
}

pub fn history(items: &[SearchHistoryItem]) -> String {
    if items.is_empty() {
        return "No recent searches found. Start by submitting a recommendation request."
            .to_string();
    }

    let mut out = String::from("Recent Searches\n");
    for item in items {
        let _ = writeln!(
            out,
            "  {}  {}  ${}  {}",
            item.timestamp.format("%b %-d, %Y"),
            item.request.industry,
            amount(item.request.budget),
            item.request.location
        );
    }
    out
}

/// Thousands-separated amount with at most two decimals, e.g. `1,234.5`.
pub fn amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
