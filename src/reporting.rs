/// Reporting and output formatting module
/// Renders alerts, source rankings and network statistics as console text

use crate::detection::summarize_alerts;
use crate::models::{Coordinates, SourceCandidate, StockoutAlert};
use crate::monte_carlo::StockoutRisk;
use crate::overview::NetworkOverview;
use crate::pairing::RedistributionPlan;

const WIDTH: usize = 78;

/// Boxed section title
pub fn banner(title: &str) -> String {
    let inner = WIDTH - 2;
    format!(
        "╔{bar}╗\n║{title:^inner$}║\n╚{bar}╝",
        bar = "═".repeat(inner),
        title = title,
        inner = inner
    )
}

/// "1h 5m" for durations of an hour or more, "43m" below that
pub fn format_eta(hours: f64) -> String {
    let mut whole_hours = hours.max(0.0).floor() as u64;
    let mut minutes = ((hours.max(0.0) - whole_hours as f64) * 60.0).round() as u64;
    if minutes == 60 {
        whole_hours += 1;
        minutes = 0;
    }
    if whole_hours > 0 {
        format!("{}h {}m", whole_hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Google Maps driving directions between two points
pub fn directions_url(origin: Coordinates, destination: Coordinates) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={},{}&travelmode=driving",
        origin.lat, origin.lng, destination.lat, destination.lng
    )
}

pub fn render_alerts(alerts: &[StockoutAlert]) -> String {
    if alerts.is_empty() {
        return "No stockouts detected. All facilities are above their safety stock.".to_string();
    }

    let summary = summarize_alerts(alerts);
    let mut lines = vec![format!(
        "{} stockout alerts ({} critical, {} high, {} medium)",
        summary.total, summary.critical, summary.high, summary.medium
    )];
    for alert in alerts {
        lines.push(format!(
            "  [{:<8}] {} ({}): {} - {} units, {}/day, min {} | {} days left | need {}",
            alert.urgency.label().to_uppercase(),
            alert.facility_name,
            alert.facility_kind,
            alert.drug_id,
            alert.current_stock,
            alert.daily_consumption,
            alert.minimum_stock,
            alert.days_until_stockout,
            alert.required_quantity,
        ));
    }
    lines.join("\n")
}

pub fn render_sources(alert: &StockoutAlert, sources: &[SourceCandidate]) -> String {
    if sources.is_empty() {
        return format!(
            "  No sources found for {} at {}. Escalate to manual procurement.",
            alert.drug_id, alert.facility_name
        );
    }

    let mut lines = Vec::new();
    for (rank, source) in sources.iter().enumerate() {
        lines.push(format!(
            "  {}. {} [{}] score {:.1}",
            rank + 1,
            source.facility_name,
            source.priority_tier.label(),
            source.score
        ));
        lines.push(format!(
            "     {} units available, can fulfill {} | {:.1} mi, ETA {} | ${:.2}",
            source.available_stock,
            source.can_fulfill,
            source.distance_miles,
            format_eta(source.eta_hours),
            source.cost_usd
        ));
        lines.push(format!("     {}", directions_url(source.coordinates, alert.coordinates)));
    }
    lines.join("\n")
}

pub fn render_risk(risk: &StockoutRisk) -> String {
    format!(
        "  Risk: {:.0}% chance of running out within horizon | days left p10/p50/p90: {}/{}/{} (mean {:.1}, {} runs)",
        risk.probability_within_horizon * 100.0,
        risk.p10_days,
        risk.p50_days,
        risk.p90_days,
        risk.mean_days,
        risk.simulations
    )
}

pub fn render_plan(plan: &RedistributionPlan) -> String {
    let alert = &plan.alert;
    [
        format!(
            "=== {} | {} ({}) ===",
            alert.urgency.label().to_uppercase(),
            alert.facility_name,
            alert.drug_id
        ),
        render_risk(&plan.risk),
        render_sources(alert, &plan.sources),
    ]
    .join("\n")
}

pub fn render_overview(overview: &NetworkOverview) -> String {
    let mut lines = vec![
        format!(
            "Facilities: {} ({} manufacturers, {} distributors, {} hospitals, {} pharmacies)",
            overview.total_facilities,
            overview.manufacturers,
            overview.distributors,
            overview.hospitals,
            overview.pharmacies
        ),
        format!(
            "Active stockouts: {} | Critical: {} | High: {}",
            overview.active_stockouts, overview.critical_alerts, overview.high_alerts
        ),
        format!("Average stock level: {:.1}% of capacity", overview.average_stock_level_pct),
    ];
    if !overview.critical_facilities.is_empty() {
        lines.push(format!("Critical facilities: {}", overview.critical_facilities.join(", ")));
        lines.push(format!("Critical drugs: {}", overview.critical_drugs.join(", ")));
    }
    for total in &overview.facility_stock_totals {
        lines.push(format!("  {:<30} {:<12} {:>8}", total.facility_name, total.kind, total.total_stock));
    }
    lines.join("\n")
}
