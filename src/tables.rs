use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        aggregate::HourlyAggregate,
        export::{HeaderInfo, UsageSummary},
        hours::{HOURS_PER_DAY, HourSpan},
        plan::Plan,
        ranking::RankedPlan,
        weekday,
    },
    quantity::energy::KilowattHours,
};

const BAR_WIDTH: f64 = 30.0;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_overview_table(header: &HeaderInfo, summary: &UsageSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Customer", "Address", "Meter", "Number", "First", "Last", "Total"]);
    table.add_row(vec![
        Cell::new(&header.customer_name).add_attribute(Attribute::Bold),
        Cell::new(&header.customer_address),
        Cell::new(&header.meter_type),
        Cell::new(&header.meter_number).add_attribute(Attribute::Dim),
        Cell::new(summary.first_date.as_deref().unwrap_or("n/a")),
        Cell::new(summary.last_date.as_deref().unwrap_or("n/a")),
        Cell::new(format!("{:.2}", summary.total)).set_alignment(CellAlignment::Right),
    ]);
    table
}

/// Hours of the day with a consumption bar, colored from green (lowest) to red (highest).
pub fn build_hourly_table(hourly: &HourlyAggregate) -> Table {
    let total = hourly.total();
    let (min, max) = hourly.iter().fold((None, None), |(min, max), (_, consumption)| {
        (
            Some(min.map_or(consumption, |min: KilowattHours| min.min(consumption))),
            Some(max.map_or(consumption, |max: KilowattHours| max.max(consumption))),
        )
    });

    let mut table = new_table();
    table.set_header(vec!["Hours", "Consumption", "Share", ""]);
    for (hour, consumption) in hourly.iter() {
        let color = match (min, max) {
            (Some(min), Some(max)) if max > min => gradient((consumption - min).0 / (max - min).0),
            _ => Color::Reset,
        };
        let share = if total > KilowattHours::ZERO { consumption.0 / total.0 } else { 0.0 };
        let relative = max.filter(|max| *max > KilowattHours::ZERO).map_or(0.0, |max| consumption.0 / max.0);
        table.add_row(vec![
            Cell::new(HourSpan { start: hour, end: (hour + 1) % HOURS_PER_DAY }),
            Cell::new(format!("{consumption:.2}")).set_alignment(CellAlignment::Right).fg(color),
            Cell::new(format!("{:.1}%", share * 100.0))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(bar(relative)).fg(color),
        ]);
    }
    table
}

pub fn build_ranking_table(plans: &[RankedPlan]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "#", "Company", "Plan", "Active", "Days", "Hours", "Discount", "Free", "Link",
    ]);
    for plan in plans {
        let mut free = Cell::new(format!("{:.2}", plan.kwh_free)).set_alignment(CellAlignment::Right);
        free = if plan.rank == 1 {
            free.fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            free
        };
        table.add_row(vec![
            Cell::new(plan.rank).add_attribute(Attribute::Dim),
            Cell::new(&plan.company_name).add_attribute(Attribute::Bold),
            Cell::new(&plan.description),
            Cell::new(&plan.active),
            Cell::new(&plan.days),
            Cell::new(&plan.hours),
            Cell::new(plan.discount).set_alignment(CellAlignment::Right),
            free,
            Cell::new(&plan.link).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_catalog_table(plans: &[Plan]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Company", "Plan", "Active", "Days", "Hours", "Discounts", "Link"]);
    for plan in plans {
        table.add_row(vec![
            Cell::new(&plan.company_name).add_attribute(Attribute::Bold),
            Cell::new(&plan.description),
            Cell::new(&plan.activity),
            Cell::new(weekday::describe(plan.days)),
            Cell::new(plan.hours.describe()),
            Cell::new(&plan.discounts).set_alignment(CellAlignment::Right),
            Cell::new(&plan.link).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

/// Linear green-to-red color for `position` in `[0, 1]`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gradient(position: f64) -> Color {
    let position = position.clamp(0.0, 1.0);
    Color::Rgb { r: (255.0 * position).round() as u8, g: (255.0 * (1.0 - position)).round() as u8, b: 0 }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar(relative: f64) -> String {
    "█".repeat((relative.clamp(0.0, 1.0) * BAR_WIDTH).round() as usize)
}
