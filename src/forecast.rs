use crate::calendar::{DayCalendar, WeekOfYear};
use crate::error::{EngineError, EngineResult};

/// One week's slice of a monthly forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyQuantity {
    pub week: WeekOfYear,
    pub quantity: u32,
}

/// Split a monthly forecast across weeks in proportion to each week's
/// working-day count, conserving the total exactly.
///
/// Largest Remainder Method: floor every raw share, then hand the leftover
/// units one at a time to the weeks with the largest fractional remainder,
/// earliest week first on ties. A week with zero working days gets exactly
/// zero and never receives a remainder unit.
pub fn distribute_monthly(
    monthly_quantity: u32,
    weeks: &[(WeekOfYear, u32)],
) -> EngineResult<Vec<WeeklyQuantity>> {
    let total_days: u32 = weeks.iter().map(|(_, days)| days).sum();

    if total_days == 0 {
        if monthly_quantity == 0 {
            return Ok(weeks
                .iter()
                .map(|&(week, _)| WeeklyQuantity { week, quantity: 0 })
                .collect());
        }
        return Err(EngineError::InvalidRecord(format!(
            "cannot distribute forecast {monthly_quantity} over a month with zero working days"
        )));
    }

    let mut quantities: Vec<u32> = Vec::with_capacity(weeks.len());
    let mut fractions: Vec<(usize, f64)> = Vec::with_capacity(weeks.len());
    let mut allocated: u32 = 0;

    for (idx, &(_, days)) in weeks.iter().enumerate() {
        let raw = monthly_quantity as f64 * days as f64 / total_days as f64;
        let floor = raw.floor() as u32;
        quantities.push(floor);
        allocated += floor;
        if days > 0 {
            fractions.push((idx, raw - floor as f64));
        }
    }

    // Stable sort keeps earlier weeks first among equal fractions.
    fractions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    // The leftover is always smaller than the number of weeks carrying a
    // fractional share, so one pass hands out every unit.
    let remainder = monthly_quantity.saturating_sub(allocated) as usize;
    for &(idx, _) in fractions.iter().take(remainder) {
        quantities[idx] += 1;
    }

    Ok(weeks
        .iter()
        .zip(quantities)
        .map(|(&(week, _), quantity)| WeeklyQuantity { week, quantity })
        .collect())
}

/// Convenience wrapper: weight the weeks of (year, month) by the locality's
/// day calendar and distribute.
pub fn distribute_month_for_locality(
    monthly_quantity: u32,
    day_calendar: &DayCalendar,
    year: i32,
    month: u32,
) -> EngineResult<Vec<WeeklyQuantity>> {
    let weeks = day_calendar.working_days_by_week_in_month(year, month);
    distribute_monthly(monthly_quantity, &weeks)
}
