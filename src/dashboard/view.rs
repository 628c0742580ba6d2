use crate::analyzers::{
    filter_by_day_type, filter_by_weather, hourly_rental_profile, peak_hours, rental_trend,
    rentals_by_weather, weather_correlation, CorrelationMatrix, DayTypeFilter, HourlyProfile,
    PeakHours, SummaryStatistics, TrendLine, WeatherFilter, WeatherRentalStats,
};
use crate::dashboard::Dataset;
use crate::error::Result;
use crate::models::{DailyField, DailyRecord, DayType, HourlyRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use tracing::{debug, warn};

/// The user's current choice of filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub day_type: DayTypeFilter,
    pub weather: WeatherFilter,
}

impl Selection {
    pub fn new(day_type: DayTypeFilter, weather: WeatherFilter) -> Self {
        Self { day_type, weather }
    }

    /// Parse both selectors, rejecting values outside the offered choices.
    pub fn parse(day_type: &str, weather: &str) -> Result<Self> {
        Ok(Self {
            day_type: day_type.parse()?,
            weather: weather.parse()?,
        })
    }
}

/// One visualization's output; too few rows leaves that view unavailable
/// without affecting the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready { data: T },
    Unavailable { reason: String },
}

impl<T> Panel<T> {
    /// Soft errors become `Unavailable`; anything else is returned as is.
    pub fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(data) => Ok(Panel::Ready { data }),
            Err(e) if !e.is_fatal() => {
                debug!(reason = %e, "View unavailable");
                Ok(Panel::Unavailable {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready { .. })
    }
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub selection: Selection,
    #[serde(skip)]
    pub daily_rows: Vec<&'a DailyRecord>,
    #[serde(skip)]
    pub hourly_rows: Vec<&'a HourlyRecord>,
    pub daily_row_count: usize,
    pub hourly_row_count: usize,
    pub hourly_profile: HourlyProfile,
    pub peak_hours: Vec<PeakHours>,
    pub correlation: Panel<CorrelationMatrix>,
    pub trends: BTreeMap<DailyField, Panel<TrendLine>>,
    pub rentals_by_weather: Vec<WeatherRentalStats>,
    pub summary: &'a SummaryStatistics,
}

impl<'a> DashboardView<'a> {
    /// Recompute every view from the base tables for `selection`.
    ///
    /// The day-type selector drives the hourly views and the weather selector
    /// drives the daily ones.
    pub fn compute(
        dataset: &'a Dataset,
        selection: &Selection,
        correlation_fields: &[DailyField],
    ) -> Result<Self> {
        let hourly_rows = filter_by_day_type(dataset.hourly(), selection.day_type);
        let daily_rows = filter_by_weather(dataset.daily(), selection.weather);
        debug!(
            day_type = %selection.day_type,
            weather = %selection.weather,
            hourly_rows = hourly_rows.len(),
            daily_rows = daily_rows.len(),
            "Selection applied"
        );

        if hourly_rows.is_empty() {
            warn!(day_type = %selection.day_type, "No hourly rows match the selection");
        }
        if daily_rows.is_empty() {
            warn!(weather = %selection.weather, "No daily rows match the selection");
        }

        let hourly_profile = hourly_rental_profile(&hourly_rows);
        let peak_hours = peak_hours(&hourly_profile);
        let correlation = Panel::from_result(weather_correlation(&daily_rows, correlation_fields))?;

        let mut trends = BTreeMap::new();
        for field in DailyField::WEATHER_FACTORS {
            trends.insert(field, Panel::from_result(rental_trend(&daily_rows, field))?);
        }

        Ok(Self {
            selection: *selection,
            daily_row_count: daily_rows.len(),
            hourly_row_count: hourly_rows.len(),
            rentals_by_weather: rentals_by_weather(&daily_rows),
            daily_rows,
            hourly_rows,
            hourly_profile,
            peak_hours,
            correlation,
            trends,
            summary: dataset.summary(),
        })
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Bike Sharing Dashboard (day type: {}, weather: {})",
            self.selection.day_type, self.selection.weather
        );
        let _ = writeln!(
            out,
            "Rows: {} daily, {} hourly",
            self.daily_row_count, self.hourly_row_count
        );
        out.push('\n');

        out.push_str(&render_summary(self.summary));
        out.push('\n');
        out.push_str(&render_profile(&self.hourly_profile, &self.peak_hours));
        out.push('\n');

        out.push_str("Weather Correlation\n");
        match &self.correlation {
            Panel::Ready { data } => out.push_str(&render_matrix(data)),
            Panel::Unavailable { reason } => {
                let _ = writeln!(out, "  unavailable: {}", reason);
            }
        }
        out.push('\n');

        out.push_str("Rental Trends\n");
        for (field, panel) in &self.trends {
            match panel {
                Panel::Ready { data } => {
                    let _ = writeln!(
                        out,
                        "  {:<12} slope {:>10.1}  intercept {:>9.1}  r {}",
                        field.as_str(),
                        data.slope,
                        data.intercept,
                        format_correlation(data.correlation.coefficient())
                    );
                }
                Panel::Unavailable { reason } => {
                    let _ = writeln!(out, "  {:<12} unavailable: {}", field.as_str(), reason);
                }
            }
        }
        out.push('\n');

        out.push_str("Rentals by Weather\n");
        if self.rentals_by_weather.is_empty() {
            out.push_str("  no matching days\n");
        }
        for stats in &self.rentals_by_weather {
            let _ = writeln!(
                out,
                "  {:<28} days {:>4}  min {:>6.0}  q1 {:>7.1}  median {:>7.1}  q3 {:>7.1}  max {:>6.0}",
                stats.weather_situation.to_string(),
                stats.days,
                stats.min,
                stats.first_quartile,
                stats.median,
                stats.third_quartile,
                stats.max
            );
        }

        out
    }
}

pub fn render_summary(summary: &SummaryStatistics) -> String {
    let mut out = String::from("Summary\n");
    let _ = writeln!(out, "  Days:                {}", summary.days);
    match summary.mean_daily_rentals {
        Some(mean) => {
            let _ = writeln!(out, "  Mean daily rentals:  {:.1}", mean);
        }
        None => out.push_str("  Mean daily rentals:  n/a\n"),
    }
    let _ = writeln!(out, "  Total rentals:       {}", summary.total_rentals);
    for (day_type, mean) in &summary.mean_hourly_rentals_by_day_type {
        let _ = writeln!(
            out,
            "  Mean hourly ({:<7}): {:.1}",
            day_type.as_str(),
            mean
        );
    }
    out
}

pub fn render_profile(profile: &HourlyProfile, peaks: &[PeakHours]) -> String {
    let mut out = String::from("Hourly Rental Profile\n");
    if profile.is_empty() {
        out.push_str("  no matching hours\n");
        return out;
    }

    for day_type in DayType::ALL {
        let points = profile.points(day_type);
        if points.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {}", day_type.label());
        for point in points {
            let _ = writeln!(
                out,
                "    {:02}:00  {:>8.1}  ({} obs)",
                point.hour, point.mean_rentals, point.observations
            );
        }
    }

    for peak in peaks {
        let hours: Vec<String> = peak.hours.iter().map(|h| format!("{:02}:00", h)).collect();
        let _ = writeln!(
            out,
            "  Peak ({}): {} at {:.1}",
            peak.day_type.as_str(),
            hours.join(", "),
            peak.mean_rentals
        );
    }
    out
}

pub fn render_matrix(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    let _ = write!(out, "  {:<12}", "");
    for field in &matrix.fields {
        let _ = write!(out, " {:>12}", field.as_str());
    }
    out.push('\n');

    for (field, row) in matrix.fields.iter().zip(&matrix.values) {
        let _ = write!(out, "  {:<12}", field.as_str());
        for cell in row {
            let _ = write!(out, " {:>12}", format_correlation(cell.coefficient()));
        }
        out.push('\n');
    }
    let _ = writeln!(out, "  ({} days)", matrix.observations);
    out
}

fn format_correlation(value: Option<f64>) -> String {
    match value {
        Some(r) => format!("{:.3}", r),
        None => "undefined".to_string(),
    }
}
