pub mod correlation;
pub mod filters;
pub mod hourly_profile;
pub mod summary;

pub use correlation::{
    pearson, rental_trend, weather_correlation, Correlation, CorrelationMatrix, TrendLine,
};
pub use filters::{filter_by_day_type, filter_by_weather, DayTypeFilter, WeatherFilter};
pub use hourly_profile::{hourly_rental_profile, peak_hours, HourlyProfile, PeakHours, ProfilePoint};
pub use summary::{
    rentals_by_weather, summary_statistics, total_rentals, SummaryStatistics, WeatherRentalStats,
};
