use crate::error::{AnalyticsError, Result};
use crate::models::{DailyField, DailyRecord};
use crate::utils::constants::MIN_ROWS_FOR_CORRELATION;
use serde::Serialize;

/// One cell of a correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Correlation {
    Coefficient(f64),
    /// At least one of the two fields has zero variance.
    Undefined,
}

impl Correlation {
    pub fn coefficient(&self) -> Option<f64> {
        match self {
            Correlation::Coefficient(r) => Some(*r),
            Correlation::Undefined => None,
        }
    }
}

/// Square, symmetric Pearson matrix; `values[i][j]` pairs `fields[i]` with `fields[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<DailyField>,
    pub values: Vec<Vec<Correlation>>,
    pub observations: usize,
}

impl CorrelationMatrix {
    pub fn get(&self, a: DailyField, b: DailyField) -> Option<Correlation> {
        let i = self.fields.iter().position(|f| *f == a)?;
        let j = self.fields.iter().position(|f| *f == b)?;
        Some(self.values[i][j])
    }
}

/// Least-squares line `rental_count = slope * field + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLine {
    pub field: DailyField,
    pub slope: f64,
    pub intercept: f64,
    pub correlation: Correlation,
    pub observations: usize,
}

impl TrendLine {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Pearson correlation matrix over `fields` plus `rental_count`.
///
/// Fields keep their requested order, duplicates collapse, and `rental_count`
/// is appended when not requested.
pub fn weather_correlation(
    daily: &[&DailyRecord],
    fields: &[DailyField],
) -> Result<CorrelationMatrix> {
    if daily.len() < MIN_ROWS_FOR_CORRELATION {
        return Err(AnalyticsError::insufficient(
            "weather correlation",
            daily.len(),
            MIN_ROWS_FOR_CORRELATION,
        ));
    }

    let mut columns_fields: Vec<DailyField> = Vec::with_capacity(fields.len() + 1);
    for field in fields.iter().chain(std::iter::once(&DailyField::RentalCount)) {
        if !columns_fields.contains(field) {
            columns_fields.push(*field);
        }
    }

    let columns: Vec<Vec<f64>> = columns_fields
        .iter()
        .map(|field| daily.iter().map(|r| r.value(*field)).collect())
        .collect();

    let values = columns
        .iter()
        .map(|x| columns.iter().map(|y| pearson(x, y)).collect())
        .collect();

    Ok(CorrelationMatrix {
        fields: columns_fields,
        values,
        observations: daily.len(),
    })
}

/// Regression of rentals on one weather factor, as drawn over a scatter plot.
pub fn rental_trend(daily: &[&DailyRecord], field: DailyField) -> Result<TrendLine> {
    let view = format!("{} trend", field);
    if daily.len() < MIN_ROWS_FOR_CORRELATION {
        return Err(AnalyticsError::insufficient(
            view,
            daily.len(),
            MIN_ROWS_FOR_CORRELATION,
        ));
    }

    let x: Vec<f64> = daily.iter().map(|r| r.value(field)).collect();
    let y: Vec<f64> = daily.iter().map(|r| r.rental_count as f64).collect();
    if is_constant(&x) {
        return Err(AnalyticsError::insufficient(view, daily.len(), MIN_ROWS_FOR_CORRELATION));
    }

    let mean_x = mean(&x);
    let mean_y = mean(&y);
    let (sxx, sxy) = x
        .iter()
        .zip(&y)
        .fold((0.0, 0.0), |(sxx, sxy), (xi, yi)| {
            let dx = xi - mean_x;
            (sxx + dx * dx, sxy + dx * (yi - mean_y))
        });

    let slope = sxy / sxx;
    Ok(TrendLine {
        field,
        slope,
        intercept: mean_y - slope * mean_x,
        correlation: pearson(&x, &y),
        observations: daily.len(),
    })
}

/// Pearson's r, clamped to [-1, 1]; undefined when either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Correlation {
    let n = x.len().min(y.len());
    if n < MIN_ROWS_FOR_CORRELATION || is_constant(&x[..n]) || is_constant(&y[..n]) {
        return Correlation::Undefined;
    }

    let mean_x = mean(&x[..n]);
    let mean_y = mean(&y[..n]);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (xi, yi) in x[..n].iter().zip(&y[..n]) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let r = sxy / (sxx.sqrt() * syy.sqrt());
    if r.is_finite() {
        Correlation::Coefficient(r.clamp(-1.0, 1.0))
    } else {
        Correlation::Undefined
    }
}

/// Exact comparison: floating-point noise in the mean must not invent variance.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
