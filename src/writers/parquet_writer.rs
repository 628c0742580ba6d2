use crate::error::{AnalyticsError, Result};
use crate::models::{DailyRecord, HourlyRecord, WeatherSituation};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(AnalyticsError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the cleaned daily table. An empty table still yields a file with the schema.
    pub fn write_daily(&self, records: &[DailyRecord], path: &Path) -> Result<()> {
        let schema = daily_schema();
        let batch = daily_batch(records, schema.clone())?;
        self.write_batch(batch, schema, path)?;
        debug!(rows = records.len(), path = %path.display(), "Daily table written");
        Ok(())
    }

    /// Write the cleaned hourly table.
    pub fn write_hourly(&self, records: &[HourlyRecord], path: &Path) -> Result<()> {
        let schema = hourly_schema();
        let batch = hourly_batch(records, schema.clone())?;
        self.write_batch(batch, schema, path)?;
        debug!(rows = records.len(), path = %path.display(), "Hourly table written");
        Ok(())
    }

    fn write_batch(&self, batch: RecordBatch, schema: Arc<Schema>, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    /// Read a daily table written by `write_daily`.
    pub fn read_daily(&self, path: &Path) -> Result<Vec<DailyRecord>> {
        let mut records = Vec::new();
        for batch in read_batches(path)? {
            let dates = column::<Date32Array>(&batch, 0, "date")?;
            let temps = column::<Float64Array>(&batch, 1, "temperature_norm")?;
            let feels = column::<Float64Array>(&batch, 2, "feels_like_norm")?;
            let hums = column::<Float64Array>(&batch, 3, "humidity_norm")?;
            let winds = column::<Float64Array>(&batch, 4, "windspeed_norm")?;
            let weather = column::<UInt8Array>(&batch, 5, "weather_situation")?;
            let counts = column::<UInt32Array>(&batch, 6, "rental_count")?;

            for i in 0..batch.num_rows() {
                records.push(DailyRecord::new(
                    from_days(dates.value(i))?,
                    temps.value(i),
                    feels.value(i),
                    hums.value(i),
                    winds.value(i),
                    WeatherSituation::from_code(weather.value(i))?,
                    counts.value(i),
                ));
            }
        }
        Ok(records)
    }

    /// Read an hourly table written by `write_hourly`.
    pub fn read_hourly(&self, path: &Path) -> Result<Vec<HourlyRecord>> {
        let mut records = Vec::new();
        for batch in read_batches(path)? {
            let dates = column::<Date32Array>(&batch, 0, "date")?;
            let hours = column::<UInt8Array>(&batch, 1, "hour")?;
            let working = column::<BooleanArray>(&batch, 2, "is_working_day")?;
            let counts = column::<UInt32Array>(&batch, 3, "rental_count")?;

            for i in 0..batch.num_rows() {
                records.push(HourlyRecord::new(
                    from_days(dates.value(i))?,
                    hours.value(i),
                    working.value(i),
                    counts.value(i),
                ));
            }
        }
        Ok(records)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups,
            row_group_sizes,
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn daily_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("temperature_norm", DataType::Float64, false),
        Field::new("feels_like_norm", DataType::Float64, false),
        Field::new("humidity_norm", DataType::Float64, false),
        Field::new("windspeed_norm", DataType::Float64, false),
        Field::new("weather_situation", DataType::UInt8, false),
        Field::new("rental_count", DataType::UInt32, false),
    ]))
}

fn hourly_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("hour", DataType::UInt8, false),
        Field::new("is_working_day", DataType::Boolean, false),
        Field::new("rental_count", DataType::UInt32, false),
    ]))
}

fn daily_batch(records: &[DailyRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(
            records.iter().map(|r| to_days(r.date)).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.temperature_norm).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.feels_like_norm).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.humidity_norm).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.windspeed_norm).collect::<Vec<_>>(),
        )),
        Arc::new(UInt8Array::from(
            records
                .iter()
                .map(|r| r.weather_situation.code())
                .collect::<Vec<_>>(),
        )),
        Arc::new(UInt32Array::from(
            records.iter().map(|r| r.rental_count).collect::<Vec<_>>(),
        )),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

fn hourly_batch(records: &[HourlyRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(
            records.iter().map(|r| to_days(r.date)).collect::<Vec<_>>(),
        )),
        Arc::new(UInt8Array::from(
            records.iter().map(|r| r.hour).collect::<Vec<_>>(),
        )),
        Arc::new(BooleanArray::from(
            records.iter().map(|r| r.is_working_day).collect::<Vec<_>>(),
        )),
        Arc::new(UInt32Array::from(
            records.iter().map(|r| r.rental_count).collect::<Vec<_>>(),
        )),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

fn read_batches(path: &Path) -> Result<Vec<RecordBatch>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok(batches)
}

fn column<'a, A: Array + 'static>(
    batch: &'a RecordBatch,
    index: usize,
    name: &str,
) -> Result<&'a A> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| AnalyticsError::Config(format!("Invalid {} column type", name)))
}

/// Date32 counts days since 1970-01-01.
fn to_days(date: NaiveDate) -> i32 {
    (date - NaiveDate::default()).num_days() as i32
}

fn from_days(days: i32) -> Result<NaiveDate> {
    NaiveDate::default()
        .checked_add_signed(chrono::Duration::days(i64::from(days)))
        .ok_or_else(|| AnalyticsError::Config(format!("Date out of range: {} days", days)))
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups == 0 {
            0.0
        } else {
            self.total_rows as f64 / self.row_groups as f64
        };
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
            avg_rows
        )
    }
}
