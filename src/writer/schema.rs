//! Arrow schema of the enriched table and conversions to and from record batches

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::errors::{ClimateError, ClimateResult};
use crate::model::{
    DataQuality, DroughtClass, EnrichedRecord, IndexValue, PrecipitationPoint, Season,
};

/// Column layout of every written partition
pub fn record_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("year", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("precipitation_mm", DataType::Float64, false),
        Field::new("region_code", DataType::Utf8, false),
        Field::new("data_quality", DataType::Utf8, false),
        Field::new("drought_class", DataType::Utf8, false),
        Field::new("precipitation_anomaly_percent", DataType::Float64, true),
        Field::new("spi_1_month", DataType::Float64, true),
        Field::new("spi_3_month", DataType::Float64, true),
        Field::new("spi_6_month", DataType::Float64, true),
        Field::new("rolling_30d_avg", DataType::Float64, false),
        Field::new("rolling_90d_avg", DataType::Float64, false),
        Field::new("rolling_6m_avg", DataType::Float64, false),
        Field::new("rolling_12m_avg", DataType::Float64, false),
        Field::new("precipitation_percentile", DataType::Float64, false),
        Field::new("extreme_dry", DataType::Boolean, false),
        Field::new("extreme_wet", DataType::Boolean, false),
        Field::new("season", DataType::Utf8, false),
    ]))
}

fn float_column<F>(records: &[EnrichedRecord], f: F) -> ArrayRef
where
    F: Fn(&EnrichedRecord) -> f64,
{
    Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
}

fn index_column<F>(records: &[EnrichedRecord], f: F) -> ArrayRef
where
    F: Fn(&EnrichedRecord) -> IndexValue,
{
    Arc::new(Float64Array::from(
        records.iter().map(|r| f(r).value()).collect::<Vec<Option<f64>>>(),
    ))
}

fn string_column<F>(records: &[EnrichedRecord], f: F) -> ArrayRef
where
    F: Fn(&EnrichedRecord) -> &str,
{
    Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<&str>>()))
}

fn bool_column<F>(records: &[EnrichedRecord], f: F) -> ArrayRef
where
    F: Fn(&EnrichedRecord) -> bool,
{
    Arc::new(BooleanArray::from(records.iter().map(f).collect::<Vec<_>>()))
}

/// Builds one record batch holding every record
pub fn to_batch(records: &[EnrichedRecord]) -> ClimateResult<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(records.iter().map(|r| r.point.year).collect::<Vec<_>>())),
        Arc::new(Int32Array::from(
            records.iter().map(|r| r.point.month as i32).collect::<Vec<_>>(),
        )),
        float_column(records, |r| r.point.latitude),
        float_column(records, |r| r.point.longitude),
        float_column(records, |r| r.point.precipitation_mm),
        string_column(records, |r| r.point.region_code.as_str()),
        string_column(records, |r| r.point.data_quality.as_str()),
        string_column(records, |r| r.drought_class.as_str()),
        index_column(records, |r| r.precipitation_anomaly_percent),
        index_column(records, |r| r.spi_1_month),
        index_column(records, |r| r.spi_3_month),
        index_column(records, |r| r.spi_6_month),
        float_column(records, |r| r.rolling_30d_avg),
        float_column(records, |r| r.rolling_90d_avg),
        float_column(records, |r| r.rolling_6m_avg),
        float_column(records, |r| r.rolling_12m_avg),
        float_column(records, |r| r.precipitation_percentile),
        bool_column(records, |r| r.extreme_dry),
        bool_column(records, |r| r.extreme_wet),
        string_column(records, |r| r.season.as_str()),
    ];

    Ok(RecordBatch::try_new(record_schema(), columns)?)
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> ClimateResult<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|array| array.as_any().downcast_ref::<T>())
        .ok_or_else(|| ClimateError::Parquet(format!("Missing or mistyped column: {}", name)))
}

fn nullable(array: &Float64Array, row: usize) -> Option<f64> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

fn parse_label<T>(value: &str, column: &str, parse: fn(&str) -> Option<T>) -> ClimateResult<T> {
    parse(value).ok_or_else(|| {
        ClimateError::Parquet(format!("Unknown value '{}' in column {}", value, column))
    })
}

/// Converts a record batch back into typed records.
///
/// Stored nulls come back as absent indices; the original absence reason is not persisted.
pub fn from_batch(batch: &RecordBatch) -> ClimateResult<Vec<EnrichedRecord>> {
    let year = column::<Int32Array>(batch, "year")?;
    let month = column::<Int32Array>(batch, "month")?;
    let latitude = column::<Float64Array>(batch, "latitude")?;
    let longitude = column::<Float64Array>(batch, "longitude")?;
    let precipitation = column::<Float64Array>(batch, "precipitation_mm")?;
    let region_code = column::<StringArray>(batch, "region_code")?;
    let data_quality = column::<StringArray>(batch, "data_quality")?;
    let drought_class = column::<StringArray>(batch, "drought_class")?;
    let anomaly = column::<Float64Array>(batch, "precipitation_anomaly_percent")?;
    let spi_1 = column::<Float64Array>(batch, "spi_1_month")?;
    let spi_3 = column::<Float64Array>(batch, "spi_3_month")?;
    let spi_6 = column::<Float64Array>(batch, "spi_6_month")?;
    let rolling_30d = column::<Float64Array>(batch, "rolling_30d_avg")?;
    let rolling_90d = column::<Float64Array>(batch, "rolling_90d_avg")?;
    let rolling_6m = column::<Float64Array>(batch, "rolling_6m_avg")?;
    let rolling_12m = column::<Float64Array>(batch, "rolling_12m_avg")?;
    let percentile = column::<Float64Array>(batch, "precipitation_percentile")?;
    let extreme_dry = column::<BooleanArray>(batch, "extreme_dry")?;
    let extreme_wet = column::<BooleanArray>(batch, "extreme_wet")?;
    let season = column::<StringArray>(batch, "season")?;

    let mut records = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let point = PrecipitationPoint {
            year: year.value(row),
            month: month.value(row) as u32,
            latitude: latitude.value(row),
            longitude: longitude.value(row),
            precipitation_mm: precipitation.value(row),
            region_code: region_code.value(row).to_string(),
            data_quality: parse_label(data_quality.value(row), "data_quality", DataQuality::parse)?,
        };
        records.push(EnrichedRecord {
            point,
            drought_class: parse_label(drought_class.value(row), "drought_class", DroughtClass::parse)?,
            precipitation_anomaly_percent: IndexValue::from_stored(nullable(anomaly, row)),
            spi_1_month: IndexValue::from_stored(nullable(spi_1, row)),
            spi_3_month: IndexValue::from_stored(nullable(spi_3, row)),
            spi_6_month: IndexValue::from_stored(nullable(spi_6, row)),
            rolling_30d_avg: rolling_30d.value(row),
            rolling_90d_avg: rolling_90d.value(row),
            rolling_6m_avg: rolling_6m.value(row),
            rolling_12m_avg: rolling_12m.value(row),
            precipitation_percentile: percentile.value(row),
            extreme_dry: extreme_dry.value(row),
            extreme_wet: extreme_wet.value(row),
            season: parse_label(season.value(row), "season", Season::parse)?,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Absence;

    fn record(precip: f64, spi_1: IndexValue) -> EnrichedRecord {
        EnrichedRecord {
            point: PrecipitationPoint::from_cell(2024, 3, -25.0, 30.0, precip, "SOUTHERN_AFRICA"),
            drought_class: DroughtClass::Normal,
            precipitation_anomaly_percent: IndexValue::Absent(Absence::NoHistory),
            spi_1_month: spi_1,
            spi_3_month: IndexValue::Absent(Absence::ZeroVariance),
            spi_6_month: IndexValue::Value(0.25),
            rolling_30d_avg: precip,
            rolling_90d_avg: precip,
            rolling_6m_avg: precip,
            rolling_12m_avg: precip,
            precipitation_percentile: 50.0,
            extreme_dry: false,
            extreme_wet: false,
            season: Season::Autumn,
        }
    }

    #[test]
    fn test_batch_shape_and_nulls() {
        let records = vec![
            record(40.0, IndexValue::Value(-1.2)),
            record(-5.0, IndexValue::Absent(Absence::NoHistory)),
        ];
        let batch = to_batch(&records).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 20);

        let spi_1 = column::<Float64Array>(&batch, "spi_1_month").unwrap();
        assert!(!spi_1.is_null(0));
        assert!(spi_1.is_null(1));
        let quality = column::<StringArray>(&batch, "data_quality").unwrap();
        assert_eq!(quality.value(1), "INVALID");
    }

    #[test]
    fn test_from_batch_restores_values() {
        let records = vec![record(40.0, IndexValue::Value(-1.2))];
        let restored = from_batch(&to_batch(&records).unwrap()).unwrap();
        assert_eq!(restored[0].point, records[0].point);
        assert_eq!(restored[0].spi_1_month.value(), Some(-1.2));
        assert_eq!(restored[0].spi_3_month.value(), None);
        assert_eq!(restored[0].season, Season::Autumn);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let schema = Arc::new(Schema::new(vec![Field::new("year", DataType::Int32, false)]));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(Int32Array::from(vec![2024]))]).unwrap();
        assert!(matches!(from_batch(&batch), Err(ClimateError::Parquet(_))));
    }
}
