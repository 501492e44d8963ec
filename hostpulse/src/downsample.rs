//! Stride downsampling of aligned chart series.

/// Default point budget handed to charts.
pub const MAX_CHART_POINTS: usize = 200;

/// Equal-length, index-aligned columns: one timestamp column plus one or
/// more value columns. Index i refers to the same logical sample in every
/// column. A missing value is `f64::NAN`, never a shortened column.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub timestamps: Vec<f64>,
    pub values: Vec<Vec<f64>>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Reduce `series` to at most `max_points` samples per column by taking
/// every `step`-th sample, starting at index 0. Identity when the series is
/// already within budget. Stride decimation, not averaging: spikes between
/// kept samples are not represented.
///
/// Panics on a zero budget (construction contract).
pub fn downsample(series: AlignedSeries, max_points: usize) -> AlignedSeries {
    assert!(max_points > 0, "downsample budget must be non-zero");
    let len = series.timestamps.len();
    if len <= max_points {
        return series;
    }

    let step = len.div_ceil(max_points);
    // Sample by the timestamp column's indices for every column, so the
    // outputs stay equal-length even if an input column ran short.
    let take = |col: &[f64]| -> Vec<f64> {
        (0..len)
            .step_by(step)
            .map(|i| col.get(i).copied().unwrap_or(f64::NAN))
            .collect()
    };

    AlignedSeries {
        timestamps: take(&series.timestamps),
        values: series.values.iter().map(|col| take(col)).collect(),
    }
}
