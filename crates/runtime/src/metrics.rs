/// Summary of a recorded portfolio value series.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSummary {
    pub count: usize,
    pub start: f64,
    pub end: f64,
    pub min: f64,
    pub max: f64,
    /// `end / start - 1`, or zero when the series starts at zero.
    pub total_return: f64,
    /// Largest peak-to-trough fall as a fraction of the peak.
    pub max_drawdown: f64,
}

#[derive(Debug, Default, Clone)]
pub struct ValueHistory {
    values: Vec<f64>,
}

impl ValueHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn summary(&self) -> Option<ValueSummary> {
        let (&start, &end) = (self.values.first()?, self.values.last()?);
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let total_return = if start != 0.0 { end / start - 1.0 } else { 0.0 };

        Some(ValueSummary {
            count: self.values.len(),
            start,
            end,
            min,
            max,
            total_return,
            max_drawdown: max_drawdown(&self.values),
        })
    }
}

fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for &value in values {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }

    worst
}
