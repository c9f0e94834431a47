/// Running mean that ignores unset samples.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    pub(crate) fn push(&mut self, sample: Option<f64>) {
        if let Some(v) = sample {
            self.sum += v;
            self.count += 1;
        }
    }

    pub(crate) fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}
