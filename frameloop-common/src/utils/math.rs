// https://www.johndcook.com/blog/standard_deviation/
/// Running count, mean, variance and extremes of a stream of values.
#[derive(Clone, Copy, Debug)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn add(&mut self, value: impl Into<f64>) {
        let value = value.into();
        self.count += 1;
        let left = value - self.mean;
        self.mean += left / self.count as f64;
        self.m2 += left * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        if self.count <= 1 {
            return 0.0;
        }
        self.m2 / (self.count - 1) as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Into<f64>> Extend<A> for RunningStats {
    fn extend<T: IntoIterator<Item = A>>(&mut self, iter: T) {
        iter.into_iter().for_each(|a| self.add(a))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn float_cmp(a: f64, b: f64) -> bool {
        (a - b).abs() <= 0.01
    }

    #[test]
    fn empty() {
        let stats = RunningStats::new();
        assert_eq!(0, stats.count());
        assert_eq!(0.0, stats.mean());
        assert_eq!(0.0, stats.variance());
        assert_eq!(None, stats.min());
        assert_eq!(None, stats.max());
    }

    #[test]
    fn mean_and_variance() {
        let mut stats = RunningStats::new();
        stats.extend(vec![1, 2, 3]);
        assert_eq!(3, stats.count());
        assert!(float_cmp(2.0, stats.mean()));
        assert!(float_cmp(1.0, stats.variance()));
        assert_eq!(Some(1.0), stats.min());
        assert_eq!(Some(3.0), stats.max());
    }
}
