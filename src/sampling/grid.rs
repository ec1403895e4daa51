//! Dose grid generation.

/// Generate `count` evenly spaced values over `[start, stop]` (inclusive).
///
/// - `count == 0` gives an empty grid
/// - `count == 1` gives `[start]`
/// - otherwise the last value is exactly `stop`
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count as f64 - 1.0);
            let mut out = Vec::with_capacity(count);
            for i in 0..count - 1 {
                out.push(start + step * i as f64);
            }
            out.push(stop);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(0.0, 8.8, 100);
        assert_eq!(v.len(), 100);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[99], 8.8);
        assert!(v.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn linspace_small_counts() {
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert_eq!(linspace(1.0, 2.0, 2), vec![1.0, 2.0]);
        assert_eq!(linspace(3.0, 3.0, 3), vec![3.0, 3.0, 3.0]);
    }
}
