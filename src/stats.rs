use crate::types::Summary;

/// Minimum, maximum and floor-divided average of `samples`.
///
/// An empty slice yields all zeros.
pub fn summarize(samples: &[u64]) -> Summary {
    let Some(&first) = samples.first() else {
        return Summary::default();
    };

    let mut min = first;
    let mut max = first;
    let mut total: u128 = 0;
    for &value in samples {
        min = min.min(value);
        max = max.max(value);
        total += u128::from(value);
    }

    // avg <= max, so the narrowing cannot truncate
    let avg = (total / samples.len() as u128) as u64;

    Summary { min, max, avg }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(samples: &[u64]) -> (u64, u64, u64) {
        let s = summarize(samples);
        (s.min, s.max, s.avg)
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(triple(&[]), (0, 0, 0));
    }

    #[test]
    fn single_value() {
        assert_eq!(triple(&[5]), (5, 5, 5));
    }

    #[test]
    fn ascending_batch() {
        assert_eq!(triple(&[10, 20, 30]), (10, 30, 20));
    }

    #[test]
    fn unordered_batch() {
        assert_eq!(triple(&[30, 10, 20]), (10, 30, 20));
    }

    #[test]
    fn floor_division() {
        assert_eq!(triple(&[1, 2]), (1, 2, 1));
        assert_eq!(triple(&[2, 2, 3]).2, 2);
    }

    #[test]
    fn identical_values() {
        for v in [0, 1, 7, 1_000] {
            assert_eq!(triple(&[v; 4]), (v, v, v));
        }
    }

    #[test]
    fn average_between_bounds() {
        let batches: &[&[u64]] = &[
            &[0],
            &[1, 100],
            &[3, 3, 4],
            &[9, 1, 5, 7, 2],
            &[u64::MAX, u64::MAX - 1],
        ];
        for batch in batches {
            let s = summarize(batch);
            assert!(s.min <= s.avg, "min > avg for {batch:?}");
            assert!(s.avg <= s.max, "avg > max for {batch:?}");
        }
    }

    #[test]
    fn large_values_do_not_overflow() {
        assert_eq!(triple(&[u64::MAX, u64::MAX]), (u64::MAX, u64::MAX, u64::MAX));
    }
}
