use ndarray::{ArrayView2, Axis};

/// Per-column first and second moments of a `(rows, columns)` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMoments {
    pub mean: Vec<f64>,
    /// Population variance (divides by the row count).
    pub var: Vec<f64>,
    pub rows: usize,
}

pub struct StatsHelper;

impl StatsHelper {
    /// Two-pass mean/variance accumulated in f64. Returns `None` for a matrix
    /// without rows.
    pub fn column_moments(rows: ArrayView2<f32>) -> Option<ColumnMoments> {
        let count = rows.nrows();
        if count == 0 {
            return None;
        }

        let mut mean = Vec::with_capacity(rows.ncols());
        let mut var = Vec::with_capacity(rows.ncols());
        for column in rows.axis_iter(Axis(1)) {
            let m = column.iter().map(|&v| v as f64).sum::<f64>() / count as f64;
            let v = column
                .iter()
                .map(|&x| {
                    let d = x as f64 - m;
                    d * d
                })
                .sum::<f64>()
                / count as f64;
            mean.push(m);
            var.push(v);
        }

        Some(ColumnMoments {
            mean,
            var,
            rows: count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn moments_of_empty_matrix_are_none() {
        let empty = Array2::<f32>::zeros((0, 3));
        assert!(StatsHelper::column_moments(empty.view()).is_none());
    }

    #[test]
    fn moments_use_population_variance() {
        let rows = array![[1.0f32, 5.0], [3.0, 5.0]];
        let moments = StatsHelper::column_moments(rows.view()).unwrap();
        assert_eq!(moments.mean, vec![2.0, 5.0]);
        assert_eq!(moments.var, vec![1.0, 0.0]);
        assert_eq!(moments.rows, 2);
    }
}
