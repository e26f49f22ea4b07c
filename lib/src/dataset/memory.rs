use crate::error::{LoanError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Feature matrix plus class labels.
#[derive(Clone, Debug, PartialEq)]
pub struct InMemoryDataset {
    x: Array2<f64>,
    y: Array1<u8>,
}

impl InMemoryDataset {
    pub fn new(x: Array2<f64>, y: Array1<u8>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(LoanError::InvalidParameter(format!(
                "x has {} rows but y has {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(LoanError::EmptyData("Dataset is empty".to_string()));
        }
        if let Some(bad) = y.iter().find(|&&c| c > 1) {
            return Err(LoanError::InvalidParameter(format!(
                "labels must be 0 or 1, got {bad}"
            )));
        }
        Ok(Self { x, y })
    }

    /// Build from row slices. All rows must have the same length.
    pub fn from_rows(rows: &[&[f64]], labels: &[u8]) -> Result<Self> {
        let n_features = rows.first().map_or(0, |r| r.len());
        if !rows.iter().all(|r| r.len() == n_features) {
            return Err(LoanError::InvalidParameter(
                "All rows must have the same number of features".to_string(),
            ));
        }
        let data: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        let x = Array2::from_shape_vec((rows.len(), n_features), data)
            .map_err(|e| LoanError::InvalidParameter(e.to_string()))?;
        Self::new(x, Array1::from_vec(labels.to_vec()))
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, u8> {
        self.y.view()
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.x.row(i)
    }

    /// Rows at `indices`, in that order. Indices may repeat.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }

    /// Shuffle row indices with a seeded generator and split off
    /// `ceil(len * test_size)` rows as the test set.
    ///
    /// Returns `(train, test)`. Fails unless both halves are non-empty.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> Result<(Self, Self)> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(LoanError::InvalidParameter(format!(
                "test_size must be in (0, 1), got {test_size}"
            )));
        }
        let n_test = (self.len() as f64 * test_size).ceil() as usize;
        if n_test == 0 || n_test >= self.len() {
            return Err(LoanError::InvalidParameter(format!(
                "cannot split {} rows with test_size {test_size}",
                self.len()
            )));
        }

        let mut indices: Vec<usize> = (0..self.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (test_idx, train_idx) = indices.split_at(n_test);
        Ok((self.select(train_idx), self.select(test_idx)))
    }
}
