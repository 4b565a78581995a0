//! Index combinations in lexicographic order.
//!
//! Both searches depend on enumeration order for their tie-breaks, so the
//! order here is fixed: for `n = 4, k = 2` the sequence is
//! `[0,1] [0,2] [0,3] [1,2] [1,3] [2,3]`.

use smallvec::SmallVec;

/// Index buffer; boards and hands are small.
pub type Indices = SmallVec<[usize; 10]>;

/// Iterator over all `k`-element index subsets of `0..n`.
#[derive(Clone, Debug)]
pub struct Combinations {
    n: usize,
    indices: Indices,
    started: bool,
    done: bool,
}

impl Combinations {
    /// `k > n` yields nothing; `k == 0` yields one empty set.
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }

    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        // Rightmost index that can still move right.
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) else {
            return false;
        };
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations {
    type Item = Indices;

    fn next(&mut self) -> Option<Indices> {
        if self.done {
            return None;
        }
        if self.started {
            if !self.advance() {
                self.done = true;
                return None;
            }
        } else {
            self.started = true;
        }
        Some(self.indices.clone())
    }
}
