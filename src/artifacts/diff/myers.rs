//! Myers' O(ND) shortest edit script over arbitrary sequences

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

impl<T> Edit<T> {
    pub fn value(&self) -> &T {
        match self {
            Edit::Delete { value } | Edit::Insert { value } | Edit::Equal { value } => value,
        }
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, Edit::Equal { .. })
    }

    pub fn prefix(&self) -> char {
        match self {
            Edit::Delete { .. } => '-',
            Edit::Insert { .. } => '+',
            Edit::Equal { .. } => ' ',
        }
    }
}

impl<T: Display> Display for Edit<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix(), self.value())
    }
}

pub trait DiffAlgorithm<T> {
    /// Edit script turning the old sequence into the new one
    fn diff(&self) -> Vec<Edit<T>>;
}

/// Greedy forward search for the furthest reaching D-paths, then a walk back
/// through the recorded frontiers. Deletions come before insertions on ties.
#[derive(Debug, Clone)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<'d, T: Eq + Clone> MyersDiff<'d, T> {
    pub fn new(a: &'d [T], b: &'d [T]) -> Self {
        MyersDiff { a, b }
    }

    fn offset(&self) -> isize {
        (self.a.len() + self.b.len()) as isize
    }

    fn slot(&self, k: isize) -> usize {
        (k + self.offset()) as usize
    }

    fn moves_down(&self, frontier: &[isize], d: isize, k: isize) -> bool {
        k == -d || (k != d && frontier[self.slot(k - 1)] < frontier[self.slot(k + 1)])
    }

    /// Frontier of every diagonal before each step `d`
    fn frontiers(&self) -> Vec<Vec<isize>> {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let mut frontier = vec![0isize; 2 * self.offset() as usize + 2];
        let mut trace = Vec::new();

        for d in 0..=self.offset() {
            trace.push(frontier.clone());

            for k in (-d..=d).step_by(2) {
                let mut x = match self.moves_down(&frontier, d, k) {
                    true => frontier[self.slot(k + 1)],
                    false => frontier[self.slot(k - 1)] + 1,
                };
                let mut y = x - k;

                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    x += 1;
                    y += 1;
                }
                frontier[self.slot(k)] = x;

                if x >= n && y >= m {
                    return trace;
                }
            }
        }

        trace
    }
}

impl<T: Eq + Clone> DiffAlgorithm<T> for MyersDiff<'_, T> {
    fn diff(&self) -> Vec<Edit<T>> {
        let mut edits = Vec::new();
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);

        for (d, frontier) in self.frontiers().iter().enumerate().rev() {
            let d = d as isize;
            let k = x - y;
            let prev_k = match self.moves_down(frontier, d, k) {
                true => k + 1,
                false => k - 1,
            };
            let prev_x = frontier[self.slot(prev_k)];
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                edits.push(Edit::Equal {
                    value: self.a[(x - 1) as usize].clone(),
                });
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                match x == prev_x {
                    true => edits.push(Edit::Insert {
                        value: self.b[(y - 1) as usize].clone(),
                    }),
                    false => edits.push(Edit::Delete {
                        value: self.a[(x - 1) as usize].clone(),
                    }),
                }
            }

            (x, y) = (prev_x, prev_y);
        }

        edits.reverse();
        edits
    }
}
