//! Decision-tree classifier (CART with gini impurity).
//!
//! The packaging labels are a deterministic function of the raw features
//! (threshold rules on weight plus categorical equality), which is exactly
//! the family of functions an axis-aligned tree represents, so a single
//! fully grown tree recovers the labeling rule from the synthetic set.
//!
//! Splits use the convention `feature < threshold` goes left (thresholds are
//! midpoints between adjacent distinct values). Tie-breaking is first-wins
//! over (feature index, threshold), so fitting is deterministic.

use crate::error::{ModelError, Result};

#[derive(Debug, Clone)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            max_depth: 12,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

struct Builder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    n_classes: usize,
    params: &'a TreeParams,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Fit a tree on row-major features and class labels in `0..n_classes`.
    pub fn fit(x: &[Vec<f64>], y: &[usize], n_classes: usize, params: &TreeParams) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ModelError::Numerical {
                message: format!("bad training shape: {} rows, {} labels", x.len(), y.len()),
            });
        }
        if n_classes == 0 || y.iter().any(|&c| c >= n_classes) {
            return Err(ModelError::Numerical {
                message: "class label out of range".to_string(),
            });
        }
        let n_features = x[0].len();
        if x.iter().any(|row| row.len() != n_features) {
            return Err(ModelError::Numerical {
                message: "ragged feature rows".to_string(),
            });
        }

        let mut builder = Builder {
            x,
            y,
            n_classes,
            params,
            nodes: Vec::new(),
        };
        let indices: Vec<usize> = (0..x.len()).collect();
        builder.build(&indices, 0);

        Ok(DecisionTree {
            nodes: builder.nodes,
            n_features,
        })
    }

    /// Predicted class code for one feature vector.
    pub fn predict(&self, features: &[f64]) -> Result<usize> {
        if features.len() != self.n_features {
            return Err(ModelError::Numerical {
                message: format!(
                    "tree fitted on {} features, got {}",
                    self.n_features,
                    features.len()
                ),
            });
        }
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { class } => return Ok(*class),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if features[*feature] < *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Builder<'_> {
    /// Append the subtree for `indices` and return its root node index.
    fn build(&mut self, indices: &[usize], depth: usize) -> usize {
        let counts = self.class_counts(indices);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

        if pure || depth >= self.params.max_depth || indices.len() < 2 * self.params.min_samples_leaf
        {
            return self.push_leaf(&counts);
        }

        let Some((feature, threshold)) = self.best_split(indices) else {
            return self.push_leaf(&counts);
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.x[i][feature] < threshold);

        // Reserve the split slot before recursing so child indices are stable.
        let at = self.nodes.len();
        self.nodes.push(Node::Leaf { class: 0 });
        let left = self.build(&left_idx, depth + 1);
        let right = self.build(&right_idx, depth + 1);
        self.nodes[at] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        at
    }

    fn push_leaf(&mut self, counts: &[usize]) -> usize {
        // Majority class; ties resolve to the lowest code.
        let class = counts
            .iter()
            .enumerate()
            .max_by_key(|&(i, &c)| (c, std::cmp::Reverse(i)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.nodes.push(Node::Leaf { class });
        self.nodes.len() - 1
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += 1;
        }
        counts
    }

    /// Exhaustive search for the split with the lowest weighted gini.
    fn best_split(&self, indices: &[usize]) -> Option<(usize, f64)> {
        let n = indices.len() as f64;
        let parent_gini = gini(&self.class_counts(indices), indices.len());
        let min_leaf = self.params.min_samples_leaf;

        let n_features = self.x[indices[0]].len();
        let mut best: Option<(f64, usize, f64)> = None;

        for feature in 0..n_features {
            let mut order: Vec<usize> = indices.to_vec();
            order.sort_by(|&a, &b| {
                self.x[a][feature]
                    .partial_cmp(&self.x[b][feature])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut left_counts = vec![0usize; self.n_classes];
            let mut right_counts = self.class_counts(indices);

            for (k, &i) in order.iter().enumerate().take(order.len() - 1) {
                left_counts[self.y[i]] += 1;
                right_counts[self.y[i]] -= 1;

                let next = order[k + 1];
                let v = self.x[i][feature];
                let v_next = self.x[next][feature];
                if v >= v_next {
                    continue;
                }

                let n_left = k + 1;
                let n_right = order.len() - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let score = (n_left as f64 * gini(&left_counts, n_left)
                    + n_right as f64 * gini(&right_counts, n_right))
                    / n;
                if best.map_or(score < parent_gini - 1e-12, |(b, _, _)| score < b - 1e-12) {
                    best = Some((score, feature, (v + v_next) / 2.0));
                }
            }
        }

        best.map(|(_, feature, threshold)| (feature, threshold))
    }
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learns_a_threshold_rule_exactly() {
        // class = 1 iff feature0 > 3, regardless of feature1.
        let x: Vec<Vec<f64>> = (0..40)
            .map(|i| vec![(i % 8) as f64, (i / 8) as f64])
            .collect();
        let y: Vec<usize> = x.iter().map(|r| usize::from(r[0] > 3.0)).collect();

        let tree = DecisionTree::fit(&x, &y, 2, &TreeParams::default()).unwrap();
        assert_eq!(tree.predict(&[2.0, 4.0]).unwrap(), 0);
        assert_eq!(tree.predict(&[7.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn learns_a_nested_rule() {
        // Mirrors the shape of the packaging rule: a categorical equality
        // test dominated by a conjunction on two other features.
        let mut x = Vec::new();
        let mut y = Vec::new();
        for weight in 0..20 {
            for material in 0..4 {
                for fragility in 0..3 {
                    let w = weight as f64;
                    let label = if fragility == 2 && w > 10.0 {
                        0
                    } else if material == 1 {
                        1
                    } else if w < 1.0 {
                        2
                    } else {
                        3
                    };
                    x.push(vec![w, material as f64, fragility as f64]);
                    y.push(label);
                }
            }
        }

        let tree = DecisionTree::fit(&x, &y, 4, &TreeParams::default()).unwrap();
        for (row, label) in x.iter().zip(y.iter()) {
            assert_eq!(tree.predict(row).unwrap(), *label);
        }
    }

    #[test]
    fn pure_node_becomes_a_single_leaf() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0]];
        let y = vec![1, 1, 1];
        let tree = DecisionTree::fit(&x, &y, 2, &TreeParams::default()).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[9.0]).unwrap(), 1);
    }

    #[test]
    fn fitting_is_deterministic() {
        let x: Vec<Vec<f64>> = (0..50).map(|i| vec![(i % 10) as f64, (i % 7) as f64]).collect();
        let y: Vec<usize> = x.iter().map(|r| usize::from(r[0] + r[1] > 8.0)).collect();

        let a = DecisionTree::fit(&x, &y, 2, &TreeParams::default()).unwrap();
        let b = DecisionTree::fit(&x, &y, 2, &TreeParams::default()).unwrap();
        for i in 0..50 {
            let row = &x[i];
            assert_eq!(a.predict(row).unwrap(), b.predict(row).unwrap());
        }
        assert_eq!(a.node_count(), b.node_count());
    }
}
