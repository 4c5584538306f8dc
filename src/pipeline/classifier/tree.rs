//! CART decision tree classifier using Gini impurity

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::majority_label;

/// Tree node. Children are indices into the model's node list.
#[derive(Debug, Clone)]
enum Node {
    Leaf {
        label: String,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Nodes are stored flat with the root at index 0, so neither growing nor
/// walking a deep tree recurses.
#[derive(Debug, Clone)]
pub struct DecisionTreeModel {
    nodes: Vec<Node>,
    n_features: usize,
}

/// Node waiting to be grown: its slot, its samples and its depth
struct PendingNode {
    slot: usize,
    indices: Vec<usize>,
    depth: usize,
}

/// Candidate split found while scanning one feature
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct TreeBuilder<'a> {
    features: &'a [Vec<f64>],
    /// Target encoded as indices into `classes`
    encoded: Vec<usize>,
    classes: Vec<String>,
    max_depth: Option<usize>,
    rng: StdRng,
}

impl DecisionTreeModel {
    /// Grow a tree until leaves are pure, no split reduces impurity, or
    /// `max_depth` is reached. Features are visited in an order shuffled by
    /// `random_state`, so equally good splits resolve reproducibly.
    pub fn fit(features: &[Vec<f64>], target: &[String], random_state: u64, max_depth: Option<usize>) -> Self {
        let mut classes: Vec<String> = target.to_vec();
        classes.sort();
        classes.dedup();

        let encoded = target
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or(0))
            .collect();

        let mut builder = TreeBuilder {
            features,
            encoded,
            classes,
            max_depth,
            rng: StdRng::seed_from_u64(random_state),
        };

        Self {
            nodes: builder.grow((0..features.len()).collect()),
            n_features: features.first().map_or(0, |f| f.len()),
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn predict(&self, samples: &[Vec<f64>]) -> Vec<String> {
        samples.iter().map(|s| self.predict_one(s)).collect()
    }

    pub fn predict_one(&self, sample: &[f64]) -> String {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { label } => return label.clone(),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if sample[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Number of leaves in the tree
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    /// Length of the longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0, 0)];
        while let Some((index, depth)) = stack.pop() {
            match &self.nodes[index] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        deepest
    }
}

impl TreeBuilder<'_> {
    /// Grow depth-first from a work stack. The left subtree is finished
    /// before the right one, which fixes the order the shuffles are drawn in.
    fn grow(&mut self, root: Vec<usize>) -> Vec<Node> {
        let mut nodes = vec![Node::Leaf { label: String::new() }];
        let mut pending = vec![PendingNode {
            slot: 0,
            indices: root,
            depth: 0,
        }];

        while let Some(PendingNode { slot, indices, depth }) = pending.pop() {
            let Some(best) = self.split_for(&indices, depth) else {
                nodes[slot] = self.leaf(&indices);
                continue;
            };

            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| self.features[i][best.feature] <= best.threshold);

            let left_slot = nodes.len();
            let right_slot = left_slot + 1;
            nodes.push(Node::Leaf { label: String::new() });
            nodes.push(Node::Leaf { label: String::new() });
            nodes[slot] = Node::Split {
                feature: best.feature,
                threshold: best.threshold,
                left: left_slot,
                right: right_slot,
            };

            pending.push(PendingNode {
                slot: right_slot,
                indices: right,
                depth: depth + 1,
            });
            pending.push(PendingNode {
                slot: left_slot,
                indices: left,
                depth: depth + 1,
            });
        }

        nodes
    }

    /// Split to apply at a node, or `None` when the node becomes a leaf
    fn split_for(&mut self, indices: &[usize], depth: usize) -> Option<SplitCandidate> {
        let counts = self.class_counts(indices);
        let parent_impurity = gini_impurity(&counts, indices.len());

        let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
        if parent_impurity == 0.0 || depth_reached || indices.len() < 2 {
            return None;
        }

        self.find_best_split(indices)
            .filter(|best| best.impurity < parent_impurity - 1e-12)
    }

    fn leaf(&self, indices: &[usize]) -> Node {
        let label = majority_label(indices.iter().map(|&i| self.classes[self.encoded[i]].as_str()))
            .unwrap_or_default()
            .to_string();
        Node::Leaf { label }
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.classes.len()];
        for &i in indices {
            counts[self.encoded[i]] += 1;
        }
        counts
    }

    /// Find the split with the lowest weighted child impurity. Thresholds are
    /// midpoints between distinct consecutive values.
    fn find_best_split(&mut self, indices: &[usize]) -> Option<SplitCandidate> {
        let n_features = self.features.first().map_or(0, |f| f.len());
        let mut order: Vec<usize> = (0..n_features).collect();
        order.shuffle(&mut self.rng);

        let n = indices.len();
        let total = self.class_counts(indices);
        let mut best: Option<SplitCandidate> = None;

        for feature in order {
            let mut sorted_pairs: Vec<(f64, usize)> = indices
                .iter()
                .map(|&i| (self.features[i][feature], self.encoded[i]))
                .collect();
            sorted_pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left = vec![0usize; self.classes.len()];
            for i in 0..n - 1 {
                left[sorted_pairs[i].1] += 1;

                // Skip if this value equals the next (no threshold separates them)
                if sorted_pairs[i].0 == sorted_pairs[i + 1].0 {
                    continue;
                }

                let left_count = i + 1;
                let right_count = n - left_count;
                let right: Vec<usize> = total.iter().zip(&left).map(|(t, l)| t - l).collect();

                let impurity = (left_count as f64 * gini_impurity(&left, left_count)
                    + right_count as f64 * gini_impurity(&right, right_count))
                    / n as f64;

                if best.map_or(true, |b| impurity < b.impurity) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: (sorted_pairs[i].0 + sorted_pairs[i + 1].0) / 2.0,
                        impurity,
                    });
                }
            }
        }

        best
    }
}

/// Gini impurity of a node given its per-class counts
fn gini_impurity(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}
