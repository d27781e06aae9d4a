use crate::Vec2;
use std::collections::HashMap;
use std::hash::Hash;

/// Box size of each node, as measured by whatever draws the labels
///
/// Measurements may lag one frame behind the layout: an unmeasured node is
/// a zero-size box and its edges attach to its center.
pub trait NodeSizes<N> {
    /// Full width and height of the node's box
    fn size(&self, node: N) -> Vec2;
}

impl<N, F: Fn(N) -> Vec2> NodeSizes<N> for F {
    fn size(&self, node: N) -> Vec2 {
        self(node)
    }
}

/// Measured sizes; missing entries are zero
impl<N: Eq + Hash + Copy> NodeSizes<N> for HashMap<N, Vec2> {
    fn size(&self, node: N) -> Vec2 {
        self.get(&node).copied().unwrap_or_default()
    }
}

/// Estimated label boxes for callers without a text renderer
///
/// Assumes a fixed average glyph width and surrounds the text with the same
/// padding the node boxes are drawn with.
#[derive(Debug, Clone)]
pub struct LabelEstimate<N> {
    labels: HashMap<N, usize>,
    glyph_width: f32,
    line_height: f32,
    padding: f32,
}

impl<N: Eq + Hash + Copy> LabelEstimate<N> {
    /// Estimate boxes for 12px sans-serif labels with 8px padding
    pub fn new<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = (N, &'a str)>,
    {
        Self::with_metrics(labels, 7.0, 14.0, 8.0)
    }

    pub fn with_metrics<'a, I>(labels: I, glyph_width: f32, line_height: f32, padding: f32) -> Self
    where
        I: IntoIterator<Item = (N, &'a str)>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|(node, text)| (node, text.chars().count()))
                .collect(),
            glyph_width,
            line_height,
            padding,
        }
    }
}

impl<N: Eq + Hash + Copy> NodeSizes<N> for LabelEstimate<N> {
    fn size(&self, node: N) -> Vec2 {
        match self.labels.get(&node) {
            Some(&chars) => Vec2::new(
                chars as f32 * self.glyph_width + 2.0 * self.padding,
                self.line_height + 2.0 * self.padding,
            ),
            None => Vec2::zero(),
        }
    }
}
