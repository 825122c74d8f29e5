//! Node graph ("neural network") animation.
//!
//! Nodes drift with constant velocity and bounce off the surface edges. Each
//! node links to a few others, chosen once at population time. A link is
//! drawn only while its endpoints are closer than the link distance, fading
//! linearly with distance and with the source node's activity. Activity
//! oscillates with time and node index and is never stored.

use crate::config::GraphConfig;
use crate::spawn::SpawnContext;
use crate::surface::{Fill, Rgba, Surface};
use crate::time::Time;
use crate::Animation;
use glam::Vec2;

const LINK_COLOR: Rgba = Rgba::new(0, 255, 255, 1.0);
const NODE_COLOR: Rgba = Rgba::new(255, 0, 255, 1.0);
const BASE_RADIUS: f32 = 3.0;
const ACTIVITY_RADIUS: f32 = 5.0;

/// One graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub position: Vec2,
    pub velocity: Vec2,
    links: Vec<usize>,
}

impl Node {
    /// Create a node at `index` in its collection.
    ///
    /// Links to `index` itself and repeated targets are dropped.
    pub fn new(index: usize, position: Vec2, velocity: Vec2, links: impl IntoIterator<Item = usize>) -> Self {
        let mut node = Self {
            position,
            velocity,
            links: Vec::new(),
        };
        for target in links {
            node.try_link(index, target);
        }
        node
    }

    /// Indices of the nodes this node draws a link to, in draw order.
    pub fn links(&self) -> &[usize] {
        &self.links
    }

    fn try_link(&mut self, index: usize, target: usize) -> bool {
        if target == index || self.links.contains(&target) {
            return false;
        }
        self.links.push(target);
        true
    }
}

/// A visible link for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub opacity: f32,
}

/// The node graph animation.
#[derive(Debug, Clone)]
pub struct GraphAnimation {
    config: GraphConfig,
    nodes: Vec<Node>,
}

impl GraphAnimation {
    /// An empty graph; the engine populates it on build.
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
        }
    }

    /// A graph with a fixed starting collection, e.g. for tests.
    ///
    /// The collection is still replaced on the next populate.
    pub fn from_nodes(config: GraphConfig, nodes: Vec<Node>) -> Self {
        Self { config, nodes }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Activity of node `index` at `time` seconds, in `[0, 1]`.
    pub fn activity(index: usize, time: f64) -> f32 {
        ((time + index as f64).sin() * 0.5 + 0.5) as f32
    }

    /// Opacity of a link of length `distance` from a node with `activity`.
    ///
    /// `None` at or beyond the link distance; the cutoff is hard.
    pub fn link_opacity(&self, distance: f32, activity: f32) -> Option<f32> {
        let max = self.config.link_distance;
        (distance < max).then(|| (1.0 - distance / max) * activity)
    }

    /// Node radius for a given activity.
    pub fn radius(activity: f32) -> f32 {
        BASE_RADIUS + activity * ACTIVITY_RADIUS
    }

    /// Links visible at `time`, in node order then link order.
    pub fn edges(&self, time: f64) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.iter().enumerate().flat_map(move |(i, node)| {
            let activity = Self::activity(i, time);
            node.links.iter().filter_map(move |&to| {
                let target = self.nodes.get(to)?;
                let distance = node.position.distance(target.position);
                self.link_opacity(distance, activity)
                    .map(|opacity| Edge { from: i, to, opacity })
            })
        })
    }

    fn sample_links(&self, index: usize, ctx: &mut SpawnContext) -> Vec<usize> {
        let count = self.config.node_count;
        let lo = self.config.min_links.min(self.config.max_links);
        let hi = self.config.min_links.max(self.config.max_links);

        let draws = ctx.random_index(lo, hi + 1);
        let mut node = Node::new(index, Vec2::ZERO, Vec2::ZERO, []);
        for _ in 0..draws {
            // A repeated or self-targeting draw is simply lost.
            node.try_link(index, ctx.random_index(0, count));
        }
        node.links
    }
}

impl Animation for GraphAnimation {
    fn name(&self) -> &'static str {
        "graph"
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn fade_color(&self) -> Rgba {
        Rgba::BLACK.with_alpha(self.config.fade)
    }

    fn populate(&mut self, ctx: &mut SpawnContext) {
        let mut nodes: Vec<Node> = (0..self.config.node_count)
            .map(|_| Node {
                position: ctx.random_in_bounds(),
                velocity: ctx.random_velocity(self.config.speed),
                links: Vec::new(),
            })
            .collect();

        if self.config.node_count > 1 {
            for (i, node) in nodes.iter_mut().enumerate() {
                node.links = self.sample_links(i, ctx);
            }
        }

        self.nodes = nodes;
    }

    fn update(&mut self, ctx: &mut SpawnContext) {
        let bounds = ctx.bounds;
        for node in &mut self.nodes {
            node.position += node.velocity;

            if node.position.x < 0.0 || node.position.x > bounds.x {
                node.velocity.x = -node.velocity.x;
            }
            if node.position.y < 0.0 || node.position.y > bounds.y {
                node.velocity.y = -node.velocity.y;
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface, time: &Time) {
        let t = time.elapsed();
        for (i, node) in self.nodes.iter().enumerate() {
            let activity = Self::activity(i, t);

            for &to in &node.links {
                let Some(target) = self.nodes.get(to) else {
                    continue;
                };
                let distance = node.position.distance(target.position);
                if let Some(opacity) = self.link_opacity(distance, activity) {
                    surface.stroke_line(
                        node.position,
                        target.position,
                        opacity * 2.0,
                        LINK_COLOR.with_alpha(opacity),
                    );
                }
            }

            surface.fill_circle(
                node.position,
                Self::radius(activity),
                Fill::Radial {
                    inner: NODE_COLOR.with_alpha(activity),
                    outer: NODE_COLOR.with_alpha(0.0),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use glam::UVec2;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn populated(config: GraphConfig, seed: u64) -> GraphAnimation {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ctx = SpawnContext::new(Vec2::new(800.0, 600.0), &mut rng);
        let mut graph = GraphAnimation::new(config);
        graph.populate(&mut ctx);
        graph
    }

    #[test]
    fn test_populate_count_and_ranges() {
        let graph = populated(GraphConfig::default(), 7);
        assert_eq!(graph.len(), 50);
        for node in graph.nodes() {
            assert!((0.0..800.0).contains(&node.position.x));
            assert!((0.0..600.0).contains(&node.position.y));
            assert!(node.velocity.x.abs() <= 0.25);
            assert!(node.velocity.y.abs() <= 0.25);
        }
    }

    #[test]
    fn test_links_have_no_self_loops_or_duplicates() {
        for seed in 0..20 {
            let graph = populated(GraphConfig::default(), seed);
            for (i, node) in graph.nodes().iter().enumerate() {
                assert!(node.links().len() <= 6);
                assert!(!node.links().contains(&i));
                let mut sorted = node.links().to_vec();
                sorted.sort_unstable();
                sorted.dedup();
                assert_eq!(sorted.len(), node.links().len());
                assert!(node.links().iter().all(|&t| t < 50));
            }
        }
    }

    #[test]
    fn test_two_node_graph_may_get_fewer_links() {
        // Only one legal target exists, so no node can reach min_links.
        let config = GraphConfig {
            node_count: 2,
            ..Default::default()
        };
        let graph = populated(config, 11);
        for (i, node) in graph.nodes().iter().enumerate() {
            assert!(node.links().len() <= 1);
            if let Some(&t) = node.links().first() {
                assert_eq!(t, 1 - i);
            }
        }
    }

    #[test]
    fn test_single_node_has_no_links() {
        let config = GraphConfig {
            node_count: 1,
            ..Default::default()
        };
        let graph = populated(config, 5);
        assert_eq!(graph.len(), 1);
        assert!(graph.nodes()[0].links().is_empty());
    }

    #[test]
    fn test_node_new_filters_self_and_duplicates() {
        let node = Node::new(2, Vec2::ZERO, Vec2::ZERO, [2, 0, 1, 0, 3]);
        assert_eq!(node.links(), &[0, 1, 3]);
    }

    #[test]
    fn test_activity_range_and_phase() {
        assert_eq!(GraphAnimation::activity(0, 0.0), 0.5);
        for i in 0..10 {
            let a = GraphAnimation::activity(i, 12.34);
            assert!((0.0..=1.0).contains(&a));
        }
        let quarter = std::f64::consts::FRAC_PI_2;
        assert!((GraphAnimation::activity(0, quarter) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_link_cutoff_is_hard() {
        let graph = GraphAnimation::new(GraphConfig::default());
        assert_eq!(graph.link_opacity(200.0, 1.0), None);
        assert_eq!(graph.link_opacity(250.0, 1.0), None);
        let near = graph.link_opacity(199.0, 1.0).unwrap();
        assert!(near > 0.0);
        assert!((graph.link_opacity(100.0, 0.5).unwrap() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_flips_velocity_without_clamping() {
        let nodes = vec![Node::new(0, Vec2::new(799.9, 10.0), Vec2::new(0.2, -0.1), [])];
        let mut graph = GraphAnimation::from_nodes(GraphConfig::default(), nodes);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut ctx = SpawnContext::new(Vec2::new(800.0, 600.0), &mut rng);

        graph.update(&mut ctx);
        let node = &graph.nodes()[0];
        assert!(node.position.x > 800.0);
        assert_eq!(node.velocity, Vec2::new(-0.2, -0.1));

        graph.update(&mut ctx);
        let node = &graph.nodes()[0];
        assert!(node.position.x <= 800.0);
        assert_eq!(node.velocity, Vec2::new(-0.2, -0.1));
    }

    #[test]
    fn test_draw_order_edges_then_node() {
        let nodes = vec![
            Node::new(0, Vec2::new(10.0, 10.0), Vec2::ZERO, [1]),
            Node::new(1, Vec2::new(60.0, 10.0), Vec2::ZERO, []),
        ];
        let graph = GraphAnimation::from_nodes(GraphConfig::default(), nodes);
        let mut surface = RecordingSurface::new(UVec2::new(100, 100));
        graph.draw(&mut surface, &Time::new(0.0));

        let commands = surface.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::Line { .. }));
        assert!(matches!(commands[1], DrawCommand::Circle { .. }));
        assert!(matches!(commands[2], DrawCommand::Circle { .. }));

        if let DrawCommand::Line { width, color, .. } = commands[0] {
            // distance 50, activity 0.5: (1 - 0.25) * 0.5
            assert!((color.a - 0.375).abs() < 1e-6);
            assert!((width - 0.75).abs() < 1e-6);
        }
        if let DrawCommand::Circle { radius, fill, .. } = commands[1] {
            assert_eq!(radius, 5.5);
            assert_eq!(
                fill,
                Fill::Radial {
                    inner: Rgba::new(255, 0, 255, 0.5),
                    outer: Rgba::new(255, 0, 255, 0.0),
                }
            );
        }
    }

    #[test]
    fn test_edges_iterator_matches_draw() {
        let nodes = vec![
            Node::new(0, Vec2::ZERO, Vec2::ZERO, [1, 2]),
            Node::new(1, Vec2::new(150.0, 0.0), Vec2::ZERO, [0]),
            Node::new(2, Vec2::new(300.0, 0.0), Vec2::ZERO, [1]),
        ];
        let graph = GraphAnimation::from_nodes(GraphConfig::default(), nodes);
        let edges: Vec<_> = graph.edges(0.0).map(|e| (e.from, e.to)).collect();
        assert_eq!(edges, vec![(0, 1), (1, 0), (2, 1)]);
    }
}
