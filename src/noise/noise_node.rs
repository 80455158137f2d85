//! Nodes for generating colored noise in a processing graph.
//!
//! Each node wraps one of the generators from the parent module with
//! the default `SmallRng` source and produces a single `f32` sample per
//! call.

use crate::node::Node;
use crate::noise::{NoiseBinary, NoiseBrown, NoisePink, NoiseViolet, NoiseWhite};
use crate::Sender;
use rand::rngs::SmallRng;

create_node!(
    WhiteNoiseNode: f32,
    [noise: NoiseWhite<SmallRng>],
    [],
    |node: &mut WhiteNoiseNode| node.noise.sample()
);

create_node!(
    PinkNoiseNode: f32,
    [noise: NoisePink<SmallRng>],
    [],
    |node: &mut PinkNoiseNode| node.noise.sample()
);

create_node!(
    BrownNoiseNode: f32,
    [noise: NoiseBrown<SmallRng>],
    [],
    |node: &mut BrownNoiseNode| node.noise.sample()
);

create_node!(
    VioletNoiseNode: f32,
    [noise: NoiseViolet<SmallRng>],
    [],
    |node: &mut VioletNoiseNode| node.noise.sample()
);

create_node!(
    BinaryNoiseNode: f32,
    [noise: NoiseBinary<SmallRng>],
    [],
    |node: &mut BinaryNoiseNode| node.noise.sample()
);

/// Constructs a `WhiteNoiseNode` seeded from system entropy.
pub fn white_noise_node() -> WhiteNoiseNode {
    WhiteNoiseNode::new(NoiseWhite::new())
}

/// Constructs a `WhiteNoiseNode` with a reproducible stream.
pub fn white_noise_node_with_seed(seed: u32) -> WhiteNoiseNode {
    WhiteNoiseNode::new(NoiseWhite::with_seed(seed))
}

/// Constructs a `PinkNoiseNode` seeded from system entropy.
pub fn pink_noise_node() -> PinkNoiseNode {
    PinkNoiseNode::new(NoisePink::new())
}

/// Constructs a `PinkNoiseNode` with a reproducible stream.
pub fn pink_noise_node_with_seed(seed: u32) -> PinkNoiseNode {
    PinkNoiseNode::new(NoisePink::with_seed(seed))
}

/// Constructs a `BrownNoiseNode` seeded from system entropy.
pub fn brown_noise_node() -> BrownNoiseNode {
    BrownNoiseNode::new(NoiseBrown::new())
}

/// Constructs a `VioletNoiseNode` seeded from system entropy.
pub fn violet_noise_node() -> VioletNoiseNode {
    VioletNoiseNode::new(NoiseViolet::new())
}

/// Constructs a `BinaryNoiseNode` with the given flip amplitude.
pub fn binary_noise_node(amp: f32) -> BinaryNoiseNode {
    BinaryNoiseNode::new(NoiseBinary::with_amp(amp))
}
