//! Nodes for running designed IIR filters inside a processing graph.
//!
//! The nodes own their filter, so retuning from another thread is not
//! supported; reconfigure a pipeline by rebuilding it, or keep the
//! filter on one thread and drive it directly.

use crate::filter::design::{Butterworth, Chebyshev};
use crate::node::Node;
use crate::{Receiver, Sender};
use num_traits::{Float, FloatConst};

create_node!(
    ButterworthNode<T>: T where T: Float + FloatConst,
    [filt: Butterworth<T>],
    [recv: T],
    |node: &mut ButterworthNode<T>, x: T| node.filt.filter(x)
);

create_node!(
    ChebyshevNode<T>: T where T: Float + FloatConst,
    [filt: Chebyshev<T>],
    [recv: T],
    |node: &mut ChebyshevNode<T>, x: T| node.filt.filter(x)
);

create_node!(
    BatchButterworthNode<T>: Vec<T> where T: Float + FloatConst,
    [filt: Butterworth<T>],
    [recv: Vec<T>],
    |node: &mut BatchButterworthNode<T>, mut samples: Vec<T>| {
        node.filt.filter_block(&mut samples);
        samples
    }
);

create_node!(
    BatchChebyshevNode<T>: Vec<T> where T: Float + FloatConst,
    [filt: Chebyshev<T>],
    [recv: Vec<T>],
    |node: &mut BatchChebyshevNode<T>, mut samples: Vec<T>| {
        node.filt.filter_block(&mut samples);
        samples
    }
);

/// Constructs a `ButterworthNode` filtering one sample at a time.
pub fn butterworth_node<T: Float + FloatConst>(
    cutoff: T,
    order: u32,
) -> ButterworthNode<T> {
    ButterworthNode::new(Butterworth::new(cutoff, order))
}

/// Constructs a `ChebyshevNode` filtering one sample at a time.
pub fn chebyshev_node<T: Float + FloatConst>(
    cutoff: T,
    ripple: T,
    order: u32,
) -> ChebyshevNode<T> {
    ChebyshevNode::new(Chebyshev::new(cutoff, ripple, order))
}

/// Constructs a `BatchButterworthNode` filtering a block at a time.
pub fn batch_butterworth_node<T: Float + FloatConst>(
    cutoff: T,
    order: u32,
) -> BatchButterworthNode<T> {
    BatchButterworthNode::new(Butterworth::new(cutoff, order))
}

/// Constructs a `BatchChebyshevNode` filtering a block at a time.
pub fn batch_chebyshev_node<T: Float + FloatConst>(
    cutoff: T,
    ripple: T,
    order: u32,
) -> BatchChebyshevNode<T> {
    BatchChebyshevNode::new(Chebyshev::new(cutoff, ripple, order))
}

#[cfg(test)]
mod test {
    use crate::filter::design::Butterworth;
    use crate::filter::iir_node;
    use crate::node::Node;
    use crate::{channel, Receiver, Sender};
    use assert_approx_eq::assert_approx_eq;
    use std::thread;

    #[test]
    // A filter node must produce exactly the same impulse response as
    // driving the filter directly.
    fn test_butterworth_node_matches_direct_use() {
        let n = 64;

        create_node!(
            ImpulseNode: f64,
            [ticks: usize],
            [],
            |node: &mut ImpulseNode| {
                node.ticks += 1;
                if node.ticks == 1 {
                    1.0
                } else {
                    0.0
                }
            }
        );

        create_node!(
            CheckNode: (),
            [expected: Vec<f64>, received: Vec<f64>],
            [recv: f64],
            |node: &mut CheckNode, x: f64| {
                node.received.push(x);
                if node.received.len() == node.expected.len() {
                    for (got, want) in
                        node.received.iter().zip(node.expected.iter())
                    {
                        assert_approx_eq!(got, want, 1e-12);
                    }
                }
            }
        );

        let mut reference = Butterworth::new(0.25_f64, 4);
        let expected: Vec<f64> = (0..n)
            .map(|i| reference.filter(if i == 0 { 1.0 } else { 0.0 }))
            .collect();

        let mut source = ImpulseNode::new(0);
        let mut filt = iir_node::butterworth_node(0.25_f64, 4);
        let mut check = CheckNode::new(expected, Vec::new());

        connect_nodes!(source, filt, recv);
        connect_nodes!(filt, check, recv);

        thread::spawn(move || {
            for _ in 0..n {
                source.call();
            }
        });
        thread::spawn(move || {
            for _ in 0..n {
                filt.call();
            }
        });
        let handle = thread::spawn(move || {
            for _ in 0..n {
                check.call();
            }
        });
        assert!(handle.join().is_ok());
    }

    #[test]
    // The batch node must agree with the per-sample node on the same
    // input.
    fn test_batch_node_matches_per_sample() {
        let n = 16;

        create_node!(
            BlockNode: Vec<f64>,
            [sent: bool],
            [],
            |node: &mut BlockNode| {
                node.sent = true;
                let mut block = vec![0.0; 16];
                block[0] = 1.0;
                block
            }
        );

        create_node!(
            CheckNode: (),
            [expected: Vec<f64>],
            [recv: Vec<f64>],
            |node: &mut CheckNode, block: Vec<f64>| {
                for (got, want) in block.iter().zip(node.expected.iter()) {
                    assert_approx_eq!(got, want, 1e-12);
                }
            }
        );

        let mut reference = Butterworth::new(0.1_f64, 3);
        let expected: Vec<f64> = (0..n)
            .map(|i| reference.filter(if i == 0 { 1.0 } else { 0.0 }))
            .collect();

        let mut source = BlockNode::new(false);
        let mut filt = iir_node::batch_butterworth_node(0.1_f64, 3);
        let mut check = CheckNode::new(expected);

        connect_nodes!(source, filt, recv);
        connect_nodes!(filt, check, recv);

        thread::spawn(move || {
            source.call();
        });
        thread::spawn(move || {
            filt.call();
        });
        let handle = thread::spawn(move || {
            check.call();
        });
        assert!(handle.join().is_ok());
    }
}
