//! Provides an infrastructure to create processing nodes, connect nodes
//! together via crossbeam channels, and start nodes running in their own
//! independent threads.
//!
//! The DSP types in this crate are plain single-threaded objects; a node
//! wraps one of them together with the channel endpoints needed to use it
//! as a stage in a pipeline.
//!
//! # Example
//!
//! ```
//! #[macro_use] extern crate sigproc_rs;
//! use sigproc_rs::node::Node;
//! use sigproc_rs::{channel, Receiver, Sender};
//! use std::thread;
//!
//! # fn main() {
//! // A source node producing a constant and a sink node checking it.
//! // For nodes that receive inputs, the receivers must explicitly be
//! // named.
//! create_node!(Source: f32, [], [], { |_| 0.5 });
//! create_node!(Sink: (), [], [recv: f32], { |_, x| assert_eq!(x, 0.5) });
//!
//! let mut source = Source::new();
//! let mut sink = Sink::new();
//!
//! // Sink will receive messages from source on its `recv` receiver.
//! connect_nodes!(source, sink, recv);
//!
//! // Run the source on its own thread and pull one value through.
//! start_nodes!(source);
//! sink.call();
//! # }
//! ```

/// The trait that all nodes in the library implement. Only contains a
/// single function: `call(&mut self)` which executes the function in the
/// node once.
pub trait Node {
    fn call(&mut self);
}

/// Creates a structure with crossbeam senders and receivers automatically
/// and auto-implements the Node trait.
///
/// # Arguments
///
/// create_node!(name: out_type, [fields: field_type], [recv: recv_type], func);
///
/// - name: The name of the node to construct.
/// - out_type: The type the node outputs, can be () if the node doesn't
///   send anything to another node.
/// - [fields: field_type]: A list of fields with their types to add to
///   the structure. This is useful for maintaining state within the
///   structure, such as the filter or noise generator the node wraps.
/// - [recv: recv_type]: A list of receiver field names to add to the
///   structure along with the type.
/// - func: The function this node executes upon executing `call()`. The
///   function must accept a mutable reference to the node being
///   constructed as its first parameter, followed by one parameter per
///   receiver.
///
/// Generics can be passed with trait bounds spelled out after the output
/// type:
///
/// create_node!(name<generic>: out_type where generic: Trait + Trait,
///     [fields: field_type], [recv: recv_type], func);
#[macro_export]
macro_rules! create_node {
    ($name:ident: $out:ty, [$($state:ident: $type:ty),*], [$($recv:ident: $in:ty),*], $func:expr) => {
        pub struct $name {
            $(
                pub $recv: Option<Receiver<$in>>,
            )*
            pub sender: Vec<Sender<$out>>,
            $(
                pub $state: $type,
            )*
        }

        impl $name {
            generate_new!($name, [$($state: $type),*], [$($recv),*]);
        }

        impl Node for $name
        {
            generate_call!($func, $($recv),*);
        }
    };

    ($name:ident<$($gen:ident),+>: $out:ty, [$($state:ident: $type:ty),*],
     [$($recv:ident: $in:ty),*], $func:expr) => {
        pub struct $name<$($gen,)+> {
            $(
                pub $recv: Option<Receiver<$in>>,
            )*
            pub sender: Vec<Sender<$out>>,
            $(
                pub $state: $type,
            )*
        }

        impl<$($gen,)*> $name<$($gen,)+> {
            generate_new!($name<$($gen),+>, [$($state: $type),*], [$($recv),*]);
        }

        impl<$($gen,)*> Node for $name<$($gen,)+>
        {
            generate_call!($func, $($recv),*);
        }
    };

    ($name:ident<$($gen:ident),+>: $out:ty where $($gen_t:ident: $where:ident $(+ $where_rep:ident),*),+,
     [$($state:ident: $type:ty),*], [$($recv:ident: $in:ty),*], $func:expr) => {
        pub struct $name<$($gen,)+>
        where $( $gen_t: $where $(+ ($where_rep))*, )+
        {
            $(
                pub $recv: Option<Receiver<$in>>,
            )*
            pub sender: Vec<Sender<$out>>,
            $(
                pub $state: $type,
            )*
        }

        impl<$($gen,)*> $name<$($gen,)+>
        where $( $gen_t: $where $(+ ($where_rep))*, )+
        {
            generate_new!($name<$($gen),+>, [$($state: $type),*], [$($recv),*]);
        }

        impl<$($gen,)*> Node for $name<$($gen,)+>
        where $( $gen_t: $where $(+ ($where_rep))*, )+
        {
            generate_call!($func, $($recv),*);
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! generate_call {
    ($func:expr, $($recv:ident),*) => {
        fn call(&mut self) {
            $(
                let $recv = match self.$recv {
                    Some(ref r) => r.recv().unwrap(),
                    None => return,
                };
            )*
            let res = ($func)(&mut *self, $($recv,)*);
            for send in &self.sender {
                let _ = send.send(res.clone());
            }
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! generate_new {
    ($name:ident, [$($state:ident: $type:ty),*], [$($recv:ident),*]) => {
        pub fn new($($state: $type,)*) -> $name {
            $name {
                $(
                    $recv: None,
                )*
                $(
                    $state,
                )*
                sender: vec![],
            }
        }
    };
    ($name:ident<$($gen:ident),*>, [$($state:ident: $type:ty),*], [$($recv:ident),*]) => {
        pub fn new($($state: $type,)*) -> $name<$($gen,)*> {
            $name {
                $(
                    $recv: None,
                )*
                $(
                    $state,
                )*
                sender: vec![],
            }
        }
    }
}

/// Connects two nodes together with crossbeam channels.
///
/// ```
/// # #[macro_use] extern crate sigproc_rs;
/// # use sigproc_rs::node::Node;
/// # use sigproc_rs::{channel, Receiver, Sender};
/// # fn main() {
/// # create_node!(Node1: u32, [], [], |_| 1);
/// # create_node!(Node2: (), [], [recv: u32], { |_, x| assert_eq!(x, 1) });
/// let mut node1 = Node1::new();
/// let mut node2 = Node2::new();
///
/// // node1 will now send its messages to node2. node2 will receive the
/// // message on its receiver named `recv`.
/// connect_nodes!(node1, node2, recv);
/// # }
/// ```
#[macro_export]
macro_rules! connect_nodes {
    ($n1:ident, $n2:ident, $recv:ident) => {{
        let (send, recv) = channel::bounded(0);
        $n1.sender.push(send);
        $n2.$recv = Some(recv);
    }};
}

/// Spawns a thread for each node in order and starts nodes to run
/// indefinitely.
///
/// # Example
///
/// ```
/// # #[macro_use] extern crate sigproc_rs;
/// # use sigproc_rs::node::Node;
/// # use sigproc_rs::{channel, Receiver, Sender};
/// # use std::thread;
/// # fn main() {
/// # create_node!(Node1: u32, [], [], |_| 1);
/// # create_node!(Node2: (), [], [recv: u32], |_, x| assert_eq!(x, 1));
/// # let mut node1 = Node1::new();
/// # let mut node2 = Node2::new();
/// # connect_nodes!(node1, node2, recv);
/// // node1 runs on its own thread, sending its messages to node2.
/// start_nodes!(node1);
/// node2.call();
/// # }
/// ```
#[macro_export]
macro_rules! start_nodes {
    ($($node:ident),+) => {
        $(
            thread::spawn(move || {
                loop {
                    $node.call();
                }
            });
        )*
    }
}
