pub mod node_store;
pub mod vertex_distance_queue;
