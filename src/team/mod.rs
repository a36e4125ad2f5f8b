//! Team balancing for match organizers

pub mod balancer;

pub use balancer::balance;
