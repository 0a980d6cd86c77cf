mod permit;

pub use permit::PermitDecider;
