mod permit_admin;

pub use permit_admin::PermitAdmin;
