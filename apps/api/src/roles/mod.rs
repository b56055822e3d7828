// Target roles and the role-fit analysis endpoint.

pub mod handlers;
