// Route handlers for the /api/* endpoints.

pub mod analyses;
pub mod analyze;
pub mod skills;
