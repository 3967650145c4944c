// Route handlers, grouped by resource. Access control lives in the route
// layers set up by `app::app`, so handlers assume the caller is allowed.
pub mod auth;
pub mod companies;
pub mod jobs;
pub mod users;
