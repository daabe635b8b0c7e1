//! Types shared between the job service and anything talking to its API.

pub mod jobs;
pub mod model;
pub mod requests;
