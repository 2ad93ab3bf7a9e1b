//! Application services: settings resolution, decisions, vote selection and
//! the orchestration loop that ties them to a backend.

pub mod decision;
pub mod orchestration;
pub mod selector;
pub mod settings;
