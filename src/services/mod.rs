pub mod feedback;
pub mod local;
pub mod remote;
pub mod schema;
pub mod store;
pub mod submission;
pub mod theme;
pub mod transport;
pub mod validation;
