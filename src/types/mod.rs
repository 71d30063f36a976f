pub mod application;
pub mod response;

pub use application::ApplicationRecord;
pub use response::parse_status_body;
