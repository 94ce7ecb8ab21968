pub mod contact;
pub mod response;

pub use contact::{ContactResponse, ContactSubmission};
pub use response::ApiResponse;
