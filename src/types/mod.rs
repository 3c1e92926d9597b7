pub mod credentials;
pub mod ids;
pub mod response;
pub mod session;

pub use credentials::*;
pub use ids::*;
pub use response::*;
pub use session::*;
