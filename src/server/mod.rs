pub mod handlers;
pub mod state;

pub use handlers::{create_router, OperationStatus};
pub use state::AppState;
