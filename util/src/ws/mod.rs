pub mod manager;
pub use manager::{ConnectionId, WebSocketManager};
