//! Shop service models

pub mod furniture;
pub mod order;
pub mod user;

// Re-export for convenience
pub use furniture::{Catalog, Furniture};
pub use order::{Order, OrderAck};
pub use user::{
    CreateUserRequest, IdQuery, InsertAck, LoginRequest, MessageResponse, NewUser,
    RegisterRequest, RegisterResponse, UpdateUserRequest, User,
};
