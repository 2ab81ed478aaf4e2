pub mod dtos;
pub mod lifecycle;
pub mod order_status;
pub mod staff;
