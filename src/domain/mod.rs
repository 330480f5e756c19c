pub mod notification;
pub mod subscriber;
pub mod template;
