pub mod confirm_flow;
pub mod transform;

pub use confirm_flow::ConfirmAppointment;
pub use transform::{transform_fn, FnTransform, Transform, TransformFuture};
