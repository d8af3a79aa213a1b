mod frame;
mod paint;
mod throttle;

pub(in crate::app) use frame::RenderFrame;
pub(in crate::app) use paint::paint_frame;
pub(in crate::app) use throttle::Throttle;
