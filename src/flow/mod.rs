mod clock;
mod flow;

pub use clock::{Clock, SteppedClock, SystemClock};
pub use flow::Flow;
pub(crate) use flow::FlowController;
