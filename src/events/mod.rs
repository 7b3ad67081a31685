pub mod dispatch;
pub mod listeners;
pub mod replay;

pub use dispatch::{DispatchReport, Event, click, dispatch, type_value};
pub use listeners::{EventKind, Handler, Listeners, Target};
pub use replay::{ReplayError, replay};
