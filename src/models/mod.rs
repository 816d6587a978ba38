mod event;
mod timestamp;

pub use event::Event;
pub use event::EventId;
pub use event::ExpiredEvent;
pub use timestamp::iso_timestamp;
