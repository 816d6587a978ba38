pub mod expire_events;
