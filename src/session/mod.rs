pub mod component;
pub mod gate;
pub mod registry;
pub mod render_session;
pub mod sink;
