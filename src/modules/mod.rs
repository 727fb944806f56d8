pub mod attendance;
pub mod calendar;
pub mod upstream;
pub mod wizard;
