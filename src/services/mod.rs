pub mod agent;
pub mod calendar;
