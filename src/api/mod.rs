pub mod roster;
pub mod timetable;
pub mod topology;
