pub mod appointment;
pub mod loaders;
pub mod outcome;
pub mod sample;
pub mod stats;

pub use appointment::{Appointment, AppointmentStatus, WorkItem};
pub use loaders::load_appointments;
pub use outcome::{BatchReport, ProcessOutcome};
pub use sample::sample_appointments;
pub use stats::StatsSnapshot;
