//! Feature level operations of [`Device`](crate::Device), each a short
//! sequence of commands.

mod alarm;
mod network;
mod sim;
mod sms;
mod time;

pub use network::RegistrationStatus;
pub use sim::SimStatus;
