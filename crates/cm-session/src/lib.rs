//! The modeling session.
//!
//! [`Modeler`] ties the three layers together: every mutation goes
//! through the domain model first, and only when the model accepts it
//! is the change mirrored into the engine and the affected client
//! state keys republished through the sink.

pub mod error;
pub mod modeler;

pub use error::SessionError;
pub use modeler::Modeler;
