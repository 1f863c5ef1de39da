mod contact;

pub use contact::{compose_address, Contact, ContactPatch, NewContact};
