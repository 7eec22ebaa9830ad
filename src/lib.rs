//! Care Assist — conversational front-end for a remote symptom assessment
//! service.

pub mod channels;
pub mod config;
pub mod conversation;
pub mod error;
pub mod gateway;
pub mod submission;
