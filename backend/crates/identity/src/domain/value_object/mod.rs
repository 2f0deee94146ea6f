//! Value Object Module

pub mod account_id;
pub mod email;
pub mod one_time_code;
