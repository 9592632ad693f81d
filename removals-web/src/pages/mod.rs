pub mod confirmation;
pub mod details;
pub mod extras;
pub mod home;
pub mod hours;
pub mod not_found;
pub mod payment;
pub mod service;
pub mod vehicle;
