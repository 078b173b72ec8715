pub mod counters;
pub mod fact;
pub mod family;
pub mod patient;
pub mod record;
pub mod status;
