pub mod channels;
pub mod coincidence;
pub mod export;
