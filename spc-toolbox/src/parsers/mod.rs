pub mod spc;
