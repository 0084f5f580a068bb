pub mod complex;
pub mod fft;
pub mod filters;
