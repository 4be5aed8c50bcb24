pub mod charts;
pub mod converters;
