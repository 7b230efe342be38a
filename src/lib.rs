//! Synthetic Modbus register-map fixtures: every generated descriptor keeps
//! data type, byte order, read quantity, and address mutually consistent, so
//! the emitted maps always parse.

pub mod commands;
pub mod descriptor;
pub mod generator;
pub mod output;
