//! Process exit codes

pub const EXIT_SUCCESS: i32 = 0;
/// The command was refused but nothing is broken (bad input, cancelled)
pub const EXIT_WARNING: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
