pub mod fees;
pub mod references;
pub mod time;
