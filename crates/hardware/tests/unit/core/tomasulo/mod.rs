/// Common data bus arbitration, dependency chains and whole-program cycle counts.
pub mod cdb;
