// Role-fit scoring: pure, synchronous computations over already-loaded snapshots.
// No I/O here; handlers load data through the repository and call in.

pub mod importance;
pub mod role_fit;
