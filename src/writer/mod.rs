mod parquet_writer;
mod partition;
pub mod schema;

pub use parquet_writer::{find_partitions, read_partition, PartitionedWriter};
pub use partition::PartitionKey;
