// # Record Store Implementations
//
// Provider-independent implementations of the RecordStore trait.
// Provider API clients live in their own crates.

pub mod memory;

pub use memory::MemoryRecordStore;
