//! A hash map that remembers the order its keys went in.
//!
//! [`LinkedHashMap`] is an open-addressing table with linear probing, where
//! every occupied slot also carries links to the slots inserted just before
//! and after it. Keys and values are plain byte slices borrowed from the
//! caller; the map compares them by content and never copies or frees them.
//!
//! ```
//! use linkedhashmap::LinkedHashMap;
//!
//! let mut map = LinkedHashMap::new();
//! map.set(b"hello", b"1");
//! map.set(b"world", b"2");
//! map.set(b"hello", b"3");
//!
//! let keys: Vec<&[u8]> = map.keys();
//! assert_eq!(vec![&b"hello"[..], &b"world"[..]], keys);
//! assert_eq!(Some(&b"3"[..]), map.get(b"hello").map(|e| e.value));
//! ```

mod byte_hasher;
mod error;
mod linked_map;
mod order_list;

#[cfg(feature = "shared_map")]
mod shared_map;

pub use byte_hasher::{BuildByteSumHasher, ByteSumHasher};
pub use error::TableError;
pub use linked_map::{Entry, Iter, LinkedHashMap, MIN_CAPACITY};

#[cfg(feature = "shared_map")]
pub use shared_map::SharedLinkedHashMap;

#[cfg(test)]
mod proptests;
