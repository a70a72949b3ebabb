//! Uniform interface for approximate nearest neighbor indexes.
//!
//! ```rust
//! use smallworld::ann::ANNIndex;
//! use smallworld::nsw::{NswIndex, NswParams};
//!
//! # fn main() -> Result<(), smallworld::RetrieveError> {
//! let mut index = NswIndex::new(4, NswParams { seed: Some(3), ..Default::default() })?;
//! ANNIndex::add_slice(&mut index, 0, &[0.1; 4])?;
//! ANNIndex::build(&mut index)?;
//! let hits = ANNIndex::search(&index, &[0.1; 4], 1)?;
//! assert_eq!(hits[0].0, 0);
//! # Ok(())
//! # }
//! ```

pub mod traits;

pub use traits::{ANNIndex, ANNStats};
