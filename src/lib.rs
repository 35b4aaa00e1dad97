//! labeled_resample: group-apply-combine resampling for labeled arrays
//!
//! A Rust library for resampling labeled n-dimensional arrays along a named
//! dimension. Data is split into groups by one label per position, a function
//! or named reduction runs on each group, and the results are joined back
//! into a single array or dataset indexed by the original dimension name.
//!
//! ## Key Features
//!
//! - **Labeled Containers**: [`Variable`], [`DataArray`] and [`Dataset`] with named dimensions
//! - **Resampling**: [`DataArrayResample`] and [`DatasetResample`] with `apply` and `reduce`
//! - **Named Reductions**: sum, mean, min, max, prod, std, var, median, count and more
//! - **Parallel Kernels**: Reductions computed over lanes with Rayon
//! - **Datetime Fields**: Calendar fields of temporal coordinates for building group labels
//!
//! ## Module Organization
//!
//! - [`coords`]: Group labels and coordinates
//! - [`variable`]: Raw labeled buffers
//! - [`array`]: Labeled arrays
//! - [`dataset`]: Collections of variables
//! - [`accessors`]: Datetime field extraction
//! - [`groupby`]: The split-apply-combine engine
//! - [`resample`]: Resampling on top of the engine
//! - [`statistics`]: Reduction kernels
//! - [`ops`]: Elementwise operators
//! - [`parallel`]: Parallel processing configuration
//! - [`errors`]: Centralized error handling
//!
//! ## Usage Example
//!
//! ```rust
//! use labeled_resample::prelude::*;
//! use ndarray::ArrayD;
//!
//! let data = ArrayD::from_shape_vec(vec![4], vec![1.0, 3.0, 10.0, 20.0]).unwrap();
//! let array = DataArray::new(data, &["time"]).unwrap();
//!
//! let labels = vec![Label::from("a"), Label::from("a"), Label::from("b"), Label::from("b")];
//! let means = array.resample("time", &labels).unwrap().mean().unwrap();
//!
//! assert_eq!(means.dims(), &["time".to_string()]);
//! assert_eq!(means.data().iter().copied().collect::<Vec<_>>(), vec![2.0, 15.0]);
//! ```
//!
//! ## Thread Pools
//!
//! Reductions run their kernels on Rayon's global pool. To bound the threads
//! used by one call, run it inside [`ParallelConfig::install`]:
//!
//! ```rust
//! # use labeled_resample::prelude::*;
//! # use ndarray::ArrayD;
//! # let data = ArrayD::from_shape_vec(vec![4], vec![1.0, 3.0, 10.0, 20.0]).unwrap();
//! # let array = DataArray::new(data, &["time"]).unwrap();
//! # let labels = vec![Label::from("a"), Label::from("a"), Label::from("b"), Label::from("b")];
//! let resampled = array.resample("time", &labels).unwrap();
//! let sums = ParallelConfig::with_threads(2)
//!     .install(|| resampled.sum())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(sums.shape(), &[2]);
//! ```
//!
//! [`ParallelConfig::install`]: parallel::ParallelConfig::install

pub mod accessors;
pub mod array;
pub mod coords;
pub mod dataset;
pub mod errors;
pub mod groupby;
pub mod ops;
pub mod parallel;
pub mod resample;
pub mod statistics;
pub mod variable;

pub use array::DataArray;
pub use coords::{CoordValues, Coordinate, Label};
pub use dataset::Dataset;
pub use errors::{ResampleError, Result};
pub use resample::{DataArrayResample, DatasetResample, RESAMPLE_DIM};
pub use variable::{Attrs, Variable};

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::accessors::{DateField, DatetimeAccessor};
    pub use crate::array::DataArray;
    pub use crate::coords::{CoordValues, Coordinate, Coords, Label};
    pub use crate::dataset::Dataset;
    pub use crate::errors::{ResampleError, Result};
    pub use crate::groupby::{GroupBy, GroupOutput};
    pub use crate::ops::BinaryOp;
    pub use crate::parallel::ParallelConfig;
    pub use crate::resample::{
        DataArrayResample, DatasetResample, ResampleBinaryOps, ResampleReductions, RESAMPLE_DIM,
    };
    pub use crate::statistics::{StatOperation, StatisticalReduction};
    pub use crate::variable::{Attrs, Variable};
}
