//! Polygon object file I/O.
//!
//! This module provides functions for loading and saving [`PolygonObj`]s in
//! the MNI `.obj` format. The format itself lives in [`obj`]; the functions
//! here are the usual entry points.
//!
//! # Usage
//!
//! ```no_run
//! use bicpl::io::{load, save};
//!
//! let obj = load("surf.obj").unwrap();
//! save(&obj, "copy.obj").unwrap();
//! ```
//!
//! Many files can be loaded at once, in parallel:
//!
//! ```no_run
//! use bicpl::io::load_many;
//!
//! let results = load_many(&["lh.obj", "rh.obj"], true);
//! for result in results {
//!     match result {
//!         Ok(obj) => println!("{} points", obj.num_points()),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

pub mod obj;

use std::path::Path;

use log::info;
use rayon::prelude::*;

use crate::error::Result;
use crate::mesh::PolygonObj;

pub use obj::{parse, serialize, serialize_with, WriteOptions};

/// Load a polygon object from a file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PolygonObj> {
    obj::load(path)
}

/// Save a polygon object to a file.
pub fn save<P: AsRef<Path>>(obj: &PolygonObj, path: P) -> Result<()> {
    obj::save(obj, path)
}

/// Load several files independently.
///
/// Returns one result per path, in the order of `paths`. A failure in one
/// file does not affect the others. With `parallel`, files are loaded on the
/// rayon thread pool.
pub fn load_many<P: AsRef<Path> + Sync>(paths: &[P], parallel: bool) -> Vec<Result<PolygonObj>> {
    info!(
        "loading {} files ({})",
        paths.len(),
        if parallel { "parallel" } else { "sequential" }
    );

    if parallel {
        paths.par_iter().map(load).collect()
    } else {
        paths.iter().map(load).collect()
    }
}
