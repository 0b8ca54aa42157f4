use std::{
    io,
    path::{Path, PathBuf},
};

use frameloop_common::utils::fsutils;
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::*;

use crate::signature::{Downscale, Signature};

/// Without the leading dot, matched case insensitively
pub const FRAME_EXTENSIONS: [&str; 3] = ["jpg", "png", "bmp"];

/// The order frames enter the pool in, which is also the order ties are decided by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Randomly, so the directory listing doesn't bias anything
    Shuffled,
    /// Randomly, but the same every time for the same seed and files
    Seeded(u64),
    /// By path
    Sorted,
}

/// Lists the frames directly inside `dir`. Paths that aren't UTF-8 are left out, they
/// can't be written to the playlist.
pub fn discover(dir: impl AsRef<Path>, order: Order) -> io::Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = fsutils::all_files(dir)?;
    frames.retain(|path| fsutils::has_extension(path, &FRAME_EXTENSIONS));
    frames.retain(|path| {
        let is_utf8 = path.to_str().is_some();
        if !is_utf8 {
            log::warn!("Skipping {path:?}, its path is not valid UTF-8");
        }
        is_utf8
    });

    // NOTE: read_dir order is unspecified, sort first so a seed means something
    frames.sort();
    match order {
        Order::Sorted => (),
        Order::Shuffled => frames.shuffle(&mut rand::thread_rng()),
        Order::Seeded(seed) => frames.shuffle(&mut SmallRng::seed_from_u64(seed)),
    }

    Ok(frames)
}

#[derive(Debug, Default)]
pub struct Loaded {
    /// Successfully decoded frames, in the same order as they were given
    pub frames: Vec<(PathBuf, Signature)>,
    /// Frames that couldn't be decoded
    pub excluded: Vec<PathBuf>,
}

/// Computes the signatures of all frames in parallel. Frames that fail to decode are
/// skipped, one broken file should not stop everything.
pub fn load_signatures(paths: Vec<PathBuf>, conf: &Downscale) -> Loaded {
    let results: Vec<(PathBuf, image::ImageResult<Signature>)> = paths
        .into_par_iter()
        .map(|path| {
            let sig = Signature::from_path(&path, conf);
            (path, sig)
        })
        .collect();

    let mut loaded = Loaded::default();
    for (path, sig) in results {
        match sig {
            Ok(sig) => loaded.frames.push((path, sig)),
            Err(e) => {
                log::debug!("Skipping '{}': {e}", path.display());
                loaded.excluded.push(path);
            }
        }
    }
    loaded
}
